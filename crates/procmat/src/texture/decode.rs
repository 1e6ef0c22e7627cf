//! Image decoding for texture loading
//!
//! Stateless decoding helpers over the `image` crate. Container formats are
//! detected by byte signature, never by file extension, and the true source
//! channel count is taken from the encoded color type before any layout
//! promotion. Every function here is safe to call from any worker thread.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ColorType, DynamicImage};
use thiserror::Error;

use super::PixelFormat;

/// Errors raised while loading a texture from disk
///
/// These never escape the loader: a failed task logs the error and resolves
/// to the empty texture descriptor.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The file does not exist
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Reading the file failed
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The byte signature matches no supported container format
    #[error("unrecognized image file format: {0}")]
    UnrecognizedFormat(PathBuf),

    /// The container was recognized but decoding failed
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Offending file
        path: PathBuf,
        /// Underlying decode error
        source: image::ImageError,
    },
}

/// Pixel data decoded into one of the normalized layouts
///
/// Color sources of any bit depth (grayscale-plus-alpha included) are
/// promoted to [`PixelFormat::Rgba8`] so downstream binding code handles a
/// single interleaved layout; only 16-bit single-channel sources stay
/// [`PixelFormat::Gray16`], preserving their precision for opacity maps.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Normalized pixel layout
    pub format: PixelFormat,
    /// Raw pixel payload (native-endian for 16-bit formats)
    pub data: Vec<u8>,
}

/// Map an encoded color type to the true source channel count (1, 3, or 4)
///
/// Layout promotion during decode can hide whether the source actually had
/// an alpha channel, so this is read from the pre-promotion color type.
/// Gray+alpha sources count as 4: what matters downstream is whether an
/// alpha channel exists at all.
pub fn source_channel_count(color: ColorType) -> u32 {
    if color.has_alpha() {
        4
    } else if color.channel_count() == 1 {
        1
    } else {
        3
    }
}

fn normalize(image: DynamicImage) -> DecodedImage {
    match image {
        DynamicImage::ImageLuma16(buffer) => {
            let (width, height) = buffer.dimensions();
            DecodedImage {
                width,
                height,
                format: PixelFormat::Gray16,
                data: bytemuck::cast_slice(buffer.as_raw()).to_vec(),
            }
        }
        _ => {
            let buffer = image.to_rgba8();
            let (width, height) = buffer.dimensions();
            DecodedImage {
                width,
                height,
                format: PixelFormat::Rgba8,
                data: buffer.into_raw(),
            }
        }
    }
}

/// Decode image bytes into a normalized layout plus the true channel count
///
/// The container format is detected from the byte signature.
pub fn decode(bytes: &[u8], origin: &Path) -> Result<(DecodedImage, u32), TextureError> {
    let format = image::guess_format(bytes)
        .map_err(|_| TextureError::UnrecognizedFormat(origin.to_path_buf()))?;

    let image =
        image::load_from_memory_with_format(bytes, format).map_err(|source| {
            TextureError::Decode {
                path: origin.to_path_buf(),
                source,
            }
        })?;

    let num_channels = source_channel_count(image.color());
    log::debug!(
        "Decoded {:?} ({:?}, {} source channel(s))",
        origin,
        format,
        num_channels
    );

    Ok((normalize(image), num_channels))
}

/// Load and decode an image file
///
/// Runs the full load sequence: existence check, byte read, signature
/// detection, decode, channel detection.
pub fn load_image(path: &Path) -> Result<(DecodedImage, u32), TextureError> {
    if !path.exists() {
        return Err(TextureError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_true_channel_count_survives_promotion() {
        let gray = png_bytes(&DynamicImage::ImageLuma8(GrayImage::from_pixel(
            4,
            4,
            Luma([128]),
        )));
        let rgb = png_bytes(&DynamicImage::ImageRgb8(RgbImage::from_pixel(
            4,
            4,
            Rgb([10, 20, 30]),
        )));
        let rgba = png_bytes(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([10, 20, 30, 40]),
        )));

        let (gray_img, gray_channels) = decode(&gray, Path::new("gray.png")).unwrap();
        let (rgb_img, rgb_channels) = decode(&rgb, Path::new("rgb.png")).unwrap();
        let (rgba_img, rgba_channels) = decode(&rgba, Path::new("rgba.png")).unwrap();

        assert_eq!(gray_channels, 1);
        assert_eq!(rgb_channels, 3);
        assert_eq!(rgba_channels, 4);

        // All 8-bit sources decode to the same interleaved layout.
        assert_eq!(gray_img.format, PixelFormat::Rgba8);
        assert_eq!(rgb_img.format, PixelFormat::Rgba8);
        assert_eq!(rgba_img.format, PixelFormat::Rgba8);
    }

    #[test]
    fn test_gray16_stays_single_channel() {
        let buffer =
            image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_pixel(3, 2, Luma([40000u16]));
        let bytes = png_bytes(&DynamicImage::ImageLuma16(buffer));

        let (decoded, num_channels) = decode(&bytes, Path::new("gray16.png")).unwrap();
        assert_eq!(num_channels, 1);
        assert_eq!(decoded.format, PixelFormat::Gray16);
        assert_eq!(decoded.data.len(), 3 * 2 * 2);
    }

    #[test]
    fn test_16bit_color_is_promoted_to_interleaved_8bit() {
        let buffer = image::ImageBuffer::<image::Rgb<u16>, Vec<u16>>::from_pixel(
            4,
            4,
            image::Rgb([u16::MAX, u16::MAX, u16::MAX]),
        );
        let bytes = png_bytes(&DynamicImage::ImageRgb16(buffer));

        let (decoded, num_channels) = decode(&bytes, Path::new("rgb16.png")).unwrap();
        assert_eq!(num_channels, 3);
        assert_eq!(decoded.format, PixelFormat::Rgba8);
        assert_eq!(decoded.data.len(), 4 * 4 * 4);
    }

    #[test]
    fn test_format_detected_by_signature_not_extension() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([200, 100, 50])));
        let mut jpeg_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut jpeg_bytes), ImageFormat::Jpeg)
            .unwrap();

        // JPEG payload behind a .png name still decodes as JPEG.
        let (decoded, num_channels) = decode(&jpeg_bytes, Path::new("mislabeled.png")).unwrap();
        assert_eq!(decoded.format, PixelFormat::Rgba8);
        assert_eq!(num_channels, 3);
    }

    #[test]
    fn test_unrecognized_signature() {
        let result = decode(b"definitely not an image", Path::new("garbage.bin"));
        assert!(matches!(result, Err(TextureError::UnrecognizedFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_image(Path::new("/nonexistent/texture.png"));
        assert!(matches!(result, Err(TextureError::NotFound(_))));
    }
}
