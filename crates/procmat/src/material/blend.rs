//! Blend mode resolution
//!
//! The final blend mode of a material depends on three signals: the uniform
//! opacity scalar, the declared blend-mode hint, and (when the hint is the
//! default "blend") the actual pixel content of the opacity map. The
//! histogram classifier buckets opacity samples into black, white, and
//! mid-tone to tell solid, bimodal, and gradient maps apart.

use crate::texture::{PixelFormat, Texture2D, TextureData};

/// Samples below this are counted as fully transparent ("black")
const BLACK_COLOR_THRESHOLD: f32 = 0.02;

/// Samples above this are counted as fully opaque ("white")
const WHITE_COLOR_THRESHOLD: f32 = 1.0 - BLACK_COLOR_THRESHOLD;

/// Fraction of pixels (and uniform opacity value) treated as "effectively all"
const OPACITY_THRESHOLD: f64 = 0.98;

/// How a material composites against its background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// No blending; the material fully covers the background
    Opaque,
    /// Hard cutout driven by an opacity threshold, no gradient
    Masked,
    /// Alpha blending with the background
    Translucent,
}

impl BlendMode {
    /// Parse the declared blend-mode hint string
    ///
    /// `"mask"` maps to [`BlendMode::Masked`], `"blend"` (the engine
    /// default) to [`BlendMode::Translucent`], anything else to
    /// [`BlendMode::Opaque`].
    pub fn from_hint(hint: &str) -> Self {
        match hint {
            "mask" => Self::Masked,
            "blend" => Self::Translucent,
            _ => Self::Opaque,
        }
    }
}

fn count_opacity_samples(samples: impl Iterator<Item = f32>) -> (u64, u64) {
    let mut black_pixels = 0u64;
    let mut white_pixels = 0u64;
    for value in samples {
        if value < BLACK_COLOR_THRESHOLD {
            black_pixels += 1;
        } else if value > WHITE_COLOR_THRESHOLD {
            white_pixels += 1;
        }
    }
    (black_pixels, white_pixels)
}

/// Classify an opacity map as solid, bimodal, or gradient
///
/// Iterates every pixel of the opacity channel: the alpha channel for
/// 4-channel maps when `use_alpha_as_opacity` is set, otherwise the first
/// channel. An effectively all-white map needs no cutout (Opaque); a map
/// with essentially only black and white pixels is a hard cutout (Masked);
/// anything with a real gradient region blends (Translucent).
///
/// # Panics
/// Panics if the map is not one of the three supported layouts (4-channel
/// 8-bit, single-channel 8-bit, single-channel 16-bit). Reaching this with
/// any other layout is an internal format-handling bug, never an input
/// condition, so it must not be papered over with a default.
pub fn classify_opacity_map(opacity_map: &Texture2D, use_alpha_as_opacity: bool) -> BlendMode {
    let (black_pixels, white_pixels) = match opacity_map.format {
        PixelFormat::Rgba8 => {
            let channel = if use_alpha_as_opacity { 3 } else { 0 };
            count_opacity_samples(
                opacity_map
                    .data
                    .chunks_exact(4)
                    .map(|pixel| f32::from(pixel[channel]) / 255.0),
            )
        }
        PixelFormat::Gray8 => count_opacity_samples(
            opacity_map.data.iter().map(|&value| f32::from(value) / 255.0),
        ),
        PixelFormat::Gray16 => count_opacity_samples(
            opacity_map
                .data
                .chunks_exact(2)
                .map(|bytes| {
                    f32::from(u16::from_ne_bytes([bytes[0], bytes[1]])) / 65535.0
                }),
        ),
        other => panic!(
            "opacity map '{}' has out-of-contract pixel format {other:?}",
            opacity_map.name
        ),
    };

    let total_pixels = opacity_map.pixel_count();
    let threshold = (total_pixels as f64) * OPACITY_THRESHOLD;

    if (white_pixels as f64) >= threshold {
        BlendMode::Opaque
    } else if ((white_pixels + black_pixels) as f64) >= threshold {
        BlendMode::Masked
    } else {
        BlendMode::Translucent
    }
}

/// Resolve the final blend mode of a material
///
/// First match wins:
/// 1. uniform opacity below 0.98 always forces [`BlendMode::Translucent`],
///    independent of any map;
/// 2. a declared `mask` hint stays [`BlendMode::Masked`];
/// 3. the default `blend` hint with an opacity map present is refined by
///    [`classify_opacity_map`];
/// 4. everything else is [`BlendMode::Opaque`].
pub fn choose_blend_mode(
    opacity_map: &TextureData,
    opacity: f64,
    declared: BlendMode,
    use_alpha_as_opacity: bool,
) -> BlendMode {
    if opacity < OPACITY_THRESHOLD {
        BlendMode::Translucent
    } else if declared == BlendMode::Masked {
        BlendMode::Masked
    } else if declared == BlendMode::Translucent {
        match &opacity_map.texture {
            Some(texture) => classify_opacity_map(texture, use_alpha_as_opacity),
            None => BlendMode::Opaque,
        }
    } else {
        BlendMode::Opaque
    }
}
