//! Texture resources and asynchronous loading
//!
//! Textures enter the pipeline as arbitrary image files on disk. The
//! [`decode`] module turns file bytes into a normalized pixel layout and
//! reports the *true* source channel count; the [`loader`] module schedules
//! that work on a shared worker pool so the orchestrating thread only blocks
//! when it actually needs a result.

pub mod decode;
pub mod loader;

pub use decode::{DecodedImage, TextureError};
pub use loader::{TextureFuture, TexturePool};

use std::sync::Arc;
use std::time::SystemTime;

/// Physical pixel layout of a decoded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4-channel interleaved, 8 bits per channel (all 8-bit sources are
    /// promoted to this layout, grayscale included)
    Rgba8,
    /// Single channel, 8 bits
    Gray8,
    /// Single channel, 16 bits (native-endian)
    Gray16,
    /// 4-channel interleaved, 16 bits per channel; never produced by the
    /// loader, which promotes 16-bit color sources to [`PixelFormat::Rgba8`]
    Rgba16,
}

impl PixelFormat {
    /// Size of one pixel in bytes
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Gray16 => 2,
            Self::Rgba8 => 4,
            Self::Rgba16 => 8,
        }
    }
}

/// Texture compression category chosen at upload time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureCompression {
    /// General-purpose color compression
    Default,
    /// Normal-map-preserving compression
    NormalMap,
    /// Mask/channel-preserving compression (roughness, metallic)
    Masks,
}

/// Color-space and compression flags for a texture resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSettings {
    /// Whether samples are gamma-corrected (sRGB) rather than linear
    pub srgb: bool,
    /// Compression category
    pub compression: TextureCompression,
}

impl TextureSettings {
    /// Choose settings by texture-slot convention
    ///
    /// Normal maps and roughness/metallic masks are always linear with the
    /// matching compression; any other slot uses default compression and is
    /// linear only when the true source channel count is 1 (grayscale).
    pub fn for_slot(slot: &str, num_channels: u32) -> Self {
        match slot {
            "normalMap" => Self {
                srgb: false,
                compression: TextureCompression::NormalMap,
            },
            "roughnessMap" | "metallicMap" => Self {
                srgb: false,
                compression: TextureCompression::Masks,
            },
            _ => Self {
                srgb: num_channels != 1,
                compression: TextureCompression::Default,
            },
        }
    }
}

/// A GPU-uploadable 2D texture resource
///
/// Holds the decoded pixel payload alongside the upload flags. Construction
/// must happen on the orchestrating thread that owns GPU resource creation,
/// never inside a loader worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2D {
    /// Debug/asset name, derived from the source file stem
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Physical pixel layout
    pub format: PixelFormat,
    /// Color-space and compression flags
    pub settings: TextureSettings,
    /// Raw pixel payload, `width * height * bytes_per_pixel` bytes
    pub data: Vec<u8>,
}

impl Texture2D {
    /// Create a texture from decoded pixel data
    ///
    /// # Panics
    /// Panics if `data` does not match `width * height * bytes_per_pixel`.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        format: PixelFormat,
        settings: TextureSettings,
        data: Vec<u8>,
    ) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * format.bytes_per_pixel(),
            "pixel payload size does not match texture dimensions"
        );
        Self {
            name: name.into(),
            width,
            height,
            format,
            settings,
            data,
        }
    }

    /// Create a texture from a decoded image
    pub fn from_decoded(name: impl Into<String>, image: DecodedImage, settings: TextureSettings) -> Self {
        Self::new(
            name,
            image.width,
            image.height,
            image.format,
            settings,
            image.data,
        )
    }

    /// Total pixel count
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Result of one texture load task
///
/// The empty descriptor (no resource, zero channels) signals any load
/// failure; loads never surface hard errors. Equality compares resource
/// identity and channel count only; the load timestamp is bookkeeping.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Loaded resource, absent on failure
    pub texture: Option<Arc<Texture2D>>,
    /// True channel count of the encoded source (1, 3, or 4), independent
    /// of any decode-time channel promotion; 0 when the load failed
    pub num_channels: u32,
    /// When the load task finished
    pub load_time: SystemTime,
}

impl TextureData {
    /// Create a descriptor for a successfully loaded texture
    pub fn new(texture: Arc<Texture2D>, num_channels: u32) -> Self {
        Self {
            texture: Some(texture),
            num_channels,
            load_time: SystemTime::now(),
        }
    }

    /// Whether a resource was actually loaded
    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }
}

impl Default for TextureData {
    /// The empty descriptor returned by failed loads
    fn default() -> Self {
        Self {
            texture: None,
            num_channels: 0,
            load_time: SystemTime::now(),
        }
    }
}

impl PartialEq for TextureData {
    fn eq(&self, other: &Self) -> bool {
        let same_resource = match (&self.texture, &other.texture) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_resource && self.num_channels == other.num_channels
    }
}

impl Eq for TextureData {}
