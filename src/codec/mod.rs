//! Image decoding and WebP encoding
//!
//! Wraps the `image` crate for reading arbitrary raster input and libwebp
//! (through the `webp` crate) for lossy output at a chosen quality.

pub mod mock;
pub mod processor;

pub use mock::MockCodec;
pub use processor::WebpCodec;

use crate::error::{DecodeError, EncodeError};
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use std::sync::OnceLock;

/// Decoded pixels for a single conversion.
#[derive(Debug, Clone)]
pub struct RawImage {
    image: DynamicImage,
}

impl RawImage {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }
}

/// Codec capability used by the conversion service.
///
/// Both calls are CPU-bound and are run on the blocking pool by callers.
pub trait CodecService: Send + Sync {
    fn decode(&self, path: &Path) -> Result<RawImage, DecodeError>;

    /// `quality` is a fraction in `[0.0, 1.0]`.
    fn encode(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, EncodeError>;
}

/// Process-wide codec setup, resolved once.
#[derive(Debug)]
pub struct CodecInfo {
    pub input_formats: Vec<ImageFormat>,
}

static CODEC_INFO: OnceLock<CodecInfo> = OnceLock::new();

/// Idempotent; the first call resolves the decodable input formats and later
/// calls return the same instance.
pub fn init() -> &'static CodecInfo {
    CODEC_INFO.get_or_init(|| {
        let input_formats: Vec<ImageFormat> = ImageFormat::all()
            .filter(|format| format.reading_enabled())
            .collect();
        tracing::debug!(
            "Codec initialized; decodable inputs: {:?}",
            input_formats
        );
        CodecInfo { input_formats }
    })
}
