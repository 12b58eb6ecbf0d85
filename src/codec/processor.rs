use super::{init, CodecService, RawImage};
use crate::error::{DecodeError, EncodeError};
use std::path::Path;

/// Lossy WebP codec backed by libwebp.
#[derive(Debug)]
pub struct WebpCodec {
    _private: (),
}

impl WebpCodec {
    /// Runs the process-wide codec setup if it has not happened yet.
    pub fn new() -> Self {
        init();
        Self { _private: () }
    }
}

impl Default for WebpCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecService for WebpCodec {
    fn decode(&self, path: &Path) -> Result<RawImage, DecodeError> {
        let bytes = std::fs::read(path)?;
        // Format comes from the content; camera URIs often lack a usable extension.
        let image = image::load_from_memory(&bytes)?;
        Ok(RawImage::new(image))
    }

    fn encode(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(EncodeError::EmptyImage);
        }

        let quality = quality.clamp(0.0, 1.0) * 100.0;

        let encoded = if image.has_alpha() {
            let rgba = image.as_dynamic().to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
        } else {
            let rgb = image.as_dynamic().to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
        };
        let memory = encoded.map_err(|e| EncodeError::Codec(format!("{:?}", e)))?;

        if memory.is_empty() {
            return Err(EncodeError::Codec("encoder produced no data".to_string()));
        }
        Ok(memory.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let img = RgbaImage::from_fn(16, 12, |x, y| {
            Rgba([(x * 16) as u8, (y * 20) as u8, 90, 255])
        });
        let path = dir.path().join(name);
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn test_decode_png() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "input.png");

        let raw = WebpCodec::new().decode(&path).unwrap();
        assert_eq!((raw.width(), raw.height()), (16, 12));
    }

    #[test]
    fn test_decode_sniffs_content_not_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_png(&dir, "input.png");
        let renamed = dir.path().join("camera_capture");
        std::fs::rename(&path, &renamed).unwrap();

        assert!(WebpCodec::new().decode(&renamed).is_ok());
    }

    #[test]
    fn test_decode_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = WebpCodec::new().decode(&dir.path().join("missing.jpg"));
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_decode_garbage_is_image_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"definitely not pixels").unwrap();

        let result = WebpCodec::new().decode(&path);
        assert!(matches!(result, Err(DecodeError::Image(_))));
    }

    #[test]
    fn test_encode_produces_webp_container() {
        let raw = RawImage::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            8,
            Rgba([255, 0, 0, 128]),
        )));

        let bytes = WebpCodec::new().encode(&raw, 0.8).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_lower_quality_is_not_larger() {
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8, 255])
        });
        let raw = RawImage::new(DynamicImage::ImageRgba8(img).to_rgb8().into());

        let high = WebpCodec::new().encode(&raw, 1.0).unwrap();
        let low = WebpCodec::new().encode(&raw, 0.1).unwrap();
        assert!(low.len() <= high.len());
    }

    #[test]
    fn test_encode_empty_image_fails() {
        let raw = RawImage::new(DynamicImage::new_rgba8(0, 0));
        let result = WebpCodec::new().encode(&raw, 1.0);
        assert!(matches!(result, Err(EncodeError::EmptyImage)));
    }
}
