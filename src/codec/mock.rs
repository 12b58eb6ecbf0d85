use super::{CodecService, RawImage};
use crate::error::{DecodeError, EncodeError};
use image::DynamicImage;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Codec double that skips real pixel work.
///
/// Decoding only checks that the source exists; encoding returns a minimal
/// RIFF/WEBP header so callers can still sniff the output.
#[derive(Clone)]
pub struct MockCodec {
    decode_count: Arc<Mutex<usize>>,
    encode_count: Arc<Mutex<usize>>,
    qualities: Arc<Mutex<Vec<f32>>>,
    fail_decode: Arc<Mutex<bool>>,
    fail_encode: Arc<Mutex<bool>>,
}

impl MockCodec {
    pub fn new() -> Self {
        Self {
            decode_count: Arc::new(Mutex::new(0)),
            encode_count: Arc::new(Mutex::new(0)),
            qualities: Arc::new(Mutex::new(Vec::new())),
            fail_decode: Arc::new(Mutex::new(false)),
            fail_encode: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_decode_failure(self, should_fail: bool) -> Self {
        *self.fail_decode.lock().unwrap() = should_fail;
        self
    }

    pub fn with_encode_failure(self, should_fail: bool) -> Self {
        *self.fail_encode.lock().unwrap() = should_fail;
        self
    }

    pub fn get_decode_count(&self) -> usize {
        *self.decode_count.lock().unwrap()
    }

    pub fn get_encode_count(&self) -> usize {
        *self.encode_count.lock().unwrap()
    }

    /// Fractional qualities passed to `encode`, in call order.
    pub fn get_qualities(&self) -> Vec<f32> {
        self.qualities.lock().unwrap().clone()
    }
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecService for MockCodec {
    fn decode(&self, path: &Path) -> Result<RawImage, DecodeError> {
        *self.decode_count.lock().unwrap() += 1;

        if *self.fail_decode.lock().unwrap() {
            return Err(DecodeError::Io(std::io::Error::other("Mock decode failure")));
        }
        std::fs::metadata(path)?;

        Ok(RawImage::new(DynamicImage::new_rgb8(2, 2)))
    }

    fn encode(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, EncodeError> {
        *self.encode_count.lock().unwrap() += 1;
        self.qualities.lock().unwrap().push(quality);

        if *self.fail_encode.lock().unwrap() {
            return Err(EncodeError::Codec("Mock encode failure".to_string()));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(EncodeError::EmptyImage);
        }

        let mut bytes = b"RIFF\0\0\0\0WEBPVP8 ".to_vec();
        bytes.push((quality * 100.0).round() as u8);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_codec_counts_and_qualities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        std::fs::write(&path, b"x").unwrap();

        let codec = MockCodec::new();
        let raw = codec.decode(&path).unwrap();
        let bytes = codec.encode(&raw, 0.6).unwrap();

        assert!(bytes.starts_with(b"RIFF"));
        assert_eq!(codec.get_decode_count(), 1);
        assert_eq!(codec.get_encode_count(), 1);
        assert_eq!(codec.get_qualities(), vec![0.6]);
    }

    #[test]
    fn test_mock_codec_missing_source() {
        let codec = MockCodec::new();
        let result = codec.decode(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }

    #[test]
    fn test_mock_codec_with_failures() {
        let codec = MockCodec::new().with_encode_failure(true);
        let raw = RawImage::new(DynamicImage::new_rgb8(1, 1));
        assert!(codec.encode(&raw, 1.0).is_err());

        let codec = MockCodec::new().with_decode_failure(true);
        assert!(codec.decode(Path::new("/")).is_err());
    }
}
