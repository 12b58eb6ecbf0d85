//! Conversion orchestration: decode, encode, write to the temp directory.

use crate::codec::CodecService;
use crate::models::{ConversionRequest, ConversionResult, TempFile, DEFAULT_QUALITY};
use crate::naming::TempFileNamer;
use crate::uri;
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ConversionService {
    codec: Arc<dyn CodecService>,
    namer: TempFileNamer,
    temp_dir: PathBuf,
}

struct Encoded {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ConversionService {
    pub fn new(codec: Arc<dyn CodecService>, namer: TempFileNamer, temp_dir: &Path) -> Self {
        let temp_dir = std::path::absolute(temp_dir).unwrap_or_else(|_| temp_dir.to_path_buf());
        Self {
            codec,
            namer,
            temp_dir,
        }
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Convert one image. Each call is a single attempt and writes a new,
    /// independently named file; nothing is left behind on failure.
    pub async fn convert(&self, request: ConversionRequest) -> Result<ConversionResult> {
        let source = uri::to_file_path(&request.source).ok_or(Error::MissingInput("fileUri"))?;
        let quality = resolve_quality(request.quality);
        let fraction = f32::from(quality) / 100.0;

        info!(
            "Converting {} to WebP at quality {}",
            source.display(),
            quality
        );

        let Encoded {
            bytes,
            width,
            height,
        } = self.encode_source(source, fraction).await?;
        let size = bytes.len();

        let name = self.namer.next_name();
        let path = self.temp_dir.join(&name);
        self.write_output(&path, bytes).await?;

        info!(
            "Wrote {} ({} bytes, {}x{})",
            path.display(),
            size,
            width,
            height
        );

        Ok(ConversionResult {
            uri: uri::to_file_uri(&path),
            file: TempFile { path, name },
            bytes: size,
            width,
            height,
            quality,
        })
    }

    async fn encode_source(&self, source: PathBuf, quality: f32) -> Result<Encoded> {
        let codec = Arc::clone(&self.codec);
        tokio::task::spawn_blocking(move || -> Result<Encoded> {
            let raw = codec
                .decode(&source)
                .map_err(|e| Error::SourceUnreadable {
                    path: source.clone(),
                    source: e,
                })?;
            let (width, height) = (raw.width(), raw.height());
            debug!("Decoded {} ({}x{})", source.display(), width, height);

            let bytes = codec.encode(&raw, quality)?;
            Ok(Encoded {
                bytes,
                width,
                height,
            })
        })
        .await
        .map_err(|e| Error::Invariant(format!("Conversion task join error: {}", e)))?
    }

    async fn write_output(&self, path: &Path, bytes: Vec<u8>) -> Result<()> {
        let dir = self.temp_dir.clone();
        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            write_atomic(&dir, &target, &bytes).map_err(|e| Error::WriteFailed {
                path: target.clone(),
                source: e,
            })
        })
        .await
        .map_err(|e| Error::Invariant(format!("Write task join error: {}", e)))?
    }
}

/// Absent quality means 100; out-of-range values are pulled into `0..=100`.
pub fn resolve_quality(quality: Option<i64>) -> u8 {
    match quality {
        None => DEFAULT_QUALITY,
        Some(q) if (0..=100).contains(&q) => q as u8,
        Some(q) => {
            let clamped = q.clamp(0, 100) as u8;
            warn!("Quality {} out of range, using {}", q, clamped);
            clamped
        }
    }
}

/// Stage the bytes under a name the namer never matches, then move them into
/// place. A staging file that fails to persist is removed when dropped.
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut staging = tempfile::Builder::new()
        .prefix(".webpconv-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    staging.write_all(bytes)?;
    staging.as_file().sync_all()?;
    staging.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}
