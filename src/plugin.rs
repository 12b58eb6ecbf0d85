//! Host-facing operations.
//!
//! Mirrors the three calls a mobile host bridge exposes (`convertToWebp`,
//! `deleteTempFile`, `clearAllTempWebps`) and flattens failures into a
//! `{ code, message }` pair the host can reject a promise with.

use crate::cleanup::CleanupManager;
use crate::codec::{CodecService, WebpCodec};
use crate::convert::ConversionService;
use crate::models::{
    ClearResult, Config, ConversionRequest, ConvertToWebpOptions, ConvertToWebpResult,
    DeleteFileOptions, DeleteResult,
};
use crate::naming::TempFileNamer;
use crate::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

/// Error shape handed back to the host.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct PluginError {
    pub code: String,
    pub message: String,
}

impl From<Error> for PluginError {
    fn from(err: Error) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Converter and cleanup services sharing one temp directory and namer.
pub struct WebpConverter {
    converter: ConversionService,
    cleanup: CleanupManager,
}

impl WebpConverter {
    pub fn new(config: &Config) -> Self {
        Self::with_codec(config, Arc::new(WebpCodec::new()))
    }

    /// Build with an injected codec; used by tests and harnesses.
    pub fn with_codec(config: &Config, codec: Arc<dyn CodecService>) -> Self {
        let namer = TempFileNamer::new(&config.prefix, &config.extension);
        Self {
            converter: ConversionService::new(codec, namer.clone(), &config.temp_dir),
            cleanup: CleanupManager::new(namer, &config.temp_dir)
                .with_strict_delete(config.strict_delete),
        }
    }

    pub async fn convert_to_webp(
        &self,
        options: ConvertToWebpOptions,
    ) -> PluginResult<ConvertToWebpResult> {
        let file_uri = options.file_uri.ok_or(Error::MissingInput("fileUri"))?;
        let request = ConversionRequest {
            source: file_uri,
            quality: options.quality,
        };

        let result = self.converter.convert(request).await.map_err(report)?;
        Ok(ConvertToWebpResult {
            webp_file_uri: result.uri,
        })
    }

    pub async fn delete_temp_file(&self, options: DeleteFileOptions) -> PluginResult<DeleteResult> {
        let file_uri = options.file_uri.ok_or(Error::MissingInput("file path"))?;
        self.cleanup.delete_one(&file_uri).await.map_err(report)?;
        Ok(DeleteResult { deleted: true })
    }

    pub async fn clear_all_temp_webps(&self) -> PluginResult<ClearResult> {
        let summary = self.cleanup.clear_all().await.map_err(report)?;
        Ok(ClearResult {
            cleared: true,
            removed: summary.removed,
            failed: summary.failed,
        })
    }

    /// Dispatch a bridged call by method name with JSON options.
    pub async fn handle(&self, method: &str, options: Value) -> PluginResult<Value> {
        match method {
            "convertToWebp" => to_value(self.convert_to_webp(from_value(options)?).await?),
            "deleteTempFile" => to_value(self.delete_temp_file(from_value(options)?).await?),
            "clearAllTempWebps" => to_value(self.clear_all_temp_webps().await?),
            other => Err(Error::UnknownMethod(other.to_string()).into()),
        }
    }
}

fn report(err: Error) -> PluginError {
    error!("{} failed: {}", err.code(), err);
    err.into()
}

fn from_value<T: DeserializeOwned>(options: Value) -> PluginResult<T> {
    let options = match options {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(options).map_err(|e| Error::from(e).into())
}

fn to_value<T: Serialize>(result: T) -> PluginResult<Value> {
    serde_json::to_value(result).map_err(|e| Error::from(e).into())
}
