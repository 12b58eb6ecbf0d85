//! Data models and structures
//!
//! Defines the per-call request/result types, the JSON shapes exchanged with
//! a host bridge, and environment-driven configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Quality used when the caller does not supply one.
pub const DEFAULT_QUALITY: u8 = 100;

/// One conversion call. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    /// Filesystem path or `file://` URI of the image to convert.
    pub source: String,
    /// Percentage in `0..=100`; `None` means [`DEFAULT_QUALITY`].
    pub quality: Option<i64>,
}

impl ConversionRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            quality: None,
        }
    }

    pub fn with_quality(mut self, quality: i64) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// A file written by the converter into the temp directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempFile {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub file: TempFile,
    /// Absolute `file://` URI of [`TempFile::path`].
    pub uri: String,
    pub bytes: usize,
    pub width: u32,
    pub height: u32,
    /// Quality actually applied, after defaulting and clamping.
    pub quality: u8,
}

/// Outcome of a bulk cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub removed: usize,
    pub failed: usize,
}

// Boundary request/response models
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToWebpOptions {
    #[serde(default)]
    pub file_uri: Option<String>,
    #[serde(default, deserialize_with = "lenient_quality")]
    pub quality: Option<i64>,
}

/// Any JSON number is accepted and truncated; other types fall back to the
/// default quality.
fn lenient_quality<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConvertToWebpResult {
    pub webp_file_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileOptions {
    #[serde(default)]
    pub file_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResult {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClearResult {
    pub cleared: bool,
    pub removed: usize,
    pub failed: usize,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub temp_dir: PathBuf,
    pub prefix: String,
    pub extension: String,
    pub strict_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            prefix: "converted".to_string(),
            extension: "webp".to_string(),
            strict_delete: false,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        let config = Self::load_env();
        config.validate()?;
        Ok(config)
    }

    /// Read the environment without validating, so callers can layer
    /// overrides on top before calling [`Config::validate`].
    pub fn load_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            temp_dir: std::env::var("WEBPCONV_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            prefix: std::env::var("WEBPCONV_PREFIX").unwrap_or(defaults.prefix),
            extension: std::env::var("WEBPCONV_EXTENSION").unwrap_or(defaults.extension),
            strict_delete: std::env::var("WEBPCONV_STRICT_DELETE")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict_delete),
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: &Path) -> Self {
        self.temp_dir = temp_dir.to_path_buf();
        self
    }

    pub fn with_strict_delete(mut self, strict: bool) -> Self {
        self.strict_delete = strict;
        self
    }

    /// The temp directory is supplied by the environment, never created here.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.temp_dir.is_dir() {
            return Err(crate::Error::Config(format!(
                "temp directory {} does not exist",
                self.temp_dir.display()
            )));
        }
        if self.prefix.is_empty() || self.extension.is_empty() {
            return Err(crate::Error::Config(
                "file name prefix and extension must be non-empty".to_string(),
            ));
        }
        if self.prefix.contains(&['/', '\\'][..])
            || self.extension.contains(&['/', '\\', '.'][..])
        {
            return Err(crate::Error::Config(
                "file name prefix and extension must not contain separators".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
