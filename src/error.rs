//! Error handling and custom error types
//!
//! Every public operation reports failures through this taxonomy; the
//! boundary layer flattens it into a `{ code, message }` pair.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing {0}")]
    MissingInput(&'static str),

    #[error("Failed to load image at path: {}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("WebP encoding failed: {0}")]
    EncodingFailed(#[from] EncodeError),

    #[error("Failed to write WebP file {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Delete failed for {}: {source}", .path.display())]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to delete {}: not a converter temp file", .0.display())]
    ForeignPath(PathBuf),

    #[error("Clear failed: cannot read {}: {source}", .path.display())]
    EnumerationError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    /// Stable name of the error class, used as the boundary error code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingInput(_) => "MissingInput",
            Error::SourceUnreadable { .. } => "SourceUnreadable",
            Error::EncodingFailed(_) => "EncodingFailed",
            Error::WriteFailed { .. } => "WriteFailed",
            Error::NotFound(_) => "NotFound",
            Error::DeleteFailed { .. } => "DeleteFailed",
            Error::ForeignPath(_) => "ForeignPath",
            Error::EnumerationError { .. } => "EnumerationError",
            Error::UnknownMethod(_) => "UnknownMethod",
            Error::Serialization(_) => "Serialization",
            Error::Config(_) => "Config",
            Error::Invariant(_) => "Invariant",
        }
    }
}

/// Failure to turn a source file into pixels.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure to turn pixels into WebP bytes.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("image has zero width or height")]
    EmptyImage,

    #[error("codec rejected image: {0}")]
    Codec(String),
}

pub type Result<T> = std::result::Result<T, Error>;
