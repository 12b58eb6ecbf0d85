//! On-device WebP transcoding with temp-file lifecycle management
//!
//! Converts raster images into WebP files in the platform temp directory,
//! and deletes them again individually or in bulk by their name pattern.

pub mod cleanup;
pub mod codec;
pub mod convert;
pub mod error;
pub mod models;
pub mod naming;
pub mod plugin;
pub mod uri;

pub use error::{Error, Result};
