//! Collision-resistant names for converted files
//!
//! The name pattern is also the only way bulk cleanup recognises files this
//! crate created, so [`TempFileNamer::matches`] must stay the exact inverse of
//! [`TempFileNamer::next_name`].

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Shared by every namer in the process so two namers with the same prefix
/// still never hand out the same token.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct TempFileNamer {
    prefix: String,
    suffix: String,
}

impl Default for TempFileNamer {
    fn default() -> Self {
        Self::new("converted", "webp")
    }
}

impl TempFileNamer {
    pub fn new(prefix: &str, extension: &str) -> Self {
        Self {
            prefix: format!("{}_", prefix),
            suffix: format!(".{}", extension),
        }
    }

    /// `<prefix>_<millis>-<seq>-<rand>.<ext>`
    pub fn next_name(&self) -> String {
        let millis = Utc::now().timestamp_millis();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let uuid = Uuid::new_v4().simple().to_string();
        format!(
            "{}{}-{}-{}{}",
            self.prefix,
            millis,
            seq,
            &uuid[..8],
            self.suffix
        )
    }

    pub fn matches(&self, name: &str) -> bool {
        name.len() > self.prefix.len() + self.suffix.len()
            && name.starts_with(&self.prefix)
            && name.ends_with(&self.suffix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}
