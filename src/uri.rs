//! `file://` URI handling
//!
//! Hosts hand over either bare paths or `file://` URIs; both resolve to the
//! same filesystem path. Output is always rendered as an absolute URI.

use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Characters that must be escaped inside the path component of a URI.
const PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Strip a `file://` scheme (and optional `localhost` authority) and
/// percent-decode the rest. Returns `None` for blank input.
pub fn to_file_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let path = match strip_scheme(trimmed) {
        Some(rest) => {
            let rest = rest.strip_prefix("localhost").unwrap_or(rest);
            decode_path(rest)
        }
        None => OsString::from(trimmed),
    };

    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Render an absolute path as a `file://` URI.
pub fn to_file_uri(path: &Path) -> String {
    let raw = path_bytes(path);
    let leading = if raw.first() == Some(&b'/') { "" } else { "/" };
    format!(
        "{}{}{}",
        FILE_SCHEME,
        leading,
        percent_encode(&raw, PATH_SET)
    )
}

// Unix paths are arbitrary bytes; escapes carry them through unchanged.
#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().replace('\\', "/").into_bytes()
}

#[cfg(unix)]
fn decode_path(encoded: &str) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(percent_decode_str(encoded).collect())
}

#[cfg(not(unix))]
fn decode_path(encoded: &str) -> OsString {
    OsString::from(percent_decode_str(encoded).decode_utf8_lossy().into_owned())
}

fn strip_scheme(input: &str) -> Option<&str> {
    let head = input.get(..FILE_SCHEME.len())?;
    if head.eq_ignore_ascii_case(FILE_SCHEME) {
        Some(&input[FILE_SCHEME.len()..])
    } else {
        None
    }
}
