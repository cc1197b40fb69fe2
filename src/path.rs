//! Path normalization
//!
//! Remote paths are absolute, `/`-separated and free of `.`/`..` segments.
//! Backslashes are not treated as separators.

use crate::error::{FsError, Result};

const INVALID_CHARS: &[char] = &['\0'];

/// Validate `path` and return its normalized absolute form
///
/// # Errors
///
/// Returns [`FsError::InvalidPath`] if the path contains a NUL character or
/// a `..` segment climbs above the root.
pub fn normalize(path: &str) -> Result<String> {
    if path.contains(INVALID_CHARS) {
        return Err(FsError::InvalidPath {
            path: path.to_string(),
            reason: "path contains invalid characters",
        });
    }

    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.pop().is_none() {
                    return Err(FsError::InvalidPath {
                        path: path.to_string(),
                        reason: "back reference escapes the root",
                    });
                }
            }
            other => parts.push(other),
        }
    }

    Ok(format!("/{}", parts.join("/")))
}

/// Check whether a normalized path is the root
#[must_use]
pub fn is_root(path: &str) -> bool {
    path == "/"
}

/// Join a child name onto a normalized directory path
#[must_use]
pub fn join(base: &str, name: &str) -> String {
    let name = name.trim_start_matches('/');
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Final component of a normalized path (empty for the root)
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Parent of a normalized path (the root is its own parent)
#[must_use]
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

/// Prefix a normalized path with the configured remote root
///
/// `root` is itself normalized; `None` or `/` leaves the path untouched.
#[must_use]
pub fn with_root(root: Option<&str>, path: &str) -> String {
    match root {
        Some(root) if !is_root(root) => {
            if is_root(path) {
                root.to_string()
            } else {
                format!("{root}{path}")
            }
        }
        _ => path.to_string(),
    }
}
