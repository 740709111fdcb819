//! Device path normalization
//!
//! Paths in names are absolute with `/` separators, optionally carrying a
//! drive prefix (`/C:/data/file.csv`). Normalization collapses repeated
//! slashes, `.` and `..` lexically, then optionally resolves symlinks.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// One path segment as names spell it
pub(crate) const SEGMENT_PATTERN: &str = r"[\w.\-]+";

lazy_static! {
    static ref DRIVE_SEGMENT: Regex = Regex::new(r"^[A-Za-z]:$").unwrap();
    /// A normalized path the name grammar can carry
    pub(crate) static ref NAME_PATH: Regex = Regex::new(&format!(
        r"^/(?:[A-Za-z]:/)?(?:{segment}/)*{segment}$",
        segment = SEGMENT_PATTERN
    ))
    .unwrap();
}

/// Collapse repeated slashes, `.` and `..` without touching the filesystem
///
/// `..` never climbs above the root or the drive prefix.
pub fn normalize_lexically(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let mut drive: Option<&str> = None;

    for (position, segment) in path.split('/').filter(|s| !s.is_empty()).enumerate() {
        match segment {
            "." => {}
            ".." => {
                segments.pop();
            }
            s if position == 0 && DRIVE_SEGMENT.is_match(s) => drive = Some(s),
            s => segments.push(s),
        }
    }

    let mut normalized = String::from("/");
    if let Some(drive) = drive {
        normalized.push_str(drive);
        normalized.push('/');
    }
    normalized.push_str(&segments.join("/"));
    normalized
}

/// Normalize a device path, resolving symlinks when asked and possible
///
/// Paths that do not exist, or that resolve to something not expressible
/// in the name grammar, keep their lexical form.
pub fn normalize(path: &str, resolve_symlinks: bool) -> String {
    let lexical = normalize_lexically(path);
    if !resolve_symlinks || !Path::new(&lexical).exists() {
        return lexical;
    }

    match std::fs::canonicalize(&lexical) {
        Ok(resolved) => match resolved.to_str().map(normalize_lexically) {
            Some(candidate) if NAME_PATH.is_match(&candidate) => candidate,
            _ => {
                tracing::warn!(
                    "Resolved path {} cannot be written in a name, keeping {}",
                    resolved.display(),
                    lexical
                );
                lexical
            }
        },
        Err(e) => {
            tracing::warn!("Could not resolve {}: {}", lexical, e);
            lexical
        }
    }
}

/// Last path segment
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
