//! Normalized document locations and reference resolution.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, Result};

/// A normalized document location.
///
/// Two references to the same document must normalize to equal
/// locations; cycle detection and caching compare these strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Wrap an already-normalized location string.
    pub fn new(normalized: impl Into<String>) -> Self {
        Location(normalized.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// View the location as a filesystem path.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns parent references into normalized locations.
pub trait LocationResolver {
    /// Normalize a caller-supplied location (the root document's own).
    fn normalize(&self, raw: &str) -> Location;

    /// Resolve `reference` as written in the document located at `base`.
    fn resolve(&self, reference: &str, base: &Location) -> Result<Location>;
}

/// Path-based resolution: join onto the referring document's directory,
/// then fold `.` and `..` lexically.
///
/// Symlinks are not followed, so two different link paths to one file
/// normalize to different locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLocationResolver;

impl LocationResolver for PathLocationResolver {
    fn normalize(&self, raw: &str) -> Location {
        Location(path_to_string(&normalize_path(Path::new(raw))))
    }

    fn resolve(&self, reference: &str, base: &Location) -> Result<Location> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ComposeError::InvalidReference {
                reference: reference.to_string(),
                base: base.to_string(),
                detail: "empty reference".into(),
            });
        }

        let dir = base.as_path().parent().unwrap_or_else(|| Path::new(""));
        let joined = dir.join(reference);
        Ok(Location(path_to_string(&normalize_path(&joined))))
    }
}

/// Lexically normalize a path.
///
/// Leading `..` components of a relative path are kept; `..` at the
/// root of an absolute path is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
