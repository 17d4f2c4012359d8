//! Target name matching for macOS metadata files.

use std::ffi::OsStr;
use std::fmt;

use crate::error::{Result, RmdsError};

/// Finder folder metadata file
pub const DS_STORE: &str = ".DS_Store";

/// Prefix of AppleDouble companion files (resource forks, extended attributes)
pub const APPLE_DOUBLE_PREFIX: &str = "._";

/// Which directory entries count as deletion targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPattern {
    /// Exact, case-sensitive base name match
    Name(String),
    /// `.DS_Store` plus every `._*` AppleDouble file
    CleanAll,
}

impl Default for TargetPattern {
    fn default() -> Self {
        TargetPattern::Name(DS_STORE.to_string())
    }
}

impl TargetPattern {
    /// Build a name pattern, rejecting names that can never match a base name
    pub fn named(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RmdsError::InvalidTargetName {
                name,
                reason: "name must not be empty",
            });
        }
        if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            return Err(RmdsError::InvalidTargetName {
                name,
                reason: "name must be a base name, not a path",
            });
        }
        if name == "." || name == ".." {
            return Err(RmdsError::InvalidTargetName {
                name,
                reason: "name must not be a directory alias",
            });
        }
        Ok(TargetPattern::Name(name))
    }

    /// Check whether an entry's base name is a deletion target.
    ///
    /// Comparison is done on the raw name so non-UTF-8 file names are
    /// matched (or rejected) without lossy conversion.
    pub fn matches(&self, name: &OsStr) -> bool {
        match self {
            TargetPattern::Name(target) => name == OsStr::new(target),
            TargetPattern::CleanAll => {
                name == OsStr::new(DS_STORE)
                    || name
                        .as_encoded_bytes()
                        .starts_with(APPLE_DOUBLE_PREFIX.as_bytes())
            }
        }
    }
}

impl fmt::Display for TargetPattern {
    /// Human description used in the scan banner
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetPattern::Name(name) => write!(f, "{} files", name),
            TargetPattern::CleanAll => {
                write!(f, "{} and {}* files", DS_STORE, APPLE_DOUBLE_PREFIX)
            }
        }
    }
}
