//! Runtime options for a cleaning run.

use std::collections::HashSet;
use std::ffi::OsStr;

use crate::patterns::TargetPattern;

/// Options controlling a cleaning run.
///
/// Built once by the command line layer and only borrowed by the walker, so
/// every starting path of a run sees the same policy.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Report what would be deleted without touching the filesystem
    pub dry_run: bool,
    /// Suppress everything except deletion failures
    pub quiet: bool,
    /// Report every directory entered and every skip decision
    pub verbose: bool,
    /// Ask before each deletion
    pub interactive: bool,
    /// Deepest level that is still scanned; the starting path is level 0
    pub max_depth: Option<usize>,
    /// Do not descend into directories on a different device than the root
    pub one_file_system: bool,
    /// Directory base names that are never entered
    pub excluded: HashSet<String>,
    pub target: TargetPattern,
}

impl CleanOptions {
    /// Check if a directory with this base name should be skipped
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        name.to_str().is_some_and(|n| self.excluded.contains(n))
    }

    /// Check if a directory at `depth` may still be opened
    pub fn within_depth(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth <= max)
    }

    /// Informational notices (deleted, would delete, banner)
    pub fn shows_info(&self) -> bool {
        !self.quiet
    }

    /// Per-directory progress and skip notices
    pub fn shows_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }
}
