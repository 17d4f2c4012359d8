//! Error types for the cleaning core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, RmdsError>;

/// Errors that stop work on a whole starting path.
///
/// Failures below the starting path (unreadable directories, entries that
/// cannot be stat'ed, files that cannot be removed) are reported through the
/// [`Reporter`](crate::report::Reporter) and never surface here.
#[derive(Debug, Error)]
pub enum RmdsError {
    #[error("cannot access starting path {path}: {source}")]
    RootMetadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid target name {name:?}: {reason}")]
    InvalidTargetName { name: String, reason: &'static str },
}

/// Access-denied class errors are an expected condition on protected system
/// directories and are downgraded to a skip notice.
pub fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}
