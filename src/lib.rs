//! rmds - recursively remove macOS metadata files
//!
//! Walks a directory tree and deletes `.DS_Store` files (optionally also
//! AppleDouble `._*` files, or any single file name). The walk honours a depth
//! limit, directory-name exclusions and an optional single-filesystem
//! boundary; deletions can be previewed (dry run) or confirmed one by one.
//!
//! The command line front end lives in `main.rs`; everything it needs is
//! exported here so the engine can be driven without it.

pub mod config;
pub mod error;
pub mod patterns;
pub mod prompt;
pub mod report;
pub mod scanner;

// Re-export commonly used items
pub use config::CleanOptions;
pub use error::{Result, RmdsError};
pub use patterns::{TargetPattern, APPLE_DOUBLE_PREFIX, DS_STORE};
pub use prompt::{AlwaysYes, Confirm, LinePrompt};
pub use report::{ConsoleReporter, Notice, RecordingReporter, Reporter};
pub use scanner::{clean_path, root_device, CleanStats, Cleaner, Outcome};
