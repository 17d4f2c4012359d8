//! Notices emitted while cleaning, and where they are printed.

use std::io;
use std::path::Path;

use colored::Colorize;

/// Everything the walker has to say about a path.
///
/// The walker decides which notices are due (quiet and verbose policy);
/// a [`Reporter`] only decides how they look.
#[derive(Debug)]
pub enum Notice<'a> {
    Scanning(&'a Path),
    SkippedExcluded(&'a Path),
    SkippedOtherFilesystem(&'a Path),
    SkippedUnreadable(&'a Path),
    Declined(&'a Path),
    WouldDelete(&'a Path),
    Deleted(&'a Path),
    OpenFailed(&'a Path, &'a io::Error),
    ReadFailed(&'a Path, &'a io::Error),
    StatFailed(&'a Path, &'a io::Error),
    DeleteFailed(&'a Path, &'a io::Error),
}

impl Notice<'_> {
    /// Errors go to the error channel
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::OpenFailed(..)
                | Notice::ReadFailed(..)
                | Notice::StatFailed(..)
                | Notice::DeleteFailed(..)
        )
    }

    /// Plain one-line rendering, without colors
    pub fn message(&self) -> String {
        match self {
            Notice::Scanning(p) => format!("Scanning: {}", p.display()),
            Notice::SkippedExcluded(p) => {
                format!("Skipping excluded directory: {}", p.display())
            }
            Notice::SkippedOtherFilesystem(p) => {
                format!("Skipping directory on another filesystem: {}", p.display())
            }
            Notice::SkippedUnreadable(p) => {
                format!("Skipping unreadable directory: {}", p.display())
            }
            Notice::Declined(p) => format!("Skipping: {}", p.display()),
            Notice::WouldDelete(p) => format!("Would delete: {}", p.display()),
            Notice::Deleted(p) => format!("Deleted: {}", p.display()),
            Notice::OpenFailed(p, e) => {
                format!("cannot open directory {}: {}", p.display(), e)
            }
            Notice::ReadFailed(p, e) => {
                format!("cannot read entry in {}: {}", p.display(), e)
            }
            Notice::StatFailed(p, e) => format!("cannot stat {}: {}", p.display(), e),
            Notice::DeleteFailed(p, e) => {
                format!("failed to delete {}: {}", p.display(), e)
            }
        }
    }
}

/// Sink for walker notices
pub trait Reporter {
    fn report(&mut self, notice: Notice<'_>);
}

/// Prints notices to stdout, and errors to stderr
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, notice: Notice<'_>) {
        if notice.is_error() {
            eprintln!("{} {}", "Error:".red().bold(), notice.message());
        } else {
            println!("{}", notice.message());
        }
    }
}

/// Keeps every notice as text; used by tests and by callers that want to
/// post-process the run.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, notice: Notice<'_>) {
        if notice.is_error() {
            self.errors.push(notice.message());
        } else {
            self.lines.push(notice.message());
        }
    }
}
