//! Directory walking and the delete-or-skip decision.

use crate::config::CleanOptions;
use crate::error::{is_permission_denied, Result, RmdsError};
use crate::prompt::Confirm;
use crate::report::{Notice, Reporter};

use std::cell::RefCell;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counters for a cleaning run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanStats {
    pub dirs_scanned: u64,
    /// Directories skipped because access was denied
    pub dirs_unreadable: u64,
    /// Entries matching the target pattern, whatever happened to them
    pub matched: u64,
    pub deleted: u64,
    pub would_delete: u64,
    pub declined: u64,
    pub delete_failures: u64,
    /// Open, read and stat failures below the starting path
    pub errors: u64,
    /// Size of deleted files, or of files a dry run would delete
    pub bytes: u64,
}

impl AddAssign for CleanStats {
    fn add_assign(&mut self, other: Self) {
        self.dirs_scanned += other.dirs_scanned;
        self.dirs_unreadable += other.dirs_unreadable;
        self.matched += other.matched;
        self.deleted += other.deleted;
        self.would_delete += other.would_delete;
        self.declined += other.declined;
        self.delete_failures += other.delete_failures;
        self.errors += other.errors;
        self.bytes += other.bytes;
    }
}

/// What happened to a single non-directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NoMatch,
    Declined,
    WouldDelete,
    Deleted,
    Failed,
}

/// Device identifier of a path, following symlinks so it describes the
/// directory that will actually be read.
pub fn root_device(path: &Path) -> Result<Option<u64>> {
    let metadata = fs::metadata(path).map_err(|source| RmdsError::RootMetadata {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(device_of(&metadata))
}

#[cfg(unix)]
fn device_of(metadata: &fs::Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.dev())
}

#[cfg(not(unix))]
fn device_of(_metadata: &fs::Metadata) -> Option<u64> {
    // No comparable device ids; the filesystem boundary check never fires
    None
}

/// Directories the walker refused to enter, recorded by the entry filter
/// and reported once control is back in the walk loop
enum Pruned {
    Excluded(PathBuf),
    OtherFilesystem(PathBuf),
    StatFailed(PathBuf, io::Error),
}

/// Entry filter for the walk: decides whether a subdirectory is entered.
/// Files and the starting path itself always pass.
fn keep_entry(
    entry: &walkdir::DirEntry,
    options: &CleanOptions,
    root_device: Option<u64>,
    pruned: &RefCell<Vec<Pruned>>,
) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }

    if options.is_excluded(entry.file_name()) {
        pruned
            .borrow_mut()
            .push(Pruned::Excluded(entry.path().to_path_buf()));
        return false;
    }

    if options.one_file_system {
        match entry.metadata() {
            Ok(metadata) => {
                if crosses_filesystem(root_device, &metadata) {
                    pruned
                        .borrow_mut()
                        .push(Pruned::OtherFilesystem(entry.path().to_path_buf()));
                    return false;
                }
            }
            Err(err) => {
                pruned.borrow_mut().push(Pruned::StatFailed(
                    entry.path().to_path_buf(),
                    io::Error::from(err),
                ));
                return false;
            }
        }
    }

    true
}

fn crosses_filesystem(root_device: Option<u64>, metadata: &fs::Metadata) -> bool {
    match (root_device, device_of(metadata)) {
        (Some(root), Some(dev)) => root != dev,
        _ => false,
    }
}

/// The I/O error behind a walk error, or a stand-in carrying its message
fn io_error_of(err: &walkdir::Error) -> io::Error {
    match err.io_error() {
        Some(io_err) => io::Error::new(io_err.kind(), io_err.to_string()),
        None => io::Error::other(err.to_string()),
    }
}

/// Walks directory trees and removes target files.
///
/// One `Cleaner` serves one starting path: the root device is captured for
/// that path, while the options are shared with the rest of the run.
pub struct Cleaner<'a> {
    options: &'a CleanOptions,
    reporter: &'a mut dyn Reporter,
    confirm: &'a mut dyn Confirm,
    root_device: Option<u64>,
    stats: CleanStats,
}

impl<'a> Cleaner<'a> {
    pub fn new(
        options: &'a CleanOptions,
        reporter: &'a mut dyn Reporter,
        confirm: &'a mut dyn Confirm,
    ) -> Self {
        Self {
            options,
            reporter,
            confirm,
            root_device: None,
            stats: CleanStats::default(),
        }
    }

    /// Set the device that subdirectories must share when
    /// `one_file_system` is on
    pub fn with_root_device(mut self, device: Option<u64>) -> Self {
        self.root_device = device;
        self
    }

    pub fn stats(&self) -> &CleanStats {
        &self.stats
    }

    pub fn into_stats(self) -> CleanStats {
        self.stats
    }

    /// Walk the tree under `path`, which sits at `depth` below the root.
    ///
    /// Depth-first and pre-order. Errors below `path` are reported and never
    /// stop the walk.
    pub fn walk(&mut self, path: &Path, depth: usize) {
        let options = self.options;

        let mut walker = WalkDir::new(path)
            .follow_links(false)
            .contents_first(false);

        // Pruned at the boundary: a directory at max_depth is still scanned,
        // one below it is never opened. walkdir counts the files of the
        // starting directory as depth 1, hence the extra level.
        let scan_limit = match options.max_depth {
            Some(_) if !options.within_depth(depth) => return,
            Some(max) => {
                let limit = max - depth + 1;
                walker = walker.max_depth(limit);
                Some(limit)
            }
            None => None,
        };

        let pruned = RefCell::new(Vec::new());
        let pruned_log = &pruned;
        let root_device = self.root_device;
        let entries = walker
            .into_iter()
            .filter_entry(move |entry| keep_entry(entry, options, root_device, pruned_log));

        // A directory is yielded before walkdir reads it; an open failure
        // shows up as the very next item, carrying the directory's path
        let mut opening: Option<PathBuf> = None;

        for item in entries {
            if let Some(dir) = opening.take() {
                match &item {
                    Err(err) if err.path() == Some(dir.as_path()) => {
                        self.open_failed(&dir, err);
                        continue;
                    }
                    _ => self.entered(&dir),
                }
            }
            self.report_pruned(&pruned);

            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    self.entry_failed(path, &err);
                    continue;
                }
            };

            if entry.depth() == 0 {
                // The starting path may be a symlink to a directory
                if entry.path().is_dir() {
                    opening = Some(entry.into_path());
                } else {
                    self.not_a_directory(entry.path());
                }
                continue;
            }

            if entry.file_type().is_dir() {
                if scan_limit.is_none_or(|limit| entry.depth() < limit) {
                    opening = Some(entry.into_path());
                }
                continue;
            }

            // Never follows links: a symlink is judged like a file
            let metadata = match entry.metadata() {
                Ok(meta) => meta,
                Err(err) => {
                    self.entry_failed(path, &err);
                    continue;
                }
            };
            self.consider(entry.file_name(), entry.path(), &metadata);
        }

        if let Some(dir) = opening.take() {
            self.entered(&dir);
        }
        self.report_pruned(&pruned);
    }

    fn entered(&mut self, dir: &Path) {
        self.stats.dirs_scanned += 1;
        if self.options.shows_verbose() {
            self.reporter.report(Notice::Scanning(dir));
        }
    }

    fn open_failed(&mut self, dir: &Path, err: &walkdir::Error) {
        let io_err = io_error_of(err);
        if is_permission_denied(&io_err) {
            self.stats.dirs_unreadable += 1;
            if self.options.shows_verbose() {
                self.reporter.report(Notice::SkippedUnreadable(dir));
            }
            return;
        }

        self.stats.errors += 1;
        if self.options.shows_info() {
            self.reporter.report(Notice::OpenFailed(dir, &io_err));
        }
    }

    fn not_a_directory(&mut self, path: &Path) {
        self.stats.errors += 1;
        if self.options.shows_info() {
            let err = io::Error::from(io::ErrorKind::NotADirectory);
            self.reporter.report(Notice::OpenFailed(path, &err));
        }
    }

    /// Stat or read failure for a single entry; `dir` stands in when the
    /// error carries no path
    fn entry_failed(&mut self, dir: &Path, err: &walkdir::Error) {
        self.stats.errors += 1;
        if !self.options.shows_info() {
            return;
        }

        let io_err = io_error_of(err);
        match err.path() {
            Some(path) => self.reporter.report(Notice::StatFailed(path, &io_err)),
            None => self.reporter.report(Notice::ReadFailed(dir, &io_err)),
        }
    }

    fn report_pruned(&mut self, pruned: &RefCell<Vec<Pruned>>) {
        let options = self.options;
        for skipped in pruned.borrow_mut().drain(..) {
            match skipped {
                Pruned::Excluded(dir) => {
                    if options.shows_verbose() {
                        self.reporter.report(Notice::SkippedExcluded(&dir));
                    }
                }
                Pruned::OtherFilesystem(dir) => {
                    if options.shows_verbose() {
                        self.reporter.report(Notice::SkippedOtherFilesystem(&dir));
                    }
                }
                Pruned::StatFailed(dir, err) => {
                    self.stats.errors += 1;
                    if options.shows_info() {
                        self.reporter.report(Notice::StatFailed(&dir, &err));
                    }
                }
            }
        }
    }

    /// Decide what to do with one non-directory entry and do it.
    ///
    /// Each entry is judged on its own name and the options only, never on
    /// what happened to its siblings.
    pub fn consider(
        &mut self,
        name: &OsStr,
        full_path: &Path,
        metadata: &fs::Metadata,
    ) -> Outcome {
        let options = self.options;

        if !options.target.matches(name) {
            return Outcome::NoMatch;
        }
        self.stats.matched += 1;

        if options.interactive && !self.confirm.confirm(full_path) {
            self.stats.declined += 1;
            if options.shows_verbose() {
                self.reporter.report(Notice::Declined(full_path));
            }
            return Outcome::Declined;
        }

        if options.dry_run {
            self.stats.would_delete += 1;
            self.stats.bytes += metadata.len();
            if options.shows_info() {
                self.reporter.report(Notice::WouldDelete(full_path));
            }
            return Outcome::WouldDelete;
        }

        match fs::remove_file(full_path) {
            Ok(()) => {
                self.stats.deleted += 1;
                self.stats.bytes += metadata.len();
                if options.shows_info() {
                    self.reporter.report(Notice::Deleted(full_path));
                }
                Outcome::Deleted
            }
            Err(err) => {
                // Reported even in quiet mode
                self.stats.delete_failures += 1;
                self.reporter.report(Notice::DeleteFailed(full_path, &err));
                Outcome::Failed
            }
        }
    }
}

/// Clean one starting path.
///
/// Fails only when the starting path itself cannot be stat'ed; everything
/// below it is reported through `reporter`.
pub fn clean_path(
    start: &Path,
    options: &CleanOptions,
    reporter: &mut dyn Reporter,
    confirm: &mut dyn Confirm,
) -> Result<CleanStats> {
    let device = root_device(start)?;

    let mut cleaner = Cleaner::new(options, reporter, confirm).with_root_device(device);
    cleaner.walk(start, 0);
    Ok(cleaner.into_stats())
}
