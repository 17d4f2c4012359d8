use rmds::{clean_path, AlwaysYes, CleanOptions, RecordingReporter, TargetPattern};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Helper function to create a nested tree with targets at several depths
fn create_test_directory(root: &Path) -> std::io::Result<()> {
    let files: &[(&str, &str)] = &[
        (".DS_Store", "root meta"),
        ("README.md", "# readme"),
        ("photos/.DS_Store", "photos meta"),
        ("photos/._IMG_0001.JPG", "resource fork"),
        ("photos/IMG_0001.JPG", "jpeg bytes"),
        ("photos/2024/.DS_Store", "2024 meta"),
        ("photos/2024/trip/._notes.txt", "xattrs"),
        ("photos/2024/trip/notes.txt", "notes"),
        ("code/project/.DS_Store", "project meta"),
        ("code/project/src/main.rs", "fn main() {}"),
        ("code/project/node_modules/pkg/.DS_Store", "pkg meta"),
        ("code/project/node_modules/pkg/index.js", "module.exports = {}"),
        ("empty/.keep", ""),
    ];

    for (rel, contents) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, contents)?;
    }
    Ok(())
}

/// Every regular file under `root`, keyed by path, with its contents
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.insert(path.clone(), fs::read(&path).unwrap());
            }
        }
    }
    files
}

fn reported_paths(reporter: &RecordingReporter, prefix: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = reporter
        .lines
        .iter()
        .filter_map(|l| l.strip_prefix(prefix))
        .map(PathBuf::from)
        .collect();
    paths.sort();
    paths
}

fn run(root: &Path, options: &CleanOptions) -> RecordingReporter {
    let mut reporter = RecordingReporter::new();
    clean_path(root, options, &mut reporter, &mut AlwaysYes).unwrap();
    reporter
}

#[test]
fn test_dry_run_predicts_real_run() {
    let dir = tempdir().unwrap();
    create_test_directory(dir.path()).unwrap();
    let before = snapshot(dir.path());

    let dry = run(
        dir.path(),
        &CleanOptions {
            dry_run: true,
            ..Default::default()
        },
    );
    assert_eq!(snapshot(dir.path()), before, "dry run must not touch files");

    let real = run(dir.path(), &CleanOptions::default());

    let would = reported_paths(&dry, "Would delete: ");
    let deleted = reported_paths(&real, "Deleted: ");
    assert_eq!(would.len(), 5);
    assert_eq!(would, deleted);
}

#[test]
fn test_only_targets_are_removed() {
    let dir = tempdir().unwrap();
    create_test_directory(dir.path()).unwrap();
    let before = snapshot(dir.path());

    run(dir.path(), &CleanOptions::default());
    let after = snapshot(dir.path());

    for (path, contents) in &before {
        let is_target = path.file_name().is_some_and(|n| n == ".DS_Store");
        if is_target {
            assert!(!after.contains_key(path), "{} survived", path.display());
        } else {
            assert_eq!(after.get(path), Some(contents), "{} changed", path.display());
        }
    }
}

#[test]
fn test_clean_all_with_exclusion_and_depth() {
    let dir = tempdir().unwrap();
    create_test_directory(dir.path()).unwrap();

    let options = CleanOptions {
        target: TargetPattern::CleanAll,
        excluded: ["node_modules".to_string()].into_iter().collect(),
        max_depth: Some(2),
        ..Default::default()
    };
    run(dir.path(), &options);

    let root = dir.path();
    assert!(!root.join(".DS_Store").exists());
    assert!(!root.join("photos/._IMG_0001.JPG").exists());
    assert!(!root.join("photos/2024/.DS_Store").exists());
    assert!(!root.join("code/project/.DS_Store").exists());
    // Depth 3
    assert!(root.join("photos/2024/trip/._notes.txt").exists());
    // Excluded
    assert!(root.join("code/project/node_modules/pkg/.DS_Store").exists());
    // Not targets
    assert!(root.join("photos/IMG_0001.JPG").exists());
    assert!(root.join("empty/.keep").exists());
}

#[test]
fn test_second_run_finds_nothing() {
    let dir = tempdir().unwrap();
    create_test_directory(dir.path()).unwrap();

    run(dir.path(), &CleanOptions::default());
    let mut reporter = RecordingReporter::new();
    let options = CleanOptions::default();
    let stats = clean_path(dir.path(), &options, &mut reporter, &mut AlwaysYes).unwrap();

    assert_eq!(stats.matched, 0);
    assert!(reporter.lines.is_empty());
}
