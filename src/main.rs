use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use humansize::{format_size, BINARY};
use rmds::{
    clean_path, AlwaysYes, CleanOptions, CleanStats, Confirm, ConsoleReporter, LinePrompt,
    TargetPattern,
};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Recursively delete .DS_Store files (and optionally AppleDouble ._* files)",
    long_about = None
)]
struct Args {
    /// Directories to scan (defaults to $HOME)
    paths: Vec<PathBuf>,

    /// Also delete AppleDouble files (names starting with "._")
    #[arg(long, short = 'a')]
    clean_all: bool,

    /// Show what would be deleted, but don't delete anything
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Only report errors (overrides --verbose)
    #[arg(long, short)]
    quiet: bool,

    /// Report every directory scanned and every directory skipped
    #[arg(long, short)]
    verbose: bool,

    /// Ask before deleting each file
    #[arg(long, short)]
    interactive: bool,

    /// Don't descend more than N directory levels below each starting path
    #[arg(long, short = 'd', value_name = "N")]
    max_depth: Option<usize>,

    /// Don't descend into directories on other filesystems
    #[arg(long, short = 'x')]
    one_file_system: bool,

    /// Directory names to skip (can be specified multiple times)
    #[arg(long, short, value_name = "DIR")]
    exclude: Vec<String>,

    /// File name to delete instead of .DS_Store
    #[arg(long, short = 'N', value_name = "NAME")]
    name: Option<String>,
}

impl TryFrom<&Args> for CleanOptions {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self> {
        let target = if args.clean_all {
            TargetPattern::CleanAll
        } else if let Some(name) = &args.name {
            TargetPattern::named(name.as_str()).context("invalid --name")?
        } else {
            TargetPattern::default()
        };

        Ok(CleanOptions {
            dry_run: args.dry_run,
            quiet: args.quiet,
            verbose: args.verbose,
            interactive: args.interactive,
            max_depth: args.max_depth,
            one_file_system: args.one_file_system,
            excluded: args.exclude.iter().cloned().collect(),
            target,
        })
    }
}

/// Explicit paths, or the home directory when none are given
fn start_paths(args: &Args) -> Result<Vec<PathBuf>> {
    if !args.paths.is_empty() {
        return Ok(args.paths.clone());
    }
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(vec![PathBuf::from(home)]),
        _ => bail!("Could not determine starting path: no path given and HOME is not set"),
    }
}

fn plural(count: u64) -> &'static str {
    if count == 1 {
        "file"
    } else {
        "files"
    }
}

fn print_summary(stats: &CleanStats, dry_run: bool) {
    if dry_run {
        println!(
            "{}",
            format!(
                "Dry run: {} {} would be deleted ({})",
                stats.would_delete,
                plural(stats.would_delete),
                format_size(stats.bytes, BINARY)
            )
            .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "Deleted {} {}, freed {}",
                stats.deleted,
                plural(stats.deleted),
                format_size(stats.bytes, BINARY)
            )
            .bold()
        );
    }

    if let Some(line) = kept_line(stats) {
        println!("{}", line.yellow());
    }
}

/// Files left in place and directories that could not be read, if any
fn kept_line(stats: &CleanStats) -> Option<String> {
    if stats.declined == 0 && stats.delete_failures == 0 && stats.dirs_unreadable == 0 {
        return None;
    }
    let mut line = format!(
        "Kept {} declined, {} failed to delete",
        stats.declined, stats.delete_failures
    );
    if stats.dirs_unreadable > 0 {
        line.push_str(&format!(
            ", skipped {} unreadable director{}",
            stats.dirs_unreadable,
            if stats.dirs_unreadable == 1 { "y" } else { "ies" }
        ));
    }
    Some(line)
}

fn run(args: &Args) -> Result<ExitCode> {
    let options = CleanOptions::try_from(args)?;
    let paths = start_paths(args)?;

    let mut reporter = ConsoleReporter;
    let mut confirm: Box<dyn Confirm> = if options.interactive {
        Box::new(LinePrompt::stdio())
    } else {
        Box::new(AlwaysYes)
    };

    let mut total = CleanStats::default();
    let mut unresolved = 0usize;

    for path in &paths {
        if options.shows_info() {
            println!("Scanning for {} in: {}", options.target, path.display());
        }

        match clean_path(path, &options, &mut reporter, confirm.as_mut()) {
            Ok(stats) => total += stats,
            Err(err) => {
                // Other starting paths are still processed
                eprintln!("{} {}", "Error:".red().bold(), err);
                unresolved += 1;
            }
        }
    }

    if options.shows_info() {
        print_summary(&total, options.dry_run);
    }

    Ok(if unresolved > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    // Usage errors exit 1, --help and --version exit 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = err.print();
            return code;
        }
    };

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
