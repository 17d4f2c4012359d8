//! Per-file confirmation for interactive mode.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Asks whether a target file may be deleted
pub trait Confirm {
    fn confirm(&mut self, path: &Path) -> bool;
}

/// Never asks; every target is approved. Used when interactive mode is off.
#[derive(Debug, Default)]
pub struct AlwaysYes;

impl Confirm for AlwaysYes {
    fn confirm(&mut self, _path: &Path) -> bool {
        true
    }
}

/// Line-oriented `[y/N]` prompt over any reader/writer pair
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's standard streams
    pub fn stdio() -> Self {
        LinePrompt::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    fn confirm(&mut self, path: &Path) -> bool {
        if write!(self.output, "Delete {}? [y/N] ", path.display())
            .and_then(|_| self.output.flush())
            .is_err()
        {
            return false;
        }

        // read_line takes the whole line, so nothing is left over for the
        // next prompt
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

/// Only the first character counts: `y`, `Y`, `yes`, `Yep` all approve
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.chars().next(), Some('y' | 'Y'))
}
