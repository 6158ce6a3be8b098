//! Output layer for `git wt` commands.
//!
//! stdout carries only what the shell wrapper or a script consumes:
//! the worktree path, the list, delete status lines and `--init` scripts.
//! Everything else goes to stderr. Both streams go through `anstream`, so
//! styling is stripped when the stream is not a terminal.
//!
//! ## Usage
//!
//! ```rust,ignore
//! output::print(progress_message("Running create hook"))?;
//! output::worktree_path(&path, withhold)?;
//! ```

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use git_wt::path::format_path_for_display;
use git_wt::styling::info_message;

/// Write a status line to stderr.
pub fn print(message: impl Display) -> io::Result<()> {
    let mut stderr = anstream::stderr().lock();
    writeln!(stderr, "{message}")?;
    stderr.flush()
}

/// Write a line to stdout.
pub fn stdout(line: impl Display) -> io::Result<()> {
    let mut stdout = anstream::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()
}

/// Write a pre-rendered block (script, JSON) to stdout as-is.
pub fn stdout_raw(text: &str) -> io::Result<()> {
    let mut stdout = anstream::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}

/// Emit the worktree path the wrapper should change into.
///
/// With `withhold` the path is shown on stderr instead, so the wrapper sees no
/// directory and stays put.
pub fn worktree_path(path: &Path, withhold: bool) -> io::Result<()> {
    if withhold {
        print(info_message(format!(
            "Worktree at {}",
            format_path_for_display(path)
        )))
    } else {
        stdout(path.display())
    }
}
