//! Git operations and repository management

use std::path::{Path, PathBuf};

mod context;
mod error;
mod parse;
mod repository;

pub use context::RepoContext;
pub use error::{
    // Typed error enum (Display produces styled output)
    GitError,
    // Special-handling error enum (Display produces styled output)
    WtError,
    // Error inspection functions
    exit_code,
};
pub use repository::Repository;

pub(crate) use parse::DefaultBranchName;

/// Branch sentinel recorded for a worktree with a detached HEAD.
pub const DETACHED: &str = "[detached]";

/// Length of the abbreviated commit id shown for each worktree.
pub const SHORT_HEAD_LEN: usize = 7;

/// Which lifecycle point a hook command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum HookType {
    /// Runs in a new worktree after it has been added and populated.
    #[strum(serialize = "create hook")]
    Create,
    /// Runs in a worktree right before it is removed.
    #[strum(serialize = "delete hook")]
    Delete,
}

/// Snapshot of one entry of `git worktree list --porcelain`.
///
/// `branch` is the short branch name, [`DETACHED`] for a detached HEAD, or
/// empty for a bare repository root. `head` is abbreviated to
/// [`SHORT_HEAD_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Worktree {
    pub path: PathBuf,
    pub branch: String,
    pub head: String,
    pub bare: bool,
}

impl Worktree {
    pub fn is_detached(&self) -> bool {
        self.branch == DETACHED
    }

    /// The branch this worktree has checked out, if any.
    pub fn checked_out_branch(&self) -> Option<&str> {
        if self.bare || self.is_detached() || self.branch.is_empty() {
            None
        } else {
            Some(&self.branch)
        }
    }

    /// Final path component, used when reporting on a worktree.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether this record points at `path`, comparing canonical forms when possible.
    pub fn is_at(&self, path: &Path) -> bool {
        match (dunce::canonicalize(&self.path), dunce::canonicalize(path)) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.path == path,
        }
    }
}
