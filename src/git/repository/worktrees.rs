//! Worktree management operations for Repository.

use std::path::Path;

use super::{GitError, Repository};
use crate::git::Worktree;

impl Repository {
    /// List all worktrees for this repository.
    ///
    /// **Ordering:** Git lists the main worktree first. For bare repositories the
    /// first entry is the bare root, recorded with `bare: true` and an empty branch.
    pub fn list_worktrees(&self) -> anyhow::Result<Vec<Worktree>> {
        let stdout = self.run_command(&["worktree", "list", "--porcelain"])?;
        Ok(Worktree::parse_porcelain_list(&stdout)?)
    }

    /// Create a worktree at `path` checked out at `branch`.
    ///
    /// With `create_branch`, a new branch is created from `start_point` (or HEAD).
    /// Without it `start_point` is ignored; git creates a local tracking branch
    /// when `branch` only exists on a remote.
    pub fn add_worktree(
        &self,
        path: &Path,
        branch: &str,
        start_point: Option<&str>,
        create_branch: bool,
    ) -> anyhow::Result<()> {
        let path_str = path.to_string_lossy();
        let mut args = vec!["worktree", "add"];
        if create_branch {
            args.extend(["-b", branch, path_str.as_ref()]);
            if let Some(start) = start_point {
                args.push(start);
            }
        } else {
            args.extend([path_str.as_ref(), branch]);
        }

        self.run_mutation(&args).map_err(|e| match e.downcast::<GitError>() {
            Ok(GitError::CommandFailed { output, .. }) => GitError::WorktreeCreationFailed {
                branch: branch.to_string(),
                path: path.to_path_buf(),
                error: output,
            }
            .into(),
            Ok(other) => other.into(),
            Err(e) => e,
        })
    }

    /// Remove the worktree at `path`. Without `force`, git refuses a dirty tree.
    pub fn remove_worktree(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        let path_str = path.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(path_str.as_ref());

        self.run_mutation(&args).map_err(|e| match e.downcast::<GitError>() {
            Ok(GitError::CommandFailed { output, .. }) => GitError::WorktreeRemovalFailed {
                path: path.to_path_buf(),
                error: output,
            }
            .into(),
            Ok(other) => other.into(),
            Err(e) => e,
        })
    }

    /// Remove administrative entries for worktrees whose directories are gone.
    pub fn prune_worktrees(&self) -> anyhow::Result<()> {
        self.run_mutation(&["worktree", "prune"])
    }
}
