//! Git output parsing functions

use std::path::PathBuf;

use super::{DETACHED, GitError, SHORT_HEAD_LEN, Worktree};

impl Worktree {
    /// Parse `git worktree list --porcelain` output.
    ///
    /// Records are separated by blank lines. Git lists the main worktree (or the
    /// bare root) first and the order is preserved.
    pub(crate) fn parse_porcelain_list(output: &str) -> Result<Vec<Self>, GitError> {
        let mut worktrees = Vec::new();
        let mut current: Option<Worktree> = None;

        for line in output.lines() {
            if line.is_empty() {
                if let Some(wt) = current.take() {
                    worktrees.push(finalize_worktree(wt));
                }
                continue;
            }

            let (key, value) = match line.split_once(' ') {
                Some((k, v)) => (k, Some(v)),
                None => (line, None),
            };

            match (key, current.as_mut()) {
                ("worktree", _) => {
                    if let Some(wt) = current.take() {
                        worktrees.push(finalize_worktree(wt));
                    }
                    let path = value.ok_or_else(|| GitError::ParseError {
                        message: "worktree line missing path".to_string(),
                    })?;
                    current = Some(Worktree {
                        path: PathBuf::from(path),
                        branch: String::new(),
                        head: String::new(),
                        bare: false,
                    });
                }
                ("HEAD", Some(wt)) => {
                    let sha = value.ok_or_else(|| GitError::ParseError {
                        message: "HEAD line missing SHA".to_string(),
                    })?;
                    wt.head = sha.chars().take(SHORT_HEAD_LEN).collect();
                }
                ("branch", Some(wt)) => {
                    let branch_ref = value.ok_or_else(|| GitError::ParseError {
                        message: "branch line missing ref".to_string(),
                    })?;
                    wt.branch = branch_ref
                        .strip_prefix("refs/heads/")
                        .unwrap_or(branch_ref)
                        .to_string();
                }
                ("bare", Some(wt)) => {
                    wt.bare = true;
                }
                _ => {
                    // detached, locked, prunable and unknown attributes carry nothing we record
                }
            }
        }

        // Output may not end with a blank line
        if let Some(wt) = current {
            worktrees.push(finalize_worktree(wt));
        }

        Ok(worktrees)
    }
}

/// A non-bare record without a branch line has a detached HEAD.
fn finalize_worktree(mut wt: Worktree) -> Worktree {
    if !wt.bare && wt.branch.is_empty() {
        wt.branch = DETACHED.to_string();
    }
    wt
}

/// Parse `git for-each-ref --format=%(refname:lstrip=2)` output into names.
///
/// Symbolic `<remote>/HEAD` entries are dropped.
pub(crate) fn parse_ref_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.ends_with("/HEAD") && *line != "HEAD")
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultBranchName(String);

impl DefaultBranchName {
    /// Parse `git symbolic-ref --short refs/remotes/<remote>/HEAD` output.
    pub(crate) fn from_remote_head(remote: &str, output: &str) -> Result<Self, GitError> {
        let trimmed = output.trim();

        let prefix = format!("{}/", remote);
        let branch = trimmed.strip_prefix(&prefix).unwrap_or(trimmed);

        if branch.is_empty() {
            return Err(GitError::ParseError {
                message: format!("Empty branch name from {}/HEAD", remote),
            });
        }

        Ok(Self(branch.to_string()))
    }

    pub(crate) fn into_string(self) -> String {
        self.0
    }
}
