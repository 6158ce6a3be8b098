//! The typed façade over the `git` executable.
//!
//! Every git invocation made by git-wt goes through [`Repository::run_command`]
//! (or one of its variants), which logs the command and converts a non-zero exit
//! into [`GitError::CommandFailed`] carrying the argv, exit code and output.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use dunce::canonicalize;
use once_cell::sync::OnceCell;

use super::{DefaultBranchName, GitError, RepoContext, parse::parse_ref_names};

mod worktrees;


/// Per-instance cache of values that are stable for one invocation.
#[derive(Debug, Default)]
struct RepoCache {
    git_common_dir: OnceCell<PathBuf>,
    worktree_root: OnceCell<PathBuf>,
    main_root: OnceCell<PathBuf>,
    primary_remote: OnceCell<Option<String>>,
    default_branch: OnceCell<String>,
}

/// Repository handle for git operations, rooted at a directory.
///
/// ```no_run
/// use git_wt::git::Repository;
///
/// let repo = Repository::current();
/// let branch = repo.default_branch()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    cache: RepoCache,
}

impl Repository {
    /// Create a repository context at the specified path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RepoCache::default(),
        }
    }

    /// Create a repository context for the current directory.
    pub fn current() -> Self {
        Self::at(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// The directory git commands run in.
    pub fn base_path(&self) -> &Path {
        &self.path
    }

    /// Short label for log lines: the directory name commands run in.
    fn logging_context(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn git_command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.path);
        cmd
    }

    /// Run a git command in this repository and return its stdout.
    ///
    /// A non-zero exit becomes [`GitError::CommandFailed`] with stderr and stdout
    /// combined; callers that care about a specific exit code can downcast.
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        use crate::shell_exec::run;

        let mut cmd = self.git_command(args);
        let output = run(&mut cmd, Some(&self.logging_context()))
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).replace('\r', "\n");
            for line in stderr.trim().lines() {
                log::debug!("  ! {}", line);
            }
            // Some git commands print errors to stdout
            let stdout = String::from_utf8_lossy(&output.stdout);
            let combined = [stderr.trim(), stdout.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                exit_code: output.status.code(),
                output: combined,
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        for line in stdout.trim().lines() {
            log::debug!("  {}", line);
        }
        Ok(stdout)
    }

    /// Run a git command and return whether it succeeded (exit code 0).
    ///
    /// Useful for commands that report a boolean through their exit status,
    /// like `git rev-parse --verify`.
    pub fn run_command_check(&self, args: &[&str]) -> anyhow::Result<bool> {
        use crate::shell_exec::run;

        let mut cmd = self.git_command(args);
        let output = run(&mut cmd, Some(&self.logging_context()))
            .with_context(|| format!("Failed to execute: git {}", args.join(" ")))?;
        Ok(output.status.success())
    }

    /// Run a mutating git command, replaying its stdout onto our stderr.
    ///
    /// stdout belongs to the shell-wrapper contract, so git's chatter never goes there.
    pub(crate) fn run_mutation(&self, args: &[&str]) -> anyhow::Result<()> {
        let stdout = self.run_command(args)?;
        if !stdout.trim().is_empty() {
            crate::styling::eprint!("{stdout}");
        }
        Ok(())
    }

    /// Classify this repository (bare or not, main or linked worktree).
    pub fn context(&self) -> anyhow::Result<RepoContext> {
        RepoContext::detect(self)
    }

    /// Absolute path of the shared git directory.
    pub fn git_common_dir(&self) -> anyhow::Result<&Path> {
        self.cache
            .git_common_dir
            .get_or_try_init(|| {
                let stdout = self.run_command(&["rev-parse", "--git-common-dir"])?;
                let path = PathBuf::from(stdout.trim());
                let path = if path.is_relative() {
                    self.path.join(&path)
                } else {
                    path
                };
                canonicalize(&path).context("Failed to resolve git common directory")
            })
            .map(PathBuf::as_path)
    }

    /// Absolute path of the main repository directory.
    ///
    /// For a bare repository this is the repository itself; otherwise it is the
    /// parent of the `.git` directory, regardless of which worktree we run in.
    pub fn main_root(&self) -> anyhow::Result<&Path> {
        self.cache
            .main_root
            .get_or_try_init(|| {
                let common = self.git_common_dir()?;
                if self.context()?.bare {
                    return Ok(common.to_path_buf());
                }
                common.parent().map(Path::to_path_buf).ok_or_else(|| {
                    GitError::Other {
                        message: format!("{} has no parent directory", common.display()),
                    }
                    .into()
                })
            })
            .map(PathBuf::as_path)
    }

    /// Basename of the main repository root; the value of `{repo-name}`.
    pub fn repo_name(&self) -> anyhow::Result<String> {
        let root = self.main_root()?;
        Ok(root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    /// Canonical root of the working tree we are running in.
    pub fn worktree_root(&self) -> anyhow::Result<&Path> {
        self.cache
            .worktree_root
            .get_or_try_init(|| {
                let stdout = self.run_command(&["rev-parse", "--show-toplevel"])?;
                canonicalize(stdout.trim()).context("Failed to canonicalize worktree root")
            })
            .map(PathBuf::as_path)
    }

    /// Current directory relative to the working-tree root; empty at the root.
    pub fn show_prefix(&self) -> anyhow::Result<String> {
        let stdout = self.run_command(&["rev-parse", "--show-prefix"])?;
        Ok(stdout.trim().trim_end_matches('/').to_string())
    }

    /// Whether the working tree has modified, staged or untracked files.
    pub fn is_dirty(&self) -> anyhow::Result<bool> {
        let stdout = self.run_command(&["status", "--porcelain"])?;
        Ok(!stdout.trim().is_empty())
    }

    /// Local branch names, in ref order.
    pub fn list_local_branches(&self) -> anyhow::Result<Vec<String>> {
        // lstrip=2 instead of refname:short: git adds a "heads/" prefix to short
        // names when a remote shares the name.
        let stdout =
            self.run_command(&["for-each-ref", "--format=%(refname:lstrip=2)", "refs/heads/"])?;
        Ok(parse_ref_names(&stdout))
    }

    /// Remote-tracking branch names, each prefixed with its remote.
    pub fn list_remote_branches(&self) -> anyhow::Result<Vec<String>> {
        let stdout =
            self.run_command(&["for-each-ref", "--format=%(refname:lstrip=2)", "refs/remotes/"])?;
        Ok(parse_ref_names(&stdout))
    }

    /// Whether `refs/heads/<branch>` exists.
    pub fn local_branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        self.run_command_check(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{branch}"),
        ])
    }

    /// Whether `branch` exists locally or as a remote-tracking branch of any remote.
    pub fn branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        if self.local_branch_exists(branch)? {
            return Ok(true);
        }
        // `<remote>/HEAD` is a symref to the remote's default branch, not a branch.
        if branch == "HEAD" {
            return Ok(false);
        }
        for remote in self.list_remotes()? {
            let tracking = format!("refs/remotes/{remote}/{branch}");
            if self.run_command_check(&["rev-parse", "--verify", "--quiet", &tracking])? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Configured remote names, in config order.
    pub fn list_remotes(&self) -> anyhow::Result<Vec<String>> {
        let stdout = self.run_command(&["remote"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect())
    }

    /// First line of the tip commit of `branch`, or empty if unavailable.
    pub fn commit_message(&self, branch: &str) -> String {
        self.run_command(&["log", "-1", "--format=%s", branch, "--"])
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// The remote used for default-branch discovery: `checkout.defaultRemote`,
    /// else `origin`, else the first configured remote.
    pub fn primary_remote(&self) -> anyhow::Result<Option<&str>> {
        self.cache
            .primary_remote
            .get_or_try_init(|| {
                let remotes = self.list_remotes()?;

                let configured = self.config_value("checkout.defaultRemote")?;
                if let Some(remote) = configured.filter(|r| remotes.contains(r)) {
                    return Ok(Some(remote));
                }
                if remotes.iter().any(|r| r == "origin") {
                    return Ok(Some("origin".to_string()));
                }
                Ok::<_, anyhow::Error>(remotes.into_iter().next())
            })
            .map(Option::as_deref)
    }

    /// The repository's default branch.
    ///
    /// Read from `refs/remotes/<remote>/HEAD`; when that is unset, falls back to
    /// `main` then `master` if either exists locally, and finally to `main`.
    pub fn default_branch(&self) -> anyhow::Result<&str> {
        self.cache
            .default_branch
            .get_or_try_init(|| {
                if let Some(remote) = self.primary_remote()?
                    && let Ok(stdout) = self.run_command(&[
                        "symbolic-ref",
                        "--short",
                        &format!("refs/remotes/{remote}/HEAD"),
                    ])
                    && let Ok(name) = DefaultBranchName::from_remote_head(remote, &stdout)
                {
                    return Ok(name.into_string());
                }

                for candidate in ["main", "master"] {
                    if self.local_branch_exists(candidate)? {
                        return Ok(candidate.to_string());
                    }
                }
                Ok::<_, anyhow::Error>("main".to_string())
            })
            .map(String::as_str)
    }

    pub fn is_default_branch(&self, branch: &str) -> anyhow::Result<bool> {
        Ok(self.default_branch()? == branch)
    }

    /// Delete a local branch with `-d`, or `-D` when `force` is set.
    ///
    /// Run this from a [`Repository`] rooted at a directory that still exists:
    /// after the current worktree was removed, that is the main root.
    pub fn delete_branch(&self, branch: &str, force: bool) -> anyhow::Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run_mutation(&["branch", flag, "--", branch])
            .map_err(|e| match e.downcast::<GitError>() {
                Ok(GitError::CommandFailed { output, .. }) => GitError::BranchDeletionFailed {
                    branch: branch.to_string(),
                    error: output,
                }
                .into(),
                Ok(other) => other.into(),
                Err(e) => e,
            })
    }

    /// All values of a config key, in insertion order. Unset keys yield an empty list.
    pub fn config_values(&self, key: &str) -> anyhow::Result<Vec<String>> {
        match self.run_command(&["config", "--get-all", key]) {
            Ok(stdout) => Ok(stdout.lines().map(String::from).collect()),
            Err(e) if is_unset_config(&e) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Last value of a config key, if set.
    pub fn config_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.config_values(key)?.pop())
    }

    pub fn set_config(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.run_command(&["config", key, value])?;
        Ok(())
    }
}

/// `git config --get-all` exits with status 1 when the key is not set.
fn is_unset_config(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<GitError>(),
        Some(GitError::CommandFailed {
            exit_code: Some(1),
            ..
        })
    )
}
