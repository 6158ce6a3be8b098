//! git-wt error types and formatting
//!
//! This module provides typed error handling:
//!
//! - **`GitError`** - A typed enum for domain errors that can be pattern-matched
//!   and tested. Use `.into()` to convert to `anyhow::Error` while preserving the
//!   type for pattern matching. Display produces styled output for users.
//!
//! - **`WtError`** - A minimal enum for semantic errors that need a specific
//!   process exit code.

use std::path::PathBuf;

use color_print::cformat;

use super::HookType;
use crate::path::format_path_for_display;
use crate::styling::{error_message, format_with_gutter, hint_message, suggest_command};

/// Domain errors for git and worktree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    /// The repository has no working tree to operate on.
    BareRepository { action: String },
    /// A delete token matched no worktree and no local branch.
    NoMatch { token: String },
    /// Safe delete refused because the worktree has modified or untracked files.
    UncommittedChanges { token: String, path: PathBuf },
    /// Deleting the default branch requires `--allow-delete-default`.
    DefaultBranchProtected { branch: String, force: bool },
    /// The historical `../{repo-name}-wt` directory exists and no base dir is configured.
    LegacyBaseDir { path: PathBuf },
    /// A git invocation exited non-zero.
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },
    WorktreeCreationFailed {
        branch: String,
        path: PathBuf,
        error: String,
    },
    WorktreeRemovalFailed { path: PathBuf, error: String },
    BranchDeletionFailed { branch: String, error: String },
    /// The base directory or one of its marker files could not be written.
    BaseDirSetup { path: PathBuf, error: String },
    ParseError { message: String },
    Other { message: String },
}

impl std::error::Error for GitError {}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::BareRepository { action } => write!(
                f,
                "{}\n{}",
                error_message(format!("Cannot {action}: bare repositories are not supported")),
                hint_message(
                    "Run git wt from a clone with a working tree; bare repositories have nothing to copy from"
                )
            ),

            GitError::NoMatch { token } => write!(
                f,
                "{}",
                error_message(cformat!("no worktree or branch found for <bold>`{token}`</>"))
            ),

            GitError::UncommittedChanges { token, path } => {
                let path_display = format_path_for_display(path);
                let cmd = suggest_command(&["-D"], &[token.as_str()]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Cannot delete <bold>{token}</>: {path_display} has modified or untracked files"
                    )),
                    hint_message(cformat!(
                        "Commit or stash changes first, or to discard them, run <bright-black>{cmd}</>"
                    ))
                )
            }

            GitError::DefaultBranchProtected { branch, force } => {
                let flag = if *force { "-D" } else { "-d" };
                let cmd = suggest_command(&[flag, "--allow-delete-default"], &[branch.as_str()]);
                write!(
                    f,
                    "{}\n{}",
                    error_message(cformat!(
                        "Refusing to delete <bold>{branch}</>: it is the default branch"
                    )),
                    hint_message(cformat!(
                        "To delete it anyway, pass <bright-black>--allow-delete-default</>: <bright-black>{cmd}</>"
                    ))
                )
            }

            GitError::LegacyBaseDir { path } => {
                let path_display = format_path_for_display(path);
                write!(
                    f,
                    "{}\n{}\n{}",
                    error_message(cformat!(
                        "Found worktree directory at the old default location <bold>{path_display}</>"
                    )),
                    hint_message(cformat!(
                        "To keep using it, run <bright-black>git config wt.basedir '../{{repo-name}}-wt'</>"
                    )),
                    hint_message(
                        "Otherwise remove the directory to use the current default (.wt)"
                    )
                )
            }

            GitError::CommandFailed {
                command,
                exit_code,
                output,
            } => {
                let header = match exit_code {
                    Some(code) => cformat!("<bold>git {command}</> failed (exit {code})"),
                    None => cformat!("<bold>git {command}</> failed"),
                };
                write!(f, "{}", format_error_block(error_message(header), output))
            }

            GitError::WorktreeCreationFailed {
                branch,
                path,
                error,
            } => {
                let path_display = format_path_for_display(path);
                let header = error_message(cformat!(
                    "Failed to create worktree for <bold>{branch}</> at <bold>{path_display}</>"
                ));
                write!(f, "{}", format_error_block(header, error))
            }

            GitError::WorktreeRemovalFailed { path, error } => {
                let path_display = format_path_for_display(path);
                let header =
                    error_message(cformat!("Failed to remove worktree <bold>{path_display}</>"));
                write!(f, "{}", format_error_block(header, error))
            }

            GitError::BranchDeletionFailed { branch, error } => {
                let header = error_message(cformat!("Failed to delete branch <bold>{branch}</>"));
                write!(f, "{}", format_error_block(header, error))
            }

            GitError::BaseDirSetup { path, error } => {
                let path_display = format_path_for_display(path);
                let header = error_message(cformat!(
                    "Failed to set up worktree directory <bold>{path_display}</>"
                ));
                write!(f, "{}", format_error_block(header, error))
            }

            GitError::ParseError { message } | GitError::Other { message } => {
                write!(f, "{}", error_message(message))
            }
        }
    }
}

/// Semantic errors that carry a process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WtError {
    /// Child process exited with non-zero code (preserves exit code for signals)
    ChildProcessExited { code: i32, message: String },
    /// Hook command failed
    HookCommandFailed {
        hook_type: HookType,
        command: String,
        exit_code: Option<i32>,
    },
}

impl std::fmt::Display for WtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WtError::ChildProcessExited { message, .. } => {
                write!(f, "{}", error_message(message))
            }
            WtError::HookCommandFailed {
                hook_type,
                command,
                exit_code,
            } => {
                let status = match exit_code {
                    Some(code) => format!(" (exit {code})"),
                    None => String::new(),
                };
                write!(
                    f,
                    "{}\n{}",
                    error_message(format!("{hook_type} failed{status}")),
                    format_with_gutter(command)
                )
            }
        }
    }
}

impl std::error::Error for WtError {}

/// Extract exit code from WtError, if applicable
pub fn exit_code(err: &anyhow::Error) -> Option<i32> {
    err.downcast_ref::<WtError>().and_then(|e| match e {
        WtError::ChildProcessExited { code, .. } => Some(*code),
        WtError::HookCommandFailed { exit_code, .. } => *exit_code,
    })
}

/// Format an error header followed by gutter-quoted subprocess output.
fn format_error_block(header: impl Into<String>, error: &str) -> String {
    let header = header.into();
    let trimmed = error.trim();
    if trimmed.is_empty() {
        header
    } else {
        format!("{header}\n{}", format_with_gutter(trimmed))
    }
}
