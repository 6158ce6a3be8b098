//! Hook runner: user shell commands around worktree creation and removal.

use std::path::Path;

use color_print::cformat;

use crate::git::{GitError, HookType, Repository, WtError, exit_code};
use crate::shell_exec::{ShellConfig, run_streaming};
use crate::styling::{eprintln, format_with_gutter, progress_message};

/// Run `commands` in order inside `worktree`, stopping at the first failure.
///
/// Output streams to stderr. A failing command becomes
/// [`WtError::HookCommandFailed`] carrying its exit status.
pub fn run_hooks(hook_type: HookType, commands: &[String], worktree: &Path) -> anyhow::Result<()> {
    let shell = ShellConfig::get();
    for command in commands {
        eprintln!(
            "{}",
            progress_message(cformat!("Running {hook_type}: <bold>{command}</>"))
        );
        let mut cmd = shell.command(command);
        if let Err(e) = run_streaming(&mut cmd, worktree, Some(&hook_type.to_string())) {
            // exit_code keeps 128+signal for an interrupted hook
            return Err(WtError::HookCommandFailed {
                hook_type,
                command: command.clone(),
                exit_code: exit_code(&e),
            }
            .into());
        }
    }
    Ok(())
}

/// Remove a worktree with a custom command instead of `git worktree remove`.
///
/// The command sees the worktree path as `$1` and runs from the main root,
/// since the worktree itself is about to disappear. Git's administrative entry
/// is pruned afterwards.
pub fn run_remover(remover: &str, worktree: &Path, repo: &Repository) -> anyhow::Result<()> {
    let main_root = repo.main_root()?;
    let path = worktree.to_string_lossy();
    let shell = ShellConfig::get();
    let script = if shell.is_posix {
        format!("{remover} \"$1\"")
    } else {
        format!("{remover} $args[0]")
    };

    log::debug!("Removing {} with custom remover", worktree.display());
    let mut cmd = shell.command_with_args(&script, &[path.as_ref()]);
    run_streaming(&mut cmd, main_root, Some("remover")).map_err(|e| {
        if e.downcast_ref::<WtError>().is_some() {
            anyhow::Error::from(GitError::WorktreeRemovalFailed {
                path: worktree.to_path_buf(),
                error: format!("{}\n{}", e, format_with_gutter(remover)),
            })
        } else {
            e
        }
    })?;

    repo.prune_worktrees()
}
