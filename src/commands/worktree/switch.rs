//! Create-or-switch: `git wt <token> [start-point]`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use color_print::cformat;
use git_wt::HookType;
use git_wt::config::{ConfigOverrides, WtConfig, legacy_base_dir};
use git_wt::copy::{CopyOptions, copy_files, exclude_dirs_for};
use git_wt::git::{GitError, Repository};
use git_wt::hooks::run_hooks;
use git_wt::path::format_path_for_display;
use git_wt::shell;
use git_wt::styling::{info_message, progress_message, warning_message};

use super::resolve::resolve_token;
use crate::output;

const BASE_DIR_GITIGNORE: &str = "*\n";

const BASE_DIR_README: &str = "\
This directory holds worktrees created by `git wt`.

Each subdirectory is a linked git worktree. Remove one with
`git wt -d <branch>` rather than deleting the directory, so git's
bookkeeping stays in sync.
";

/// Switch to the worktree named by `token`, creating it first if needed.
pub fn handle_switch(
    token: &str,
    start_point: Option<&str>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<()> {
    let repo = Repository::current();
    if repo.context()?.bare {
        return Err(GitError::BareRepository {
            action: "switch worktrees".into(),
        }
        .into());
    }

    let config = WtConfig::load(&repo, overrides)?;
    let main_root = repo.main_root()?.to_path_buf();
    ensure_no_legacy_base_dir(&config, &main_root)?;
    let base_dir = config.base_dir_path(&main_root);

    let worktrees = repo.list_worktrees()?;
    let cwd = std::env::current_dir()?;
    if let Some((existing, kind)) = resolve_token(token, &worktrees, &base_dir, &cwd) {
        log::debug!("{token} resolved to {} ({kind:?})", existing.path.display());
        if start_point.is_some() {
            log::debug!("Ignoring start point: worktree already exists");
        }
        return emit_path(&repo, &config, &existing.path, false);
    }

    let path = base_dir.join(token);
    create_worktree(&repo, &config, token, start_point, &base_dir, &path)?;

    // The wrapper may still cd on a hook failure; the error keeps it from doing so.
    if let Err(e) = run_hooks(HookType::Create, &config.create_hooks, &path) {
        emit_path(&repo, &config, &path, true)?;
        return Err(e);
    }

    emit_path(&repo, &config, &path, true)
}

fn ensure_no_legacy_base_dir(config: &WtConfig, main_root: &Path) -> anyhow::Result<()> {
    if config.base_dir_explicit {
        return Ok(());
    }
    match legacy_base_dir(main_root) {
        Some(path) => Err(GitError::LegacyBaseDir { path }.into()),
        None => Ok(()),
    }
}

fn create_worktree(
    repo: &Repository,
    config: &WtConfig,
    branch: &str,
    start_point: Option<&str>,
    base_dir: &Path,
    path: &Path,
) -> anyhow::Result<()> {
    prepare_base_dir(base_dir)?;

    if repo.branch_exists(branch)? {
        output::print(progress_message(cformat!(
            "Creating worktree for <bold>{branch}</>"
        )))?;
        repo.add_worktree(path, branch, None, false)?;
    } else {
        let from = start_point.map(|s| format!(" from {s}")).unwrap_or_default();
        output::print(progress_message(cformat!(
            "Creating worktree with new branch <bold>{branch}</>{from}"
        )))?;
        repo.add_worktree(path, branch, start_point, true)?;
    }

    let source = repo.worktree_root()?;
    let options = CopyOptions::from_config(config, exclude_dirs_for(source, base_dir));
    let report = copy_files(source, path, &options)?;
    if report.copied > 0 {
        let noun = if report.copied == 1 { "file" } else { "files" };
        output::print(info_message(format!("Copied {} {noun}", report.copied)))?;
    }
    if report.failed > 0 {
        output::print(warning_message(format!(
            "{} files could not be copied (run with -vv for details)",
            report.failed
        )))?;
    }
    Ok(())
}

/// Create the base dir on first use, with a catch-all `.gitignore` and a README.
fn prepare_base_dir(base_dir: &Path) -> anyhow::Result<()> {
    if base_dir.is_dir() {
        return Ok(());
    }
    let setup_error = |path: &Path, e: io::Error| GitError::BaseDirSetup {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    fs::create_dir_all(base_dir).map_err(|e| setup_error(base_dir, e))?;
    for (name, contents) in [(".gitignore", BASE_DIR_GITIGNORE), ("README", BASE_DIR_README)] {
        let file = base_dir.join(name);
        write_new(&file, contents).map_err(|e| setup_error(&file, e))?;
    }
    log::debug!("Created base dir {}", base_dir.display());
    Ok(())
}

fn write_new(path: &Path, contents: &str) -> io::Result<()> {
    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => file.write_all(contents.as_bytes()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

/// Print the worktree path, honouring `relative` and the no-cd mode.
fn emit_path(
    repo: &Repository,
    config: &WtConfig,
    worktree: &Path,
    created: bool,
) -> anyhow::Result<()> {
    let path = if config.relative {
        relative_target(worktree, &repo.show_prefix()?)
    } else {
        worktree.to_path_buf()
    };
    let withhold = shell::integration_active() && config.no_cd.applies(created);
    if withhold {
        log::debug!(
            "Not changing directory to {}",
            format_path_for_display(&path)
        );
    }
    output::worktree_path(&path, withhold)?;
    Ok(())
}

/// `worktree/prefix` when it exists as a directory, else `worktree`.
fn relative_target(worktree: &Path, prefix: &str) -> PathBuf {
    if prefix.is_empty() {
        return worktree.to_path_buf();
    }
    let candidate = worktree.join(prefix);
    if candidate.is_dir() {
        candidate
    } else {
        worktree.to_path_buf()
    }
}
