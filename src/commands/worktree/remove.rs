//! Delete: `git wt -d|-D <token>...`.

use std::path::{Path, PathBuf};

use color_print::cformat;
use git_wt::HookType;
use git_wt::config::{ConfigOverrides, WtConfig};
use git_wt::git::{GitError, Repository, Worktree};
use git_wt::hooks::{run_hooks, run_remover};
use git_wt::shell;
use git_wt::styling::{format_with_gutter, success_message, warning_message};
use indexmap::IndexSet;

use super::resolve::resolve_token;
use crate::output;

/// State captured once before anything is deleted.
struct DeleteContext {
    main: Repository,
    main_root: PathBuf,
    current_root: Option<PathBuf>,
    cwd: PathBuf,
    base_dir: PathBuf,
    config: WtConfig,
    force: bool,
}

/// Delete each token's worktree and branch, in order, stopping at the first error.
pub fn handle_delete(
    tokens: &[String],
    force: bool,
    overrides: &ConfigOverrides,
) -> anyhow::Result<()> {
    let repo = Repository::current();
    if repo.context()?.bare {
        return Err(GitError::BareRepository {
            action: "delete worktrees".into(),
        }
        .into());
    }

    let config = WtConfig::load(&repo, overrides)?;
    let main_root = repo.main_root()?.to_path_buf();
    let main = Repository::at(&main_root);
    // Resolved before anything is deleted, then cached
    main.default_branch()?;
    let ctx = DeleteContext {
        current_root: repo.worktree_root().ok().map(Path::to_path_buf),
        cwd: std::env::current_dir()?,
        base_dir: config.base_dir_path(&main_root),
        main,
        main_root,
        config,
        force,
    };

    let mut deleted_current = false;
    let unique: IndexSet<&str> = tokens.iter().map(String::as_str).collect();
    for token in unique {
        deleted_current |= delete_token(&ctx, token)?;
    }

    if deleted_current && shell::integration_active() {
        output::stdout(ctx.main_root.display())?;
    }
    Ok(())
}

/// Returns whether the deleted worktree was the one we were running in.
fn delete_token(ctx: &DeleteContext, token: &str) -> anyhow::Result<bool> {
    let linked: Vec<Worktree> = ctx
        .main
        .list_worktrees()?
        .into_iter()
        .filter(|wt| !wt.bare && !wt.is_at(&ctx.main_root))
        .collect();

    if let Some((wt, _)) = resolve_token(token, &linked, &ctx.base_dir, &ctx.cwd) {
        let is_current = ctx.current_root.as_deref().is_some_and(|root| wt.is_at(root));
        delete_worktree(ctx, token, wt)?;
        return Ok(is_current);
    }

    if ctx.main.local_branch_exists(token)? {
        ensure_deletable(ctx, token)?;
        ctx.main.delete_branch(token, ctx.force)?;
        output::stdout(success_message(cformat!("Deleted branch <bold>{token}</>")))?;
        return Ok(false);
    }

    Err(GitError::NoMatch {
        token: token.to_string(),
    }
    .into())
}

fn delete_worktree(ctx: &DeleteContext, token: &str, wt: &Worktree) -> anyhow::Result<()> {
    let name = wt.dir_name();

    if !ctx.force && Repository::at(&wt.path).is_dirty()? {
        return Err(GitError::UncommittedChanges {
            token: token.to_string(),
            path: wt.path.clone(),
        }
        .into());
    }

    run_hooks(HookType::Delete, &ctx.config.delete_hooks, &wt.path)?;

    match &ctx.config.remover {
        Some(remover) => run_remover(remover, &wt.path, &ctx.main)?,
        None => ctx.main.remove_worktree(&wt.path, ctx.force)?,
    }

    let branch = match wt.checked_out_branch() {
        Some(branch) if ctx.main.local_branch_exists(branch)? => branch,
        _ => {
            output::stdout(success_message(cformat!("Deleted worktree <bold>{name}</>")))?;
            return Ok(());
        }
    };

    if is_protected(ctx, branch)? {
        output::stdout(success_message(cformat!(
            "Deleted worktree <bold>{name}</> (kept default branch <bold>{branch}</>)"
        )))?;
        return Ok(());
    }

    // Runs from the main root; the current directory may be gone by now.
    match ctx.main.delete_branch(branch, ctx.force) {
        Ok(()) => output::stdout(success_message(cformat!(
            "Deleted worktree and branch <bold>{name}</>"
        )))?,
        Err(e) => {
            output::stdout(success_message(cformat!("Deleted worktree <bold>{name}</>")))?;
            let detail = match e.downcast_ref::<GitError>() {
                Some(GitError::BranchDeletionFailed { error, .. }) => error.clone(),
                _ => e.to_string(),
            };
            output::print(warning_message(cformat!(
                "Deleted worktree, failed to delete branch <bold>{branch}</>"
            )))?;
            if !detail.trim().is_empty() {
                output::print(format_with_gutter(detail.trim()))?;
            }
        }
    }
    Ok(())
}

fn is_protected(ctx: &DeleteContext, branch: &str) -> anyhow::Result<bool> {
    Ok(!ctx.config.allow_delete_default && ctx.main.is_default_branch(branch)?)
}

fn ensure_deletable(ctx: &DeleteContext, branch: &str) -> anyhow::Result<()> {
    if is_protected(ctx, branch)? {
        return Err(GitError::DefaultBranchProtected {
            branch: branch.to_string(),
            force: ctx.force,
        }
        .into());
    }
    Ok(())
}
