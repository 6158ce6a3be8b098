//! Token resolution against existing worktrees.
//!
//! A token can name a branch, a directory relative to the base dir, or a
//! filesystem path. Resolution tries them in that order and returns the first
//! worktree that matches.

use std::path::{Path, PathBuf};

use git_wt::git::Worktree;

/// How a token matched a worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Branch,
    BaseDir,
    Path,
}

/// Find the worktree named by `token`.
///
/// Bare entries never match. `cwd` anchors relative filesystem paths.
pub fn resolve_token<'a>(
    token: &str,
    worktrees: &'a [Worktree],
    base_dir: &Path,
    cwd: &Path,
) -> Option<(&'a Worktree, MatchKind)> {
    let candidates = || worktrees.iter().filter(|wt| !wt.bare);

    if let Some(wt) = candidates().find(|wt| wt.checked_out_branch() == Some(token)) {
        return Some((wt, MatchKind::Branch));
    }

    let base_dir = dunce::canonicalize(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());
    let token_path = Path::new(token);
    if let Some(wt) = candidates().find(|wt| {
        pathdiff::diff_paths(&wt.path, &base_dir).is_some_and(|rel| rel == token_path)
    }) {
        return Some((wt, MatchKind::BaseDir));
    }

    let target = canonical_dir(&cwd.join(token_path))?;
    candidates()
        .find(|wt| canonical_dir(&wt.path).is_some_and(|p| p == target))
        .map(|wt| (wt, MatchKind::Path))
}

fn canonical_dir(path: &Path) -> Option<PathBuf> {
    dunce::canonicalize(path).ok().filter(|p| p.is_dir())
}
