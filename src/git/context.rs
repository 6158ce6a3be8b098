//! Repository-context detection: bare vs non-bare, main vs linked worktree.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::Repository;

/// Where an invocation is running, relative to the repository layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// The main repository has no working tree.
    pub bare: bool,
    /// The directory is inside a linked (non-main) worktree.
    pub worktree: bool,
    /// Directory the detection ran from; the cache is keyed on it.
    pub detected_at: PathBuf,
}

thread_local! {
    static CACHED: RefCell<Option<RepoContext>> = const { RefCell::new(None) };
}

impl RepoContext {
    /// Classify from the two directories reported by `git rev-parse --git-dir --git-common-dir`.
    ///
    /// In a non-bare repository the common dir is always a `.git` directory; in a
    /// bare repository it is the repository itself.
    pub fn classify(git_dir: &Path, common_dir: &Path, detected_at: PathBuf) -> Self {
        let bare = common_dir.file_name().is_none_or(|name| name != ".git");
        Self {
            bare,
            worktree: git_dir != common_dir,
            detected_at,
        }
    }

    /// Detect the context for `repo`, reusing the cached value when the
    /// repository's directory matches the previous detection.
    pub fn detect(repo: &Repository) -> anyhow::Result<Self> {
        let key = dunce::canonicalize(repo.base_path())
            .unwrap_or_else(|_| repo.base_path().to_path_buf());

        let cached = CACHED.with(|c| {
            c.borrow()
                .as_ref()
                .filter(|ctx| ctx.detected_at == key)
                .cloned()
        });
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let output = repo.run_command(&["rev-parse", "--git-dir", "--git-common-dir"])?;
        let mut lines = output.lines();
        let (git_dir, common_dir) = match (lines.next(), lines.next()) {
            (Some(g), Some(c)) => (g.trim(), c.trim()),
            _ => {
                return Err(super::GitError::ParseError {
                    message: format!("Unexpected rev-parse output: {output:?}"),
                }
                .into());
            }
        };

        let git_dir = resolve_against(repo.base_path(), git_dir);
        let common_dir = resolve_against(repo.base_path(), common_dir);
        let ctx = Self::classify(&git_dir, &common_dir, key);
        log::debug!(
            "Repository context at {}: bare={} worktree={}",
            ctx.detected_at.display(),
            ctx.bare,
            ctx.worktree
        );

        CACHED.with(|c| *c.borrow_mut() = Some(ctx.clone()));
        Ok(ctx)
    }
}

/// git reports these paths relative to the directory it ran in.
fn resolve_against(base: &Path, reported: &str) -> PathBuf {
    let path = Path::new(reported);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}
