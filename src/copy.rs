//! Copy engine: carry uncommitted files from one worktree into a new one.
//!
//! Candidates come from `git ls-files` by category (ignored, untracked,
//! modified), plus ignored files matching the `copy` include patterns. They are
//! filtered through gitignore-syntax matchers from the `ignore` crate, so
//! `wt.nocopy` / `wt.copy` patterns behave exactly like `.gitignore` lines.
//! `nocopy` wins over `copy`.
//!
//! Files are copied one at a time with `reflink_copy`, which clones on
//! copy-on-write filesystems and falls back to a byte copy elsewhere. A failed
//! file is logged and skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use indexmap::IndexSet;

use crate::config::WtConfig;
use crate::git::Repository;
use crate::path::is_within;

/// What to copy, derived from [`WtConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOptions {
    pub copy_ignored: bool,
    pub copy_untracked: bool,
    pub copy_modified: bool,
    pub no_copy: Vec<String>,
    pub copy: Vec<String>,
    /// Absolute directories whose contents are never copied.
    pub exclude_dirs: Vec<PathBuf>,
}

impl CopyOptions {
    pub fn from_config(config: &WtConfig, exclude_dirs: Vec<PathBuf>) -> Self {
        Self {
            copy_ignored: config.copy_ignored,
            copy_untracked: config.copy_untracked,
            copy_modified: config.copy_modified,
            no_copy: config.no_copy.clone(),
            copy: config.copy.clone(),
            exclude_dirs,
        }
    }

    /// Whether any category or include pattern could select a file.
    pub fn is_enabled(&self) -> bool {
        self.copy_ignored || self.copy_untracked || self.copy_modified || !self.copy.is_empty()
    }
}

/// Directories to exclude when copying out of `source_root`.
///
/// The base dir is excluded so a main worktree does not copy the worktrees
/// stored inside it, unless the source itself lives in the base dir.
pub fn exclude_dirs_for(source_root: &Path, base_dir: &Path) -> Vec<PathBuf> {
    let base_dir = dunce::canonicalize(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());
    if is_within(source_root, &base_dir) {
        Vec::new()
    } else {
        vec![base_dir]
    }
}

/// Outcome of a copy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub failed: usize,
}

/// Copy the selected files from `source_root` into `dest_root`.
///
/// Returns an error only when enumeration or pattern parsing fails; per-file
/// failures are counted in the report.
pub fn copy_files(
    source_root: &Path,
    dest_root: &Path,
    options: &CopyOptions,
) -> anyhow::Result<CopyReport> {
    if !options.is_enabled() {
        return Ok(CopyReport::default());
    }

    let repo = Repository::at(source_root);
    let include = build_matcher(source_root, &options.copy)?;
    let exclude = build_matcher(source_root, &options.no_copy)?;

    let mut candidates: IndexSet<PathBuf> = IndexSet::new();
    if options.copy_ignored || !options.copy.is_empty() {
        let ignored = ls_files(&repo, &["--others", "--ignored", "--exclude-standard"])?;
        for path in ignored {
            if options.copy_ignored
                || include.matched_path_or_any_parents(&path, false).is_ignore()
            {
                candidates.insert(path);
            }
        }
    }
    if options.copy_untracked {
        candidates.extend(ls_files(&repo, &["--others", "--exclude-standard"])?);
    }
    if options.copy_modified {
        candidates.extend(ls_files(&repo, &["--modified"])?);
    }
    log::debug!("{} copy candidates", candidates.len());

    let mut report = CopyReport::default();
    for relative in &candidates {
        let source = source_root.join(relative);
        if options.exclude_dirs.iter().any(|dir| is_within(&source, dir)) {
            continue;
        }
        if exclude.matched_path_or_any_parents(relative, false).is_ignore() {
            log::debug!("Skipping {} (nocopy)", relative.display());
            continue;
        }
        match fs::symlink_metadata(&source) {
            Ok(meta) if meta.is_dir() => continue,
            // Deleted tracked files show up as modified
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            _ => {}
        }

        let dest = dest_root.join(relative);
        match copy_file(&source, &dest) {
            Ok(()) => report.copied += 1,
            Err(e) => {
                log::warn!("Failed to copy {}: {e}", relative.display());
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

fn build_matcher(root: &Path, patterns: &[String]) -> anyhow::Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .with_context(|| format!("Invalid copy pattern: {pattern}"))?;
    }
    builder.build().context("Failed to build copy pattern matcher")
}

/// NUL-separated so paths with newlines or quotes survive intact.
fn ls_files(repo: &Repository, args: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut full = vec!["ls-files", "-z"];
    full.extend_from_slice(args);
    let stdout = repo.run_command(&full)?;
    Ok(stdout
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(|s| PathBuf::from(s.trim_end_matches('/')))
        .collect())
}

fn copy_file(source: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        create_dir_all_0755(parent)?;
    }
    // reflink refuses to overwrite
    match fs::symlink_metadata(dest) {
        Ok(_) => fs::remove_file(dest)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let copied_bytes = reflink_copy::reflink_or_copy(source, dest)?;
    let meta = fs::metadata(source)?;
    fs::set_permissions(dest, meta.permissions())?;
    if copied_bytes.is_some() {
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        filetime::set_file_mtime(dest, mtime)?;
    }
    Ok(())
}

fn create_dir_all_0755(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}
