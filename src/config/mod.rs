//! Configuration for git-wt
//!
//! All settings live in git's own config store under the `wt.` namespace, so
//! they can be set per repository (`git config wt.basedir ../trees`) or
//! globally (`git config --global --add wt.nocopy node_modules/`):
//!
//! | Key | Type | Default |
//! |---|---|---|
//! | `wt.basedir` | path template | `.wt` |
//! | `wt.copyignored`, `wt.copyuntracked`, `wt.copymodified` | bool | `false` |
//! | `wt.nocopy`, `wt.copy` | multi-valued gitignore patterns | empty |
//! | `wt.hook`, `wt.deletehook` | multi-valued shell commands | empty |
//! | `wt.remover` | shell command | unset |
//! | `wt.nocd` | `false` / `true` / `all` / `create` | `false` |
//! | `wt.relative` | bool | `false` |
//! | `wt.allowdeletedefault` | bool | `false` |
//!
//! Command-line flags overlay the stored values for one invocation (see
//! [`ConfigOverrides`]). Nothing is ever written back.

mod expansion;

use std::path::{Path, PathBuf};

pub use expansion::{LEGACY_BASE_DIR, REPO_NAME_VAR, expand_path_template, legacy_base_dir};

use crate::git::Repository;

/// Base dir used when neither `wt.basedir` nor `--basedir` is given.
pub const DEFAULT_BASE_DIR: &str = ".wt";

/// When to keep the shell in place instead of changing into the worktree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NoCd {
    /// Always change directory.
    #[default]
    Never,
    /// Stay put only when the worktree was just created.
    Create,
    /// Never change directory.
    Always,
}

impl NoCd {
    /// Parse a `wt.nocd` value. Unknown values mean `Never`.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "create" => Self::Create,
            "all" => Self::Always,
            other if parse_bool(other) => Self::Always,
            _ => Self::Never,
        }
    }

    /// Whether the path should be withheld from the wrapper for this invocation.
    pub fn applies(self, created: bool) -> bool {
        match self {
            Self::Never => false,
            Self::Create => created,
            Self::Always => true,
        }
    }
}

/// Parse a git-style boolean. Anything unrecognised is `false`.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

/// Effective configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WtConfig {
    /// Unexpanded base-dir template.
    pub base_dir: String,
    /// Whether `base_dir` came from `wt.basedir` or `--basedir` rather than the default.
    pub base_dir_explicit: bool,
    pub copy_ignored: bool,
    pub copy_untracked: bool,
    pub copy_modified: bool,
    /// Exclude patterns; these win over `copy`.
    pub no_copy: Vec<String>,
    /// Ignored files matching these patterns are copied even without `copy_ignored`.
    pub copy: Vec<String>,
    pub create_hooks: Vec<String>,
    pub delete_hooks: Vec<String>,
    /// Replaces `git worktree remove`; receives the worktree path as `$1`.
    pub remover: Option<String>,
    pub no_cd: NoCd,
    pub relative: bool,
    pub allow_delete_default: bool,
}

impl Default for WtConfig {
    fn default() -> Self {
        Self {
            base_dir: DEFAULT_BASE_DIR.to_string(),
            base_dir_explicit: false,
            copy_ignored: false,
            copy_untracked: false,
            copy_modified: false,
            no_copy: Vec::new(),
            copy: Vec::new(),
            create_hooks: Vec::new(),
            delete_hooks: Vec::new(),
            remover: None,
            no_cd: NoCd::Never,
            relative: false,
            allow_delete_default: false,
        }
    }
}

/// Per-invocation overrides from command-line flags.
///
/// `None` / empty means "not given". A given list replaces the stored list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub base_dir: Option<String>,
    pub copy_ignored: Option<bool>,
    pub copy_untracked: Option<bool>,
    pub copy_modified: Option<bool>,
    pub no_copy: Vec<String>,
    pub copy: Vec<String>,
    pub create_hooks: Vec<String>,
    pub delete_hooks: Vec<String>,
    pub remover: Option<String>,
    pub no_cd: bool,
    pub relative: Option<bool>,
    pub allow_delete_default: Option<bool>,
}

impl WtConfig {
    /// Read `wt.*` from git config and overlay `overrides`.
    pub fn load(repo: &Repository, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let mut config = Self::from_lookup(|key| repo.config_values(key))?;
        config.apply(overrides);
        log::debug!("Effective config: {config:?}");
        Ok(config)
    }

    /// Build from a multi-value lookup (`key` → all values in insertion order).
    ///
    /// Scalar keys take the last value, matching `git config --get`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> anyhow::Result<Vec<String>>,
    {
        let last = |key: &str| -> anyhow::Result<Option<String>> { Ok(lookup(key)?.pop()) };
        let flag = |key: &str| -> anyhow::Result<bool> {
            Ok(last(key)?.as_deref().is_some_and(parse_bool))
        };

        let mut config = Self::default();
        if let Some(base_dir) = last("wt.basedir")?.filter(|s| !s.trim().is_empty()) {
            config.base_dir = base_dir;
            config.base_dir_explicit = true;
        }
        config.copy_ignored = flag("wt.copyignored")?;
        config.copy_untracked = flag("wt.copyuntracked")?;
        config.copy_modified = flag("wt.copymodified")?;
        config.no_copy = lookup("wt.nocopy")?;
        config.copy = lookup("wt.copy")?;
        config.create_hooks = lookup("wt.hook")?;
        config.delete_hooks = lookup("wt.deletehook")?;
        config.remover = last("wt.remover")?.filter(|s| !s.trim().is_empty());
        config.no_cd = last("wt.nocd")?
            .as_deref()
            .map(NoCd::from_config)
            .unwrap_or_default();
        config.relative = flag("wt.relative")?;
        config.allow_delete_default = flag("wt.allowdeletedefault")?;
        Ok(config)
    }

    /// Overlay flags the user explicitly supplied.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(base_dir) = &overrides.base_dir {
            self.base_dir = base_dir.clone();
            self.base_dir_explicit = true;
        }
        if let Some(v) = overrides.copy_ignored {
            self.copy_ignored = v;
        }
        if let Some(v) = overrides.copy_untracked {
            self.copy_untracked = v;
        }
        if let Some(v) = overrides.copy_modified {
            self.copy_modified = v;
        }
        replace_if_given(&mut self.no_copy, &overrides.no_copy);
        replace_if_given(&mut self.copy, &overrides.copy);
        replace_if_given(&mut self.create_hooks, &overrides.create_hooks);
        replace_if_given(&mut self.delete_hooks, &overrides.delete_hooks);
        if let Some(remover) = &overrides.remover {
            self.remover = Some(remover.clone());
        }
        if overrides.no_cd {
            self.no_cd = NoCd::Always;
        }
        if let Some(v) = overrides.relative {
            self.relative = v;
        }
        if let Some(v) = overrides.allow_delete_default {
            self.allow_delete_default = v;
        }
    }

    /// The absolute base directory for worktrees.
    pub fn base_dir_path(&self, main_root: &Path) -> PathBuf {
        expand_path_template(&self.base_dir, main_root, crate::path::home_dir().as_deref())
    }
}

fn replace_if_given(target: &mut Vec<String>, given: &[String]) {
    if !given.is_empty() {
        *target = given.to_vec();
    }
}
