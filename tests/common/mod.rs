// Not every suite uses every helper.
#![allow(dead_code)]

//! # Test Utilities for git-wt
//!
//! ## TestRepo
//!
//! `TestRepo` creates an isolated git repository in a temporary directory:
//! branch `main` with a single commit, deterministic timestamps, and a
//! throwaway global config. Each test gets a fresh repo that is cleaned up
//! when the test ends.
//!
//! ## Environment Isolation
//!
//! Git and `git-wt` run with `Command::env()` overrides only, so tests never
//! mutate process-global state:
//! - host `GIT_*` variables are cleared (including `GIT_WT_SHELL_INTEGRATION`)
//! - `GIT_CONFIG_GLOBAL` points at a per-test file, `GIT_CONFIG_SYSTEM` at `/dev/null`
//! - author and committer dates are fixed
//! - `HOME` is a per-test directory
//!
//! ## Path Canonicalization
//!
//! The repo root is canonicalized (macOS `/var` is a symlink to `/private/var`)
//! so it compares equal to the paths `git-wt` prints.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

/// Null device path, for GIT_CONFIG_SYSTEM.
const NULL_DEVICE: &str = "/dev/null";

/// Standard test repository: `main` with one commit.
///
/// ```ignore
/// #[rstest]
/// fn test_something(repo: TestRepo) {
///     let output = repo.wt(&["feature"]);
/// }
/// ```
#[rstest::fixture]
pub fn repo() -> TestRepo {
    TestRepo::new()
}

/// Repo with a `feature` worktree created through `git wt feature`.
#[rstest::fixture]
pub fn repo_with_feature(repo: TestRepo) -> TestRepo {
    let output = repo.wt(&["feature"]);
    assert_success(&output);
    repo
}

/// Canonicalize a path without Windows verbatim prefix (`\\?\`).
pub fn canonicalize(path: &Path) -> std::io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Configure a git command with isolated environment for testing.
pub fn configure_git_cmd(cmd: &mut Command, git_config_path: &Path) {
    cmd.env("GIT_CONFIG_GLOBAL", git_config_path);
    cmd.env("GIT_CONFIG_SYSTEM", NULL_DEVICE);
    cmd.env("GIT_AUTHOR_DATE", "2025-01-01T00:00:00Z");
    cmd.env("GIT_COMMITTER_DATE", "2025-01-01T00:00:00Z");
    cmd.env("LC_ALL", "C");
    cmd.env("LANG", "C");
    cmd.env("GIT_TERMINAL_PROMPT", "0");
}

/// Clear host variables that would leak into the binary under test.
pub fn configure_cli_command(cmd: &mut Command) {
    for (key, _) in std::env::vars() {
        if key.starts_with("GIT_") || key == "RUST_LOG" {
            cmd.env_remove(&key);
        }
    }
    // Enable warn-level logging so diagnostics show up in test failures
    cmd.env("RUST_LOG", "warn");
    cmd.env("NO_COLOR", "1");
}

/// Panic with diagnostics unless the command succeeded.
pub fn check_git_status(output: &Output, cmd_desc: &str) {
    if !output.status.success() {
        panic!(
            "git {} failed:\nstdout: {}\nstderr: {}",
            cmd_desc,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Panic with both streams unless a `git-wt` invocation succeeded.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "git-wt failed ({:?}):\nstdout: {}\nstderr: {}",
        output.status.code(),
        stdout(output),
        stderr(output)
    );
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Last non-empty stdout line: what the shell wrapper would cd into.
pub fn last_line(output: &Output) -> String {
    stdout(output)
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}

pub struct TestRepo {
    temp_dir: TempDir, // Must keep to ensure cleanup on drop
    root: PathBuf,
    home: PathBuf,
    git_config_path: PathBuf,
}

impl TestRepo {
    /// Create a new repository on `main` with one commit (`README.md`).
    pub fn new() -> Self {
        let repo = Self::empty();
        std::fs::write(repo.root.join("README.md"), "# test\n").unwrap();
        repo.run_git(&["add", "README.md"]);
        repo.run_git(&["commit", "-q", "-m", "Initial commit"]);
        repo
    }

    /// Create an initialized repository with no commits.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("repo");
        let home = temp_dir.path().join("home");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&home).unwrap();
        // Resolve symlinks (on macOS /var is a symlink to /private/var)
        let root = canonicalize(&root).unwrap();
        let home = canonicalize(&home).unwrap();

        let git_config_path = temp_dir.path().join("test-gitconfig");
        std::fs::write(
            &git_config_path,
            "[user]\n\tname = Test User\n\temail = test@example.com\n\
             [advice]\n\tdetachedHead = false\n\
             [init]\n\tdefaultBranch = main\n",
        )
        .unwrap();

        let repo = Self {
            temp_dir,
            root,
            home,
            git_config_path,
        };
        repo.run_git(&["init", "-q"]);
        repo
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// The temporary directory holding the repo, home and config.
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home_path(&self) -> &Path {
        &self.home
    }

    /// Where `git wt <name>` puts a worktree with the default base dir.
    pub fn worktree_path(&self, name: &str) -> PathBuf {
        self.root.join(".wt").join(name)
    }

    pub fn configure_git_cmd(&self, cmd: &mut Command) {
        configure_git_cmd(cmd, &self.git_config_path);
    }

    /// A `git` command in the repo root with the isolated environment.
    #[must_use]
    pub fn git_command(&self) -> Command {
        let mut cmd = Command::new("git");
        self.configure_git_cmd(&mut cmd);
        cmd.current_dir(&self.root);
        cmd
    }

    /// Run a git command in the repo root, panicking on failure.
    pub fn run_git(&self, args: &[&str]) {
        self.run_git_in(&self.root, args);
    }

    /// Run a git command in `dir`, panicking on failure.
    pub fn run_git_in(&self, dir: &Path, args: &[&str]) {
        let output = self
            .git_command()
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        check_git_status(&output, &args.join(" "));
    }

    /// Run a git command and return stdout trimmed.
    pub fn git_output(&self, args: &[&str]) -> String {
        let output = self.git_command().args(args).output().unwrap();
        check_git_status(&output, &args.join(" "));
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Whether `refs/heads/<branch>` exists.
    pub fn has_branch(&self, branch: &str) -> bool {
        self.git_command()
            .args(["rev-parse", "--verify", "--quiet", &format!("refs/heads/{branch}")])
            .output()
            .unwrap()
            .status
            .success()
    }

    /// Paths from `git worktree list --porcelain`, main first.
    pub fn worktree_paths(&self) -> Vec<PathBuf> {
        self.git_output(&["worktree", "list", "--porcelain"])
            .lines()
            .filter_map(|l| l.strip_prefix("worktree "))
            .map(PathBuf::from)
            .collect()
    }

    pub fn set_config(&self, key: &str, value: &str) {
        self.run_git(&["config", key, value]);
    }

    pub fn add_config(&self, key: &str, value: &str) {
        self.run_git(&["config", "--add", key, value]);
    }

    /// Write `name` in `dir` and commit it there.
    pub fn commit_file(&self, dir: &Path, name: &str, contents: &str, message: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        self.run_git_in(dir, &["add", name]);
        self.run_git_in(dir, &["commit", "-q", "-m", message]);
    }

    /// A `git-wt` command in the repo root with the isolated environment.
    #[must_use]
    pub fn wt_command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin("git-wt"));
        configure_cli_command(&mut cmd);
        self.configure_git_cmd(&mut cmd);
        cmd.env("HOME", &self.home);
        cmd.current_dir(&self.root);
        cmd
    }

    pub fn wt(&self, args: &[&str]) -> Output {
        self.wt_command().args(args).output().unwrap()
    }

    pub fn wt_in(&self, dir: &Path, args: &[&str]) -> Output {
        self.wt_command().args(args).current_dir(dir).output().unwrap()
    }

    /// Run `git-wt` as the shell wrapper would: with the integration variable set.
    pub fn wt_integrated(&self, dir: &Path, args: &[&str]) -> Output {
        self.wt_command()
            .args(args)
            .current_dir(dir)
            .env("GIT_WT_SHELL_INTEGRATION", "1")
            .output()
            .unwrap()
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
