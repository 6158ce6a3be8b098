//! Worktree lifecycle for git: one verb to create, switch to and delete worktrees.
//!
//! `git-wt` is a CLI tool invoked as `git wt`; this library holds everything
//! below the command line. The library API is not stable.

pub mod config;
pub mod copy;
pub mod git;
pub mod hooks;
pub mod path;
pub mod shell;
pub mod shell_exec;
pub mod styling;

// Re-export HookType for convenience
pub use git::HookType;
