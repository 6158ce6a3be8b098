//! Consolidated styling module for terminal output.
//!
//! This module uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//!
//! ## stdout vs stderr principle
//!
//! - **stdout**: the shell-wrapper contract (worktree path, list table/JSON, delete status)
//! - **stderr**: everything else (progress, errors, hints, warnings, git and hook output)
//!
//! The wrapper changes directory when the last stdout line names a directory, so
//! nothing else may leak onto stdout.

mod constants;
mod format;
mod suggest;

// Re-exports from anstream (auto-detecting output)
pub use anstream::{eprint, eprintln, print, println, stderr, stdout};

pub use constants::*;
pub use format::{align_columns, format_with_gutter, visual_width};
pub use suggest::suggest_command;
