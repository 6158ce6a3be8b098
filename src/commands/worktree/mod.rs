//! Worktree commands: create-or-switch and delete.

mod remove;
mod resolve;
mod switch;

pub(crate) use remove::handle_delete;
pub(crate) use switch::handle_switch;
