pub(crate) mod complete;
pub(crate) mod init;
pub(crate) mod list;
pub(crate) mod worktree;

pub(crate) use complete::handle_complete;
pub(crate) use init::handle_init;
pub(crate) use list::handle_list;
pub(crate) use worktree::{handle_delete, handle_switch};
