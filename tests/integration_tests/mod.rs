// Integration tests drive the binary through POSIX shells and rely on Unix paths
#![cfg(unix)]

pub mod list;
pub mod remove;
