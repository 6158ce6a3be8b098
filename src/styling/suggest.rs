//! Command suggestion helpers for hint messages.
//!
//! Build copy-pasteable commands for user suggestions:
//!
//! ```
//! use git_wt::styling::{suggest_command, hint_message};
//! use color_print::cformat;
//!
//! let cmd = suggest_command(&["-D"], &["feature"]);
//! println!("{}", hint_message(cformat!("To force delete, run <bright-black>{cmd}</>")));
//! // → ↳ To force delete, run git wt -D feature
//! ```
//!
//! Handles shell escaping and `--` separator for args starting with `-`:
//!
//! ```
//! use git_wt::styling::suggest_command;
//!
//! let cmd = suggest_command(&["-D"], &["-bugfix"]);
//! assert_eq!(cmd, "git wt -D -- -bugfix");
//!
//! let cmd = suggest_command(&[], &["my feature"]);
//! assert_eq!(cmd, "git wt 'my feature'");
//! ```

use shell_escape::escape;
use std::borrow::Cow;

/// Build a suggested `git wt` command string for hints.
///
/// Flags come first, then positional arguments. Arguments containing spaces,
/// quotes, or special shell characters are escaped using POSIX single-quote
/// style. If any positional argument starts with `-`, a `--` separator is
/// inserted before the first such argument.
pub fn suggest_command(flags: &[&str], args: &[&str]) -> String {
    let mut parts = vec!["git".to_string(), "wt".to_string()];
    parts.extend(flags.iter().map(|s| s.to_string()));

    let mut separator_inserted = false;
    for arg in args {
        if arg.starts_with('-') && !separator_inserted {
            parts.push("--".to_string());
            separator_inserted = true;
        }
        parts.push(escape(Cow::Borrowed(*arg)).into_owned());
    }

    parts.join(" ")
}
