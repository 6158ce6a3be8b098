//! Shell integration for git-wt.
//!
//! `git wt --init <shell>` prints a script that defines:
//!
//! - a `git` wrapper function which intercepts `git wt`, exports
//!   `GIT_WT_SHELL_INTEGRATION=1` for the child, and changes directory when the
//!   child exits zero and the last line of its stdout names an existing directory;
//! - a completion function for `git wt` that asks the binary for candidates
//!   via the hidden `--complete` flag.
//!
//! With `--nocd` the wrapper is omitted and only completion is emitted.

use askama::Template;

/// Environment variable the wrapper sets for the `git wt` child process.
pub const SHELL_INTEGRATION_ENV: &str = "GIT_WT_SHELL_INTEGRATION";

/// Whether the current process was launched by the shell wrapper.
pub fn integration_active() -> bool {
    std::env::var(SHELL_INTEGRATION_ENV).is_ok_and(|v| v == "1")
}

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[strum(serialize = "powershell")]
    #[clap(name = "powershell")]
    PowerShell,
}

/// Shell integration configuration
pub struct ShellInit {
    pub shell: Shell,
    /// Include the cd-on-success `git` wrapper function.
    pub wrapper: bool,
}

impl ShellInit {
    pub fn new(shell: Shell, wrapper: bool) -> Self {
        Self { shell, wrapper }
    }

    /// Render the integration script for this shell.
    pub fn generate(&self) -> Result<String, askama::Error> {
        let wrapper = self.wrapper;
        match self.shell {
            Shell::Bash => BashTemplate { wrapper }.render(),
            Shell::Zsh => ZshTemplate { wrapper }.render(),
            Shell::Fish => FishTemplate { wrapper }.render(),
            Shell::PowerShell => PowerShellTemplate { wrapper }.render(),
        }
    }
}

/// Bash shell template
#[derive(Template)]
#[template(path = "bash.sh", escape = "none")]
struct BashTemplate {
    wrapper: bool,
}

/// Zsh shell template
#[derive(Template)]
#[template(path = "zsh.zsh", escape = "none")]
struct ZshTemplate {
    wrapper: bool,
}

/// Fish shell template
#[derive(Template)]
#[template(path = "fish.fish", escape = "none")]
struct FishTemplate {
    wrapper: bool,
}

/// PowerShell template
#[derive(Template)]
#[template(path = "powershell.ps1", escape = "none")]
struct PowerShellTemplate {
    wrapper: bool,
}
