use anyhow::Context;
use clap::Command;
use clap_complete::{Shell as CompletionShell, generate};
use git_wt::shell::{Shell, ShellInit};

use crate::output;

/// Binary name the static completions are registered for.
const BINARY_NAME: &str = "git-wt";

/// Print the shell integration for `shell`, followed by static completions
/// for invoking the binary directly.
pub fn handle_init(shell: Shell, wrapper: bool, cli_cmd: &mut Command) -> anyhow::Result<()> {
    let integration = ShellInit::new(shell, wrapper)
        .generate()
        .context("Failed to generate shell code")?;

    let mut script = integration;
    script.push_str("\n# Static completions for git-wt\n");
    script.push_str(&static_completions(shell, cli_cmd));

    output::stdout_raw(&script)?;
    Ok(())
}

fn static_completions(shell: Shell, cli_cmd: &mut Command) -> String {
    let completion_shell = match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
    };
    let mut buf = Vec::new();
    generate(completion_shell, cli_cmd, BINARY_NAME, &mut buf);
    let generated = String::from_utf8_lossy(&buf);

    // compdef only exists once compinit has run
    let compdef = format!("compdef _{BINARY_NAME} {BINARY_NAME}");
    generated
        .lines()
        .map(|line| {
            if shell == Shell::Zsh && line.trim() == compdef {
                format!("    if (( $+functions[compdef] )); then {compdef}; fi")
            } else {
                line.to_string()
            }
        })
        .fold(String::new(), |mut acc, line| {
            acc.push_str(&line);
            acc.push('\n');
            acc
        })
}
