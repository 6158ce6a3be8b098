use clap::builder::styling::{AnsiColor, Color, Styles};
use clap::error::ErrorKind;
use clap::{Command, CommandFactory, Parser};

use git_wt::config::ConfigOverrides;
use git_wt::shell::Shell;

/// Custom styles for help output
fn help_styles() -> Styles {
    Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .placeholder(anstyle::Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
}

/// Help template for the command
const HELP_TEMPLATE: &str = "\
{before-help}{name} - {about-with-newline}
Usage: {usage}

{all-args}{after-help}";

const OVERRIDES_HEADING: &str = "Config Overrides";

#[derive(Parser, Debug)]
#[command(name = "git-wt", bin_name = "git wt")]
#[command(about = "Create, switch to and delete git worktrees with one verb", long_about = None)]
#[command(version)]
#[command(styles = help_styles())]
#[command(help_template = HELP_TEMPLATE)]
#[command(after_long_help = "\
Examples

  git wt                      # List worktrees
  git wt feature              # Switch to feature's worktree, creating it if needed
  git wt hotfix main          # Create hotfix from main
  git wt -d feature           # Delete the worktree and its branch
  git wt -D feature           # ...even if dirty or unmerged

Shell integration (enables cd):

  eval \"$(git wt --init bash)\"

Settings live in git config under wt.* (e.g. git config wt.basedir ../{repo-name}-wt).")]
pub(crate) struct Cli {
    /// Branch, worktree directory name or path; for create, an optional start point follows
    #[arg(value_name = "TOKEN")]
    pub args: Vec<String>,

    /// Delete worktrees and their branches; refuses dirty worktrees and unmerged branches
    #[arg(short = 'd', long = "delete", conflicts_with = "force_delete")]
    pub delete: bool,

    /// Delete worktrees and branches even if dirty or unmerged
    #[arg(short = 'D', long = "force-delete")]
    pub force_delete: bool,

    /// Print shell integration for SHELL
    #[arg(long, value_name = "SHELL")]
    pub init: Option<Shell>,

    /// With --init, omit the cd wrapper; otherwise keep the shell in place
    #[arg(long)]
    pub nocd: bool,

    /// List worktrees as JSON
    #[arg(long)]
    pub json: bool,

    /// Print completion candidates (used by shell integration)
    #[arg(long, hide = true)]
    pub complete: bool,

    /// Directory for new worktrees (overrides wt.basedir)
    #[arg(long, value_name = "PATH", help_heading = OVERRIDES_HEADING)]
    pub basedir: Option<String>,

    /// Copy ignored files into new worktrees
    #[arg(long, help_heading = OVERRIDES_HEADING)]
    pub copyignored: bool,

    /// Copy untracked files into new worktrees
    #[arg(long, help_heading = OVERRIDES_HEADING)]
    pub copyuntracked: bool,

    /// Copy modified files into new worktrees
    #[arg(long, help_heading = OVERRIDES_HEADING)]
    pub copymodified: bool,

    /// Never copy files matching PATTERN (gitignore syntax, repeatable)
    #[arg(long, value_name = "PATTERN", help_heading = OVERRIDES_HEADING)]
    pub nocopy: Vec<String>,

    /// Copy ignored files matching PATTERN (gitignore syntax, repeatable)
    #[arg(long, value_name = "PATTERN", help_heading = OVERRIDES_HEADING)]
    pub copy: Vec<String>,

    /// Run COMMAND in a new worktree (repeatable)
    #[arg(long, value_name = "COMMAND", help_heading = OVERRIDES_HEADING)]
    pub hook: Vec<String>,

    /// Run COMMAND in a worktree before deleting it (repeatable)
    #[arg(long, value_name = "COMMAND", help_heading = OVERRIDES_HEADING)]
    pub deletehook: Vec<String>,

    /// Remove worktrees with COMMAND "$1" instead of git worktree remove
    #[arg(long, value_name = "COMMAND", help_heading = OVERRIDES_HEADING)]
    pub remover: Option<String>,

    /// Keep the current subdirectory when switching
    #[arg(long, help_heading = OVERRIDES_HEADING)]
    pub relative: bool,

    /// Allow deleting the default branch
    #[arg(long, help_heading = OVERRIDES_HEADING)]
    pub allow_delete_default: bool,

    /// Show debug logging (-vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What a parsed command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action<'a> {
    Init { shell: Shell, wrapper: bool },
    Complete,
    List { json: bool },
    Switch { token: &'a str, start_point: Option<&'a str> },
    Delete { tokens: &'a [String], force: bool },
}

impl Cli {
    /// Decide the action, rejecting argument counts that make no sense.
    pub fn action(&self) -> Result<Action<'_>, clap::Error> {
        if let Some(shell) = self.init {
            return Ok(Action::Init {
                shell,
                wrapper: !self.nocd,
            });
        }
        if self.complete {
            return Ok(Action::Complete);
        }
        if self.delete || self.force_delete {
            if self.args.is_empty() {
                return Err(usage_error(
                    ErrorKind::MissingRequiredArgument,
                    "deleting requires at least one worktree or branch",
                ));
            }
            return Ok(Action::Delete {
                tokens: &self.args,
                force: self.force_delete,
            });
        }
        match self.args.as_slice() {
            [] => Ok(Action::List { json: self.json }),
            [token] => Ok(Action::Switch {
                token,
                start_point: None,
            }),
            [token, start] => Ok(Action::Switch {
                token,
                start_point: Some(start.as_str()),
            }),
            _ => Err(usage_error(
                ErrorKind::TooManyValues,
                "too many arguments: expected a branch and an optional start point",
            )),
        }
    }

    /// Config values supplied on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        let given = |flag: bool| flag.then_some(true);
        ConfigOverrides {
            base_dir: self.basedir.clone(),
            copy_ignored: given(self.copyignored),
            copy_untracked: given(self.copyuntracked),
            copy_modified: given(self.copymodified),
            no_copy: self.nocopy.clone(),
            copy: self.copy.clone(),
            create_hooks: self.hook.clone(),
            delete_hooks: self.deletehook.clone(),
            remover: self.remover.clone(),
            no_cd: self.nocd,
            relative: given(self.relative),
            allow_delete_default: given(self.allow_delete_default),
        }
    }
}

pub(crate) fn build_command() -> Command {
    Cli::command()
}

fn usage_error(kind: ErrorKind, message: &str) -> clap::Error {
    build_command().error(kind, message)
}
