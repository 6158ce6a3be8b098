use std::io::Write;
use std::process;

use clap::Parser;
use color_print::cformat;
use git_wt::git::{GitError, WtError, exit_code};
use git_wt::styling::{eprintln, error_message, format_with_gutter};

mod cli;
mod commands;
mod output;

use cli::{Action, Cli};
use commands::{handle_complete, handle_delete, handle_init, handle_list, handle_switch};

fn init_logging(verbose: u8) {
    // -vv enables debug logging; otherwise respect RUST_LOG (defaulting to off)
    let mut builder = if verbose >= 2 {
        let mut b = env_logger::Builder::new();
        b.filter_level(log::LevelFilter::Debug);
        b
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off"))
    };

    builder
        .format(|buf, record| {
            let msg = record.args().to_string();

            // Commands start with $, make only the command bold (not $ or [context])
            if let Some(rest) = msg.strip_prefix("$ ") {
                match rest.find(" [") {
                    Some(pos) => {
                        let (command, context) = rest.split_at(pos);
                        writeln!(buf, "{}", cformat!("$ <bold>{command}</>{context}"))
                    }
                    None => writeln!(buf, "{}", cformat!("$ <bold>{rest}</>")),
                }
            } else if msg.starts_with("  ! ") {
                writeln!(buf, "{}", cformat!("<red>{msg}</>"))
            } else if record.level() <= log::Level::Warn {
                writeln!(buf, "{}", cformat!("<yellow>{msg}</>"))
            } else {
                writeln!(buf, "{msg}")
            }
        })
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let action = cli.action().unwrap_or_else(|e| e.exit());
    let overrides = cli.overrides();
    match action {
        Action::Init { shell, wrapper } => {
            handle_init(shell, wrapper, &mut cli::build_command())
        }
        Action::Complete => handle_complete(),
        Action::List { json } => handle_list(json),
        Action::Switch { token, start_point } => handle_switch(token, start_point, &overrides),
        Action::Delete { tokens, force } => handle_delete(tokens, force, &overrides),
    }
}

fn print_error(e: &anyhow::Error) {
    // GitError and WtError produce styled output via Display
    if let Some(err) = e.downcast_ref::<GitError>() {
        eprintln!("{err}");
    } else if let Some(err) = e.downcast_ref::<WtError>() {
        eprintln!("{err}");
    } else {
        // With context: context as header, causes in a gutter
        let msg = e.to_string();
        let chain: Vec<String> = e.chain().skip(1).map(|c| c.to_string()).collect();
        eprintln!("{}", error_message(&msg));
        if !chain.is_empty() {
            eprintln!("{}", format_with_gutter(&chain.join("\n")));
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        print_error(&e);
        // Preserve exit code from child processes (especially for signals like SIGINT)
        process::exit(exit_code(&e).unwrap_or(1));
    }
}
