//! Cross-platform shell execution
//!
//! Provides a unified interface for executing external commands:
//! - Unix: hooks and the custom remover run under `/bin/sh -c`
//! - Windows: Git Bash if available, falls back to PowerShell
//!
//! Every process spawned by git-wt goes through [`run`] (captured output) or
//! [`run_streaming`] (inherited stderr, cancellable).

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::git::{GitError, WtError};

/// Cached shell configuration for the current platform
static SHELL_CONFIG: OnceLock<ShellConfig> = OnceLock::new();

/// Shell configuration for command execution
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Path to the shell executable
    pub executable: PathBuf,
    /// Arguments to pass before the command (e.g., ["-c"] for sh)
    pub args: Vec<String>,
    /// Whether this is a POSIX-compatible shell (bash/sh)
    pub is_posix: bool,
    /// Human-readable name for error messages
    pub name: String,
}

impl ShellConfig {
    /// Get the shell configuration for the current platform
    pub fn get() -> &'static ShellConfig {
        SHELL_CONFIG.get_or_init(detect_shell)
    }

    /// Create a Command configured for shell execution
    ///
    /// The command string will be passed to the shell for interpretation.
    pub fn command(&self, shell_command: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.args);
        cmd.arg(shell_command);
        cmd
    }

    /// Create a Command that receives `positional` as `$1`, `$2`, ...
    ///
    /// POSIX shells take the first argument after the script as `$0`, so a `_`
    /// placeholder is inserted. The positional values are never interpolated
    /// into the script text.
    pub fn command_with_args(&self, shell_command: &str, positional: &[&str]) -> Command {
        let mut cmd = self.command(shell_command);
        if self.is_posix {
            cmd.arg("_");
        }
        cmd.args(positional);
        cmd
    }
}

/// Detect the best available shell for the current platform
fn detect_shell() -> ShellConfig {
    #[cfg(unix)]
    {
        ShellConfig {
            executable: PathBuf::from("sh"),
            args: vec!["-c".to_string()],
            is_posix: true,
            name: "sh".to_string(),
        }
    }

    #[cfg(windows)]
    {
        if let Some(bash_path) = find_git_bash() {
            return ShellConfig {
                executable: bash_path,
                args: vec!["-c".to_string()],
                is_posix: true,
                name: "Git Bash".to_string(),
            };
        }

        ShellConfig {
            executable: PathBuf::from("powershell.exe"),
            args: vec!["-NoProfile".to_string(), "-Command".to_string()],
            is_posix: false,
            name: "PowerShell".to_string(),
        }
    }
}

/// Find Git Bash by deriving its location from `git.exe` in PATH.
///
/// `which bash` is avoided: on systems with WSL, `C:\Windows\System32\bash.exe`
/// often shadows Git Bash.
#[cfg(windows)]
fn find_git_bash() -> Option<PathBuf> {
    let git_path = which::which("git").ok()?;
    let git_dir = git_path.parent()?.parent()?;
    [
        git_dir.join("bin").join("bash.exe"),
        git_dir.join("usr").join("bin").join("bash.exe"),
    ]
    .into_iter()
    .find(|p| p.exists())
}

fn command_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn log_trace(context: Option<&str>, cmd_str: &str, t0: Instant, outcome: Result<bool, String>) {
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;
    let ctx = context.map(|c| format!("context={c} ")).unwrap_or_default();
    match outcome {
        Ok(ok) => {
            log::debug!("[wt-trace] {ctx}cmd=\"{cmd_str}\" dur={duration_ms:.1}ms ok={ok}")
        }
        Err(e) => {
            log::debug!("[wt-trace] {ctx}cmd=\"{cmd_str}\" dur={duration_ms:.1}ms err=\"{e}\"")
        }
    }
}

/// Execute a command with captured output, timing and debug logging.
///
/// ```text
/// $ git worktree list --porcelain [repo]
/// [wt-trace] context=repo cmd="..." dur=12.3ms ok=true
/// ```
///
/// The `context` parameter is typically the directory name the command runs in.
pub fn run(cmd: &mut Command, context: Option<&str>) -> std::io::Result<std::process::Output> {
    let cmd_str = command_string(cmd);
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }

    let t0 = Instant::now();
    let result = cmd.output();
    log_trace(
        context,
        &cmd_str,
        t0,
        result
            .as_ref()
            .map(|o| o.status.success())
            .map_err(|e| e.to_string()),
    );
    result
}

/// Execute a command in `working_dir` with its stdout redirected to our stderr.
///
/// Child stderr is inherited so TTY detection in the child keeps working; stdout
/// is redirected at the OS level so the only writer to our stdout is git-wt itself.
/// Stdin is null: the child runs outside the terminal's foreground process group.
///
/// On Unix the child runs in its own process group. SIGINT/SIGTERM received while
/// waiting are forwarded to that group; if the group does not exit promptly the
/// signal is escalated (SIGINT → SIGTERM → SIGKILL, SIGTERM → SIGKILL). The error
/// carries exit code 128 + signal number, matching shell conventions.
pub fn run_streaming(
    cmd: &mut Command,
    working_dir: &Path,
    context: Option<&str>,
) -> anyhow::Result<()> {
    #[cfg(unix)]
    use {
        signal_hook::consts::{SIGINT, SIGTERM},
        signal_hook::iterator::Signals,
        std::os::unix::process::CommandExt,
    };

    let cmd_str = command_string(cmd);
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }

    #[cfg(unix)]
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    #[cfg(unix)]
    cmd.process_group(0);

    let t0 = Instant::now();
    let mut child = cmd
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(std::io::stderr()))
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| {
            anyhow::Error::from(GitError::Other {
                message: format!("Failed to execute {cmd_str}: {e}"),
            })
        })?;

    #[cfg(unix)]
    let child_pgid = child.id() as i32;
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut seen_signal: Option<i32> = None;
    let status: ExitStatus = loop {
        if let Some(status) = child.wait_timeout(Duration::from_millis(10)).map_err(|e| {
            anyhow::Error::from(GitError::Other {
                message: format!("Failed to wait for {cmd_str}: {e}"),
            })
        })? {
            break status;
        }
        #[cfg(unix)]
        for sig in signals.pending() {
            if seen_signal.is_none() {
                seen_signal = Some(sig);
                forward_signal_with_escalation(child_pgid, sig);
            }
        }
    };
    log_trace(context, &cmd_str, t0, Ok(status.success()));

    if let Some(sig) = seen_signal {
        return Err(WtError::ChildProcessExited {
            code: 128 + sig,
            message: format!("terminated by signal {sig}"),
        }
        .into());
    }

    #[cfg(unix)]
    if let Some(sig) = std::os::unix::process::ExitStatusExt::signal(&status) {
        return Err(WtError::ChildProcessExited {
            code: 128 + sig,
            message: format!("terminated by signal {sig}"),
        }
        .into());
    }

    if !status.success() {
        let code = status.code().unwrap_or(1);
        return Err(WtError::ChildProcessExited {
            code,
            message: format!("exit status: {code}"),
        }
        .into());
    }

    Ok(())
}

#[cfg(unix)]
fn process_group_alive(pgid: nix::unistd::Pid) -> bool {
    match nix::sys::signal::killpg(pgid, None) {
        Ok(_) => true,
        Err(nix::errno::Errno::ESRCH) => false,
        Err(_) => true,
    }
}

#[cfg(unix)]
fn exited_within(pgid: nix::unistd::Pid, grace: Duration) -> bool {
    std::thread::sleep(grace);
    !process_group_alive(pgid)
}

#[cfg(unix)]
fn forward_signal_with_escalation(pgid: i32, sig: i32) {
    use nix::sys::signal::{Signal, killpg};

    let pgid = nix::unistd::Pid::from_raw(pgid);
    let escalation: &[Signal] = match sig {
        signal_hook::consts::SIGINT => &[Signal::SIGINT, Signal::SIGTERM, Signal::SIGKILL],
        signal_hook::consts::SIGTERM => &[Signal::SIGTERM, Signal::SIGKILL],
        _ => return,
    };

    let grace = Duration::from_millis(200);
    for (i, signal) in escalation.iter().enumerate() {
        if i > 0 && exited_within(pgid, grace) {
            return;
        }
        let _ = killpg(pgid, *signal);
    }
}
