//! Command execution utilities
//!
//! This module provides the single primitive the tasks shell out through:
//! run a command line synchronously (optionally capturing its output) or
//! launch it detached as a background process.

use std::process::{Command, Stdio};

/// Outcome of one external command execution
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Exit code of the process (-1 when the process could not be spawned
    /// or was terminated by a signal)
    pub exit_code: i32,
    /// Combined stdout and stderr of the process
    pub captured_output: String,
}

impl CommandOutcome {
    /// A command succeeded iff it exited with code zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executor for external commands used by every task step
///
/// Strictly one command in flight per call, synchronous unless detached.
/// The executor reduces results to exit codes and captured text; it never
/// interprets failure causes, that is up to the calling step.
#[derive(Debug, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a command line synchronously, reporting success by exit code
    pub fn execute(&self, command: &str, stream_output: bool) -> bool {
        let mut shell = shell_command(command);

        if !stream_output {
            shell.stdout(Stdio::null()).stderr(Stdio::null());
        }

        match shell.status() {
            Ok(status) => status.success(),
            Err(_) => false,
        }
    }

    /// Execute a command line synchronously and capture its combined output
    ///
    /// The captured text is returned regardless of success or failure.
    pub fn execute_capturing(&self, command: &str, stream_output: bool) -> CommandOutcome {
        let output = match shell_command(command).output() {
            Ok(output) => output,
            Err(e) => {
                return CommandOutcome {
                    exit_code: -1,
                    captured_output: e.to_string(),
                }
            }
        };

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));

        if stream_output && !captured.is_empty() {
            print!("{}", captured);
        }

        CommandOutcome {
            exit_code: output.status.code().unwrap_or(-1),
            captured_output: captured,
        }
    }

    /// Launch a command line as a detached background process
    ///
    /// Returns true iff the launch succeeded; completion is never awaited.
    pub fn execute_detached(&self, command: &str) -> bool {
        shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .is_ok()
    }
}

/// Build a process command that runs the given line through the platform shell
fn shell_command(command: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut shell = Command::new("cmd");
        shell.arg("/C").arg(command);
        shell
    } else {
        let mut shell = Command::new("sh");
        shell.arg("-c").arg(command);
        shell
    }
}
