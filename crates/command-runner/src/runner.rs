//! The [`ProcessRunner`] seam and its local implementation

use crate::command::Command;
use crate::error::{Error, Result};
use std::io::{BufRead, BufReader, Read, Write};
use std::process::Stdio;
use std::thread;
use tracing::debug;

/// Process exit status
#[derive(Debug, Clone)]
pub struct ExitStatus {
    /// Exit code if the process exited normally
    pub code: Option<i32>,
    /// Signal that terminated the process (Unix only)
    #[cfg(unix)]
    pub signal: Option<i32>,
}

impl ExitStatus {
    /// Returns true if the process exited successfully (code 0)
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The outcome of a completed command: exit status plus captured output
#[derive(Debug, Clone)]
pub struct ExitResult {
    /// How the process exited
    pub status: ExitStatus,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ExitResult {
    /// Returns true if the command exited successfully
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// How a command's output should be handled while it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Capture stdout/stderr quietly
    Capture,
    /// Echo stdout/stderr live to the parent's streams while also capturing
    Stream,
}

/// A runner that can execute commands and wait for them to complete
///
/// The trait exists so orchestration code can be exercised against a scripted
/// runner in tests; production code uses [`LocalRunner`].
pub trait ProcessRunner: Send + Sync {
    /// Execute a command, block until it exits, and return its outcome.
    ///
    /// A non-zero exit is not an error at this level; callers inspect the
    /// returned [`ExitResult`]. Errors are reserved for failures to run the
    /// command at all.
    fn run(&self, command: &Command, output: OutputMode) -> Result<ExitResult>;
}

/// Runs commands as local child processes via `std::process`
///
/// The child shares the parent's process group, so a terminal-delivered
/// SIGINT reaches any in-flight command without explicit forwarding.
#[derive(Debug, Clone, Default)]
pub struct LocalRunner;

impl LocalRunner {
    /// Create a new local runner
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for LocalRunner {
    fn run(&self, command: &Command, output: OutputMode) -> Result<ExitResult> {
        debug!(command = %command.display(), "running command");

        let mut child = command
            .prepare()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::CommandNotFound {
                    command: command.get_program().to_string_lossy().into_owned(),
                },
                _ => Error::spawn_failed(e.to_string()),
            })?;

        // Both pipes are drained on their own threads so neither can fill up
        // and block the child.
        let stdout_pipe = child.stdout.take().expect("stdout was piped");
        let stderr_pipe = child.stderr.take().expect("stderr was piped");
        let echo = output == OutputMode::Stream;

        let stdout_thread =
            thread::spawn(move || drain(stdout_pipe, echo, &mut std::io::stdout()));
        let stderr_thread =
            thread::spawn(move || drain(stderr_pipe, echo, &mut std::io::stderr()));

        let status = child.wait()?;
        let stdout = stdout_thread.join().expect("stdout reader panicked")?;
        let stderr = stderr_thread.join().expect("stderr reader panicked")?;

        #[cfg(unix)]
        let status = {
            use std::os::unix::process::ExitStatusExt;
            ExitStatus {
                code: status.code(),
                signal: status.signal(),
            }
        };
        #[cfg(not(unix))]
        let status = ExitStatus {
            code: status.code(),
        };

        Ok(ExitResult {
            status,
            stdout,
            stderr,
        })
    }
}

/// Read a pipe to completion, optionally echoing each line to `sink`
fn drain<R: Read, W: Write>(pipe: R, echo: bool, sink: &mut W) -> Result<String> {
    let mut captured = String::new();
    for line in BufReader::new(pipe).lines() {
        let line = line?;
        if echo {
            writeln!(sink, "{}", line)?;
        }
        captured.push_str(&line);
        captured.push('\n');
    }
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");

        let result = LocalRunner::new().run(&cmd, OutputMode::Capture).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "");
    }

    #[test]
    fn test_nonzero_exit_is_not_a_run_error() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo oops >&2; exit 3"]);

        let result = LocalRunner::new().run(&cmd, OutputMode::Capture).unwrap();
        assert!(!result.success());
        assert_eq!(result.status.code, Some(3));
        assert_eq!(result.stderr, "oops\n");
    }

    #[test]
    fn test_missing_command() {
        let cmd = Command::new("definitely-not-a-real-binary-xyz");
        let err = LocalRunner::new().run(&cmd, OutputMode::Capture).unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
    }
}
