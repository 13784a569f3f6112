//! External command runner shared by the `gcloud` and `kubectl` services
//!
//! Children are spawned with `kill_on_drop`, so a phase timeout that drops
//! the running future also kills the process.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// How a command's standard output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Collect stdout and return it
    Capture,
    /// Let stdout through to the terminal; stderr is logged line by line
    Forward,
}

/// Runs one program with a fixed set of leading arguments
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    base_args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Arguments placed before every invocation's own
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Printable command line, for logs
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.base_args.iter().map(String::as_str))
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion
    ///
    /// # Returns
    /// Captured stdout in [`OutputMode::Capture`], an empty string otherwise.
    ///
    /// # Errors
    /// `Spawn` when the program cannot be started, `NonZeroExit` with the
    /// trimmed stderr when it exits unsuccessfully.
    pub async fn run(&self, args: &[String], mode: OutputMode) -> ServiceResult<String> {
        debug!(command = %self.command_line(args), "Running external command");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        match mode {
            OutputMode::Capture => cmd.stdout(Stdio::piped()),
            OutputMode::Forward => cmd.stdout(Stdio::inherit()),
        };

        let spawn_error = |source| ServiceError::Spawn {
            program: self.program.clone(),
            source,
        };

        match mode {
            OutputMode::Capture => {
                let output = cmd.output().await.map_err(spawn_error)?;
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if !output.status.success() {
                    return Err(self.non_zero_exit(output.status, stderr));
                }
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            OutputMode::Forward => {
                let mut child = cmd.spawn().map_err(spawn_error)?;

                // Drain to EOF: a closed pipe would kill the child with SIGPIPE.
                let mut stderr = String::new();
                if let Some(pipe) = child.stderr.take() {
                    let mut reader = BufReader::new(pipe);
                    let mut buf = Vec::new();
                    while let Ok(read) = reader.read_until(b'\n', &mut buf).await {
                        if read == 0 {
                            break;
                        }
                        let line = String::from_utf8_lossy(&buf);
                        let line = line.trim_end();
                        debug!(program = %self.program, "{}", line);
                        stderr.push_str(line);
                        stderr.push('\n');
                        buf.clear();
                    }
                }

                let status = child.wait().await.map_err(spawn_error)?;
                if !status.success() {
                    return Err(self.non_zero_exit(status, stderr.trim().to_string()));
                }
                Ok(String::new())
            }
        }
    }

    fn non_zero_exit(&self, status: std::process::ExitStatus, stderr: String) -> ServiceError {
        ServiceError::NonZeroExit {
            program: self.program.clone(),
            status: status.to_string(),
            stderr,
        }
    }
}
