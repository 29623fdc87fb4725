//! Subprocess execution for git and composer
//!
//! Every external tool is driven through the [`CommandRunner`] trait so the
//! pipeline can be exercised without a network or the real executables.

use crate::error::{InstallError, Result};
use async_trait::async_trait;
use colored::Colorize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// A program invocation: executable, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout followed by stderr, for diagnostics
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }

    /// Convert a non-zero exit into `InstallError::Process`
    pub fn check(self, command: &CommandLine) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(InstallError::Process {
                command: command.to_string(),
                code: self.code,
                output: self.combined(),
            })
        }
    }
}

/// Error for a command that could not be started at all
pub fn spawn_error(command: &CommandLine, err: io::Error) -> InstallError {
    InstallError::Process {
        command: command.to_string(),
        code: None,
        output: err.to_string(),
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run and capture output without displaying it
    async fn output(&self, command: &CommandLine) -> io::Result<CommandOutput>;

    /// Run while forwarding output line by line to the terminal, also capturing it
    async fn stream(&self, command: &CommandLine) -> io::Result<CommandOutput>;
}

/// Runner backed by real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(command: &CommandLine) -> TokioCommand {
        let mut cmd = TokioCommand::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null());
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn output(&self, command: &CommandLine) -> io::Result<CommandOutput> {
        tracing::debug!(%command, "running");
        let output = Self::command(command).output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn stream(&self, command: &CommandLine) -> io::Result<CommandOutput> {
        tracing::debug!(%command, "running (streamed)");
        let mut child = Self::command(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "failed to capture stderr"))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let mut captured = CommandOutput::default();
        let mut stdout_done = false;
        let mut stderr_done = false;

        while !(stdout_done && stderr_done) {
            tokio::select! {
                line = stdout_reader.next_line(), if !stdout_done => {
                    match line? {
                        Some(line) => {
                            println!("  {}", line);
                            captured.stdout.push_str(&line);
                            captured.stdout.push('\n');
                        }
                        None => stdout_done = true,
                    }
                }
                line = stderr_reader.next_line(), if !stderr_done => {
                    match line? {
                        Some(line) => {
                            eprintln!("  {}", line.yellow());
                            captured.stderr.push_str(&line);
                            captured.stderr.push('\n');
                        }
                        None => stderr_done = true,
                    }
                }
            }
        }

        let status = child.wait().await?;
        captured.success = status.success();
        captured.code = status.code();
        Ok(captured)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::sync::Mutex;

    type Handler = Box<dyn Fn(&CommandLine) -> io::Result<CommandOutput> + Send + Sync>;

    /// Records every invocation and answers through a closure
    pub(crate) struct StubRunner {
        handler: Handler,
        calls: Mutex<Vec<CommandLine>>,
    }

    impl StubRunner {
        pub(crate) fn new<F>(handler: F) -> Self
        where
            F: Fn(&CommandLine) -> io::Result<CommandOutput> + Send + Sync + 'static,
        {
            Self {
                handler: Box::new(handler),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<CommandLine> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        fn record(&self, command: &CommandLine) -> io::Result<CommandOutput> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(command.clone());
            }
            (self.handler)(command)
        }
    }

    #[async_trait]
    impl CommandRunner for StubRunner {
        async fn output(&self, command: &CommandLine) -> io::Result<CommandOutput> {
            self.record(command)
        }

        async fn stream(&self, command: &CommandLine) -> io::Result<CommandOutput> {
            self.record(command)
        }
    }

    pub(crate) fn ok(stdout: &str) -> io::Result<CommandOutput> {
        Ok(CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub(crate) fn failed(code: i32, stderr: &str) -> io::Result<CommandOutput> {
        Ok(CommandOutput {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_arguments_with_spaces() {
        let cmd = CommandLine::new("git")
            .args(["clone", "--depth=1"])
            .arg("/tmp/my site");
        assert_eq!(cmd.to_string(), "git clone --depth=1 '/tmp/my site'");
    }

    #[test]
    fn test_check_converts_failure() {
        let cmd = CommandLine::new("composer").arg("require");
        let output = CommandOutput {
            success: false,
            code: Some(1),
            stdout: "Loading composer repositories".to_string(),
            stderr: "Could not find package".to_string(),
        };

        let err = output.check(&cmd).unwrap_err();
        match err {
            InstallError::Process {
                command,
                code,
                output,
            } => {
                assert_eq!(command, "composer require");
                assert_eq!(code, Some(1));
                assert_eq!(output, "Loading composer repositories\nCould not find package");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let cmd = CommandLine::new("sh").args(["-c", "echo out; echo err 1>&2; exit 3"]);
        let output = SystemRunner.stream(&cmd).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_system_runner_missing_program() {
        let cmd = CommandLine::new("definitely-not-a-real-binary-4f2a");
        assert!(SystemRunner.output(&cmd).await.is_err());
    }
}
