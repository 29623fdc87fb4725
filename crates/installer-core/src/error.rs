//! Error types for the install pipeline
//!
//! Every step-level failure is an `InstallError`. Conditions the pipeline is
//! allowed to recover from (the pre-flight update check) use their own type in
//! [`crate::update`] and never appear here.

use crate::pipeline::InstallStep;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = InstallError> = std::result::Result<T, E>;

/// Errors that abort an install.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The target directory already exists. Detected before any side effect.
    #[error("can't install to {}: the directory already exists", .path.display())]
    TargetExists { path: PathBuf },

    /// A subprocess exited unsuccessfully or could not be started.
    #[error("`{command}` failed{}", exit_suffix(.code))]
    Process {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// Cloning a repository at a resolved ref failed.
    #[error("failed to check out {repo} at {reference}: `{command}` failed")]
    Materialize {
        repo: String,
        reference: String,
        command: String,
        output: String,
    },

    /// The named array block, or an entry inside it to anchor on, was not found.
    #[error("could not find a `{key}` block with an existing entry in {}", .path.display())]
    ConfigBlockNotFound { path: PathBuf, key: String },

    /// The options ask for a tree the resolved paths give no location for.
    #[error("no install location resolved for the {what}")]
    MissingLocation { what: String },

    /// The block pattern built from the config key did not compile.
    #[error("invalid config block pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operator declined a confirmation prompt.
    #[error("install cancelled")]
    Cancelled,

    /// A pipeline step failed; wraps the underlying error.
    #[error("{step} failed: {source}")]
    Step {
        step: InstallStep,
        #[source]
        source: Box<InstallError>,
    },
}

/// Coarse classification shown to the operator alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    NetworkOrProcess,
    ConfigBlockNotFound,
    Io,
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Precondition => "precondition failed",
            ErrorKind::NetworkOrProcess => "network or process error",
            ErrorKind::ConfigBlockNotFound => "config block not found",
            ErrorKind::Io => "filesystem error",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

impl InstallError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            InstallError::TargetExists { .. } | InstallError::MissingLocation { .. } => {
                ErrorKind::Precondition
            }
            InstallError::Process { .. } | InstallError::Materialize { .. } => {
                ErrorKind::NetworkOrProcess
            }
            InstallError::ConfigBlockNotFound { .. } | InstallError::Pattern(_) => {
                ErrorKind::ConfigBlockNotFound
            }
            InstallError::Io { .. } => ErrorKind::Io,
            InstallError::Cancelled => ErrorKind::Cancelled,
            InstallError::Step { source, .. } => source.kind(),
        }
    }

    /// Captured stdout/stderr of the failing subprocess, if any.
    pub fn diagnostic_output(&self) -> Option<&str> {
        match self {
            InstallError::Process { output, .. } | InstallError::Materialize { output, .. } => {
                Some(output.as_str()).filter(|o| !o.trim().is_empty())
            }
            InstallError::Step { source, .. } => source.diagnostic_output(),
            _ => None,
        }
    }

    /// The step that failed, when the error came out of the pipeline.
    pub fn step(&self) -> Option<InstallStep> {
        match self {
            InstallError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_error_keeps_inner_classification() {
        let err = InstallError::Step {
            step: InstallStep::InstallDependencies,
            source: Box::new(InstallError::Process {
                command: "composer require rareloop/lumberjack-core".to_string(),
                code: Some(2),
                output: "Your requirements could not be resolved".to_string(),
            }),
        };

        assert_eq!(err.kind(), ErrorKind::NetworkOrProcess);
        assert_eq!(err.step(), Some(InstallStep::InstallDependencies));
        assert_eq!(
            err.diagnostic_output(),
            Some("Your requirements could not be resolved")
        );
        assert!(err.to_string().contains("exit code 2"));
    }

    #[test]
    fn test_target_exists_is_precondition() {
        let err = InstallError::TargetExists {
            path: PathBuf::from("/tmp/demo"),
        };
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(err.diagnostic_output().is_none());
        assert!(err.to_string().contains("/tmp/demo"));
    }

    #[test]
    fn test_blank_output_is_not_diagnostic() {
        let err = InstallError::Process {
            command: "git ls-remote".to_string(),
            code: None,
            output: "  \n".to_string(),
        };
        assert!(err.diagnostic_output().is_none());
    }
}
