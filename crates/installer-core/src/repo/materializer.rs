//! Shallow checkout of a template repository into a plain file tree

use super::resolver::GitRef;
use crate::config::Repository;
use crate::error::{InstallError, Result};
use crate::process::{CommandLine, CommandRunner};
use std::io;
use std::path::Path;
use tokio::fs;

/// Clone `repo` at `git_ref` into `target` and strip its `.git` directory.
///
/// `target` must not exist yet. Clone output is forwarded to the terminal.
pub async fn materialize(
    runner: &dyn CommandRunner,
    repo: &Repository,
    git_ref: &GitRef,
    target: &Path,
) -> Result<()> {
    if target.exists() {
        return Err(InstallError::TargetExists {
            path: target.to_path_buf(),
        });
    }

    let command = clone_command(&repo.url, git_ref, target);
    tracing::info!(repo = %repo.url, reference = git_ref.name(), target = %target.display(), "cloning");

    let materialize_error = |output: String| InstallError::Materialize {
        repo: repo.url.clone(),
        reference: git_ref.name().to_string(),
        command: command.to_string(),
        output,
    };

    let output = runner
        .stream(&command)
        .await
        .map_err(|e| materialize_error(e.to_string()))?;
    if !output.success {
        return Err(materialize_error(output.combined()));
    }

    strip_git_metadata(target).await
}

fn clone_command(url: &str, git_ref: &GitRef, target: &Path) -> CommandLine {
    CommandLine::new("git")
        .args(["clone", "--depth=1", "--branch", git_ref.name(), url])
        .arg(target.to_string_lossy())
}

async fn strip_git_metadata(target: &Path) -> Result<()> {
    let git_dir = target.join(".git");
    match fs::remove_dir_all(&git_dir).await {
        Ok(()) => {
            tracing::debug!(path = %git_dir.display(), "removed git metadata");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(InstallError::io(git_dir, e)),
    }
}
