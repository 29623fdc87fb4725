//! Composer dependency installation

use crate::config::ComposerDependency;
use crate::error::Result;
use crate::process::{spawn_error, CommandLine, CommandRunner};
use std::path::Path;

/// Build the single `composer require` call for the whole dependency set
pub fn require_command(project_dir: &Path, dependencies: &[ComposerDependency]) -> CommandLine {
    CommandLine::new("composer")
        .arg("require")
        .args(dependencies.iter().map(ToString::to_string))
        .current_dir(project_dir)
}

/// Require every package in one composer invocation inside `project_dir`,
/// streaming composer's progress output.
pub async fn install_dependencies(
    runner: &dyn CommandRunner,
    project_dir: &Path,
    dependencies: &[ComposerDependency],
) -> Result<()> {
    if dependencies.is_empty() {
        return Ok(());
    }

    let command = require_command(project_dir, dependencies);
    tracing::info!(%command, "installing composer dependencies");

    runner
        .stream(&command)
        .await
        .map_err(|e| spawn_error(&command, e))?
        .check(&command)?;

    Ok(())
}
