//! `.env.example` augmentation

use crate::error::{InstallError, Result};
use std::path::Path;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub const ENV_TEMPLATE: &str = ".env.example";
pub const ENV_WORKING: &str = ".env";

/// Append `lines` verbatim to the project's `.env.example`, then copy it to
/// `.env` when `copy_working` is set.
///
/// Existing content is left untouched. Running this twice appends the lines
/// twice.
pub async fn augment_env(project_dir: &Path, lines: &[String], copy_working: bool) -> Result<()> {
    let template = project_dir.join(ENV_TEMPLATE);

    let mut file = OpenOptions::new()
        .append(true)
        .open(&template)
        .await
        .map_err(|e| InstallError::io(&template, e))?;

    for line in lines {
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| InstallError::io(&template, e))?;
    }
    file.flush()
        .await
        .map_err(|e| InstallError::io(&template, e))?;
    drop(file);

    tracing::debug!(path = %template.display(), lines = lines.len(), "appended env lines");

    if copy_working {
        let working = project_dir.join(ENV_WORKING);
        fs::copy(&template, &working)
            .await
            .map_err(|e| InstallError::io(&working, e))?;
        tracing::debug!(path = %working.display(), "created working env file");
    }

    Ok(())
}
