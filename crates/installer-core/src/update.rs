//! Pre-flight check for outdated globally installed composer packages
//!
//! Failing to run the check is never fatal: the result degrades to
//! [`UpdateCheck::Skipped`] and the install goes ahead.

use crate::error::InstallError;
use crate::process::{CommandLine, CommandRunner};
use serde::Deserialize;
use std::fmt;
use std::io;

/// A tracked package with a newer release available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpdateInfo {
    pub name: String,
    pub installed_version: String,
    pub latest_version: String,
}

impl fmt::Display for PackageUpdateInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} -> {})",
            self.name, self.installed_version, self.latest_version
        )
    }
}

/// Why the update check could not be completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheckWarning(pub String);

impl fmt::Display for UpdateCheckWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not check for updates: {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    UpToDate,
    UpdatesAvailable(Vec<PackageUpdateInfo>),
    Skipped(UpdateCheckWarning),
}

#[derive(Debug, Deserialize)]
struct OutdatedReport {
    #[serde(default)]
    installed: Vec<OutdatedPackage>,
}

#[derive(Debug, Deserialize)]
struct OutdatedPackage {
    name: String,
    version: String,
    latest: String,
}

pub fn outdated_command() -> CommandLine {
    CommandLine::new("composer").args(["global", "outdated", "--direct", "--format=json"])
}

/// Ask composer which global packages are outdated and keep the tracked ones
pub async fn check_for_updates(runner: &dyn CommandRunner, tracked: &[&str]) -> UpdateCheck {
    if tracked.is_empty() {
        return UpdateCheck::UpToDate;
    }

    let command = outdated_command();
    let output = match runner.output(&command).await {
        Ok(output) if output.success => output,
        Ok(output) => {
            // composer global prefixes stderr with a "Changed current directory" notice
            let reason = output
                .stderr
                .lines()
                .rfind(|l| !l.trim().is_empty())
                .map(str::trim)
                .map(str::to_string)
                .unwrap_or_else(|| format!("`{}` exited with {:?}", command, output.code));
            return skipped(reason);
        }
        Err(e) => return skipped(format!("`{}`: {}", command, e)),
    };

    match tracked_updates(&output.stdout, tracked) {
        Ok(updates) if updates.is_empty() => UpdateCheck::UpToDate,
        Ok(updates) => UpdateCheck::UpdatesAvailable(updates),
        Err(e) => skipped(format!("unexpected composer output: {}", e)),
    }
}

/// Decide whether the install may go ahead after an update check.
///
/// Only pending updates need consent: `yes` grants it up front, otherwise
/// `confirm` asks the operator. Declining, or abandoning the prompt, yields
/// [`InstallError::Cancelled`].
pub fn should_proceed<F>(check: &UpdateCheck, yes: bool, confirm: F) -> Result<(), InstallError>
where
    F: FnOnce() -> io::Result<bool>,
{
    match check {
        UpdateCheck::UpToDate | UpdateCheck::Skipped(_) => Ok(()),
        UpdateCheck::UpdatesAvailable(_) if yes => Ok(()),
        UpdateCheck::UpdatesAvailable(_) => match confirm() {
            Ok(true) => Ok(()),
            Ok(false) => Err(InstallError::Cancelled),
            Err(e) => {
                tracing::debug!(error = %e, "update prompt abandoned");
                Err(InstallError::Cancelled)
            }
        },
    }
}

fn skipped(reason: String) -> UpdateCheck {
    let warning = UpdateCheckWarning(reason);
    tracing::warn!(%warning, "skipping update check");
    UpdateCheck::Skipped(warning)
}

/// Parse `composer outdated --format=json` and intersect with `tracked`
pub fn tracked_updates(
    json: &str,
    tracked: &[&str],
) -> Result<Vec<PackageUpdateInfo>, serde_json::Error> {
    // composer prints nothing at all when no global packages exist
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let report: OutdatedReport = serde_json::from_str(json)?;
    Ok(report
        .installed
        .into_iter()
        .filter(|p| tracked.contains(&p.name.as_str()))
        .map(|p| PackageUpdateInfo {
            name: p.name,
            installed_version: p.version,
            latest_version: p.latest,
        })
        .collect())
}
