//! The ordered install pipeline
//!
//! One canonical sequence of steps; optional steps are left out of the plan
//! when their options are not set. Steps run strictly one after another and
//! the first failure aborts the rest. Nothing is rolled back: whatever was
//! written before the failure stays on disk.

use crate::composer;
use crate::config::{InstallOptions, Repository};
use crate::env;
use crate::error::{InstallError, Result};
use crate::paths::ProjectPaths;
use crate::process::CommandRunner;
use crate::providers;
use crate::repo::{materialize, resolve_ref, GitRef};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStep {
    MaterializePrimary,
    MaterializeSecondary,
    InstallDependencies,
    MaterializeTheme,
    AugmentEnv,
    InjectProviders,
    CleanupScaffold,
}

impl InstallStep {
    /// The steps that will run for `options`, in execution order
    pub fn plan(options: &InstallOptions) -> Vec<InstallStep> {
        let mut steps = vec![InstallStep::MaterializePrimary];
        if options.secondary.is_some() {
            steps.push(InstallStep::MaterializeSecondary);
        }
        steps.extend([
            InstallStep::InstallDependencies,
            InstallStep::MaterializeTheme,
            InstallStep::AugmentEnv,
        ]);
        if !options.providers.is_empty() {
            steps.push(InstallStep::InjectProviders);
        }
        if !options.cleanup_dirs.is_empty() {
            steps.push(InstallStep::CleanupScaffold);
        }
        steps
    }
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStep::MaterializePrimary => "project checkout",
            InstallStep::MaterializeSecondary => "deployment template checkout",
            InstallStep::InstallDependencies => "composer require",
            InstallStep::MaterializeTheme => "theme checkout",
            InstallStep::AugmentEnv => ".env update",
            InstallStep::InjectProviders => "service provider registration",
            InstallStep::CleanupScaffold => "template cleanup",
        };
        f.write_str(name)
    }
}

/// Receives progress while the pipeline runs
pub trait InstallReporter {
    fn step_started(&mut self, _step: InstallStep, _description: &str) {}

    /// `detail` carries e.g. the checked-out ref
    fn step_finished(&mut self, _step: InstallStep, _detail: Option<&str>) {}
}

/// Reporter that discards everything
#[derive(Debug, Default)]
pub struct SilentReporter;

impl InstallReporter for SilentReporter {}

/// What a successful install did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub primary_ref: Option<GitRef>,
    pub secondary_ref: Option<GitRef>,
    pub theme_ref: Option<GitRef>,
    pub removed: Vec<PathBuf>,
    pub completed: Vec<InstallStep>,
}

pub struct InstallPipeline<'a> {
    options: &'a InstallOptions,
    paths: &'a ProjectPaths,
    runner: &'a dyn CommandRunner,
}

impl<'a> InstallPipeline<'a> {
    pub fn new(
        options: &'a InstallOptions,
        paths: &'a ProjectPaths,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            options,
            paths,
            runner,
        }
    }

    pub fn steps(&self) -> Vec<InstallStep> {
        InstallStep::plan(self.options)
    }

    /// Operator-facing description of a step
    pub fn describe(&self, step: InstallStep) -> String {
        let options = self.options;
        match step {
            InstallStep::MaterializePrimary => format!("Checking out {}", options.primary.label),
            InstallStep::MaterializeSecondary => format!(
                "Adding {}",
                options
                    .secondary
                    .as_ref()
                    .map(|r| r.label.as_str())
                    .unwrap_or("deployment template")
            ),
            InstallStep::InstallDependencies => "Installing Composer Dependencies".to_string(),
            InstallStep::MaterializeTheme => format!("Adding {} theme", options.theme.label),
            InstallStep::AugmentEnv => format!("Updating {}", env::ENV_TEMPLATE),
            InstallStep::InjectProviders => "Registering ServiceProviders".to_string(),
            InstallStep::CleanupScaffold => "Removing template metadata".to_string(),
        }
    }

    /// Run every planned step in order.
    ///
    /// Fails with `TargetExists` before touching anything if the install root
    /// already exists. Any later failure is wrapped in `InstallError::Step`.
    pub async fn run(&self, reporter: &mut dyn InstallReporter) -> Result<InstallReport> {
        self.paths.ensure_available()?;

        let mut report = InstallReport::default();
        for step in self.steps() {
            reporter.step_started(step, &self.describe(step));
            tracing::debug!(%step, "starting step");

            let detail = self
                .execute(step, &mut report)
                .await
                .map_err(|source| {
                    tracing::error!(%step, error = %source, "step failed");
                    InstallError::Step {
                        step,
                        source: Box::new(source),
                    }
                })?;

            reporter.step_finished(step, detail.as_deref());
            report.completed.push(step);
        }

        tracing::info!(root = %self.paths.root.display(), "install complete");
        Ok(report)
    }

    async fn execute(
        &self,
        step: InstallStep,
        report: &mut InstallReport,
    ) -> Result<Option<String>> {
        let options = self.options;
        let paths = self.paths;

        match step {
            InstallStep::MaterializePrimary => {
                let git_ref = self.checkout(&options.primary, &paths.project).await?;
                let detail = git_ref.to_string();
                report.primary_ref = Some(git_ref);
                Ok(Some(detail))
            }
            InstallStep::MaterializeSecondary => {
                let (Some(repo), Some(target)) = (&options.secondary, &paths.secondary_template)
                else {
                    return Err(InstallError::MissingLocation {
                        what: "deployment template".to_string(),
                    });
                };
                let git_ref = self.checkout(repo, target).await?;
                let detail = git_ref.to_string();
                report.secondary_ref = Some(git_ref);
                Ok(Some(detail))
            }
            InstallStep::InstallDependencies => {
                composer::install_dependencies(self.runner, &paths.project, &options.dependencies)
                    .await?;
                Ok(None)
            }
            InstallStep::MaterializeTheme => {
                let git_ref = self.checkout(&options.theme, &paths.theme).await?;
                let detail = git_ref.to_string();
                report.theme_ref = Some(git_ref);
                Ok(Some(detail))
            }
            InstallStep::AugmentEnv => {
                env::augment_env(&paths.project, &options.env_lines, options.copy_working_env)
                    .await?;
                Ok(None)
            }
            InstallStep::InjectProviders => {
                let config_path = paths.theme.join(&options.provider_config);
                providers::inject_providers(
                    &config_path,
                    &options.provider_key,
                    &options.providers,
                )
                .await?;
                Ok(None)
            }
            InstallStep::CleanupScaffold => {
                report.removed = self.cleanup().await?;
                Ok(None)
            }
        }
    }

    async fn checkout(&self, repo: &Repository, target: &Path) -> Result<GitRef> {
        let git_ref = resolve_ref(
            self.runner,
            &repo.url,
            self.options.use_trunk,
            &self.options.trunk_branch,
        )
        .await?;
        materialize(self.runner, repo, &git_ref, target).await?;
        Ok(git_ref)
    }

    /// Remove template metadata directories from every checked-out tree
    async fn cleanup(&self) -> Result<Vec<PathBuf>> {
        let mut bases = vec![&self.paths.project, &self.paths.theme];
        bases.extend(self.paths.secondary_template.as_ref());

        let mut removed = Vec::new();
        for base in bases {
            for dir in &self.options.cleanup_dirs {
                let path = base.join(dir);
                match fs::remove_dir_all(&path).await {
                    Ok(()) => {
                        tracing::debug!(path = %path.display(), "removed");
                        removed.push(path);
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(InstallError::io(path, e)),
                }
            }
        }
        Ok(removed)
    }
}
