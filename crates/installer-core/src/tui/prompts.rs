//! Charm-style CLI prompts using cliclack

use crate::config::{InstallFlags, InstallOptions};
use crate::error::InstallError;
use crate::paths::ProjectPaths;
use crate::pipeline::{InstallPipeline, InstallReporter, InstallStep};
use crate::process::{CommandRunner, SystemRunner};
use crate::product::ProductConfig;
use crate::update::{self, UpdateCheck};
use anyhow::Result;

/// CLI arguments for the new command
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub flags: InstallFlags,

    /// Skip the pre-flight update check
    pub skip_update_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the installer with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: NewArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Build options and paths once
    let options = InstallOptions::from_product(config, &args.flags);
    let cwd = std::env::current_dir()?;
    let paths = ProjectPaths::resolve(&cwd, &options);

    // Step 2: Refuse to touch an existing directory
    if let Err(e) = paths.ensure_available() {
        cliclack::outro_cancel(e.to_string())?;
        return Err(e.into());
    }

    let runner = SystemRunner;

    // Step 3: Check for outdated tooling (skip if --skip-update-check)
    if args.skip_update_check {
        cliclack::log::info("Skipping update check")?;
    } else {
        confirm_updates(config, &runner, args.yes).await?;
    }

    // Step 4: Install
    let pipeline = InstallPipeline::new(&options, &paths, &runner);
    let mut reporter = CliclackReporter::default();

    if let Err(e) = pipeline.run(&mut reporter).await {
        report_failure(&e)?;
        return Err(e.into());
    }

    // Step 5: Show next steps
    print_next_steps(config, &paths, &options)?;

    Ok(())
}

async fn confirm_updates<C: ProductConfig>(
    config: &C,
    runner: &dyn CommandRunner,
    yes: bool,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking for updates...");

    let check = update::check_for_updates(runner, &config.tracked_packages()).await;
    match &check {
        UpdateCheck::UpToDate => {
            spinner.stop("Installer is up to date");
        }
        UpdateCheck::Skipped(warning) => {
            spinner.stop("Update check skipped");
            cliclack::log::warning(warning.to_string())?;
        }
        UpdateCheck::UpdatesAvailable(updates) => {
            spinner.stop("Updates available");
            let list: Vec<String> = updates.iter().map(|u| format!("  {}", u)).collect();
            cliclack::log::warning(format!(
                "Newer versions are available:\n{}",
                list.join("\n")
            ))?;
        }
    }

    // Auto-confirm with --yes flag
    let decision = update::should_proceed(&check, yes, || {
        cliclack::confirm("Continue without updating?")
            .initial_value(false)
            .interact()
    });

    if let Err(e) = decision {
        cliclack::outro_cancel("Install cancelled.")?;
        return Err(e.into());
    }

    Ok(())
}

/// Renders pipeline progress as cliclack log lines
#[derive(Default)]
struct CliclackReporter {
    current: String,
}

impl InstallReporter for CliclackReporter {
    fn step_started(&mut self, _step: InstallStep, description: &str) {
        self.current = description.to_string();
        let _ = cliclack::log::step(description);
    }

    fn step_finished(&mut self, _step: InstallStep, detail: Option<&str>) {
        let message = match detail {
            Some(detail) => format!("{} ({})", self.current, detail),
            None => self.current.clone(),
        };
        let _ = cliclack::log::success(message);
    }
}

fn report_failure(error: &InstallError) -> Result<()> {
    cliclack::log::error(format!("{}: {}", error.kind(), error))?;

    if let Some(output) = error.diagnostic_output() {
        eprintln!();
        for line in output.lines() {
            eprintln!("  {}", line);
        }
        eprintln!();
    }

    cliclack::outro_cancel("Install failed")?;
    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    paths: &ProjectPaths,
    options: &InstallOptions,
) -> Result<()> {
    let steps = config.next_steps(paths, options);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!("Docs: {}", config.docs_url()))?;

    Ok(())
}
