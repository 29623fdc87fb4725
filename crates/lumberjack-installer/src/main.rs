//! Lumberjack CLI - Create Lumberjack projects built on Bedrock

use anyhow::Result;
use clap::{Parser, Subcommand};
use installer_core::tui::NewArgs;
use installer_core::{
    ComposerDependency, InstallFlags, InstallOptions, ProductConfig, ProjectPaths, RepoSource,
    ServiceProviderRef,
};

/// Lumberjack product configuration
#[derive(Clone)]
pub struct LumberjackConfig;

impl ProductConfig for LumberjackConfig {
    fn display_name(&self) -> &'static str {
        "Lumberjack"
    }

    fn default_folder_name(&self) -> &'static str {
        "lumberjack-bedrock-site"
    }

    fn primary_template(&self) -> RepoSource {
        RepoSource {
            label: "Bedrock",
            default_url: "https://github.com/roots/bedrock.git",
            url_env: "LUMBERJACK_BEDROCK_REPO",
        }
    }

    fn theme_template(&self) -> RepoSource {
        RepoSource {
            label: "Lumberjack",
            default_url: "https://github.com/rareloop/lumberjack.git",
            url_env: "LUMBERJACK_THEME_REPO",
        }
    }

    fn secondary_template(&self) -> RepoSource {
        RepoSource {
            label: "Trellis",
            default_url: "https://github.com/roots/trellis.git",
            url_env: "LUMBERJACK_TRELLIS_REPO",
        }
    }

    fn theme_subpath(&self) -> &'static str {
        "web/app/themes/lumberjack"
    }

    fn secondary_dir(&self) -> &'static str {
        "trellis"
    }

    fn composer_dependencies(&self, flags: &InstallFlags) -> Vec<ComposerDependency> {
        let mut core = ComposerDependency::new("rareloop/lumberjack-core");
        if flags.dev {
            core = core.with_constraint("dev-master");
        }

        let mut deps = vec![core];
        if flags.with_cli_tool {
            deps.push(ComposerDependency::new("rareloop/hatch"));
        }
        deps
    }

    fn dot_env_lines(&self) -> Vec<String> {
        vec!["\n".to_string(), "APP_KEY=".to_string()]
    }

    fn copy_working_env(&self, flags: &InstallFlags) -> bool {
        // Trellis provisions its own environment
        !flags.with_secondary_template
    }

    fn service_providers(&self, flags: &InstallFlags) -> Vec<ServiceProviderRef> {
        if flags.with_cli_tool {
            vec!["Rareloop\\Hatch\\HatchServiceProvider::class".into()]
        } else {
            Vec::new()
        }
    }

    fn provider_config_path(&self) -> &'static str {
        "config/app.php"
    }

    fn tracked_packages(&self) -> Vec<&'static str> {
        vec!["rareloop/lumberjack-installer"]
    }

    fn docs_url(&self) -> &'static str {
        "https://docs.lumberjack.rareloop.com"
    }

    fn next_steps(&self, paths: &ProjectPaths, options: &InstallOptions) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_ref() != Some(&paths.project) {
            steps.push(format!("cd {}", paths.project.display()));
        }

        if options.copy_working_env {
            steps.push("Fill in the database credentials and WP_HOME in .env".to_string());
        } else {
            steps.push("Configure your environments in the trellis/group_vars directory".to_string());
        }

        steps.push("Generate an APP_KEY (e.g. openssl rand -base64 32)".to_string());

        if let Some(trellis) = &paths.secondary_template {
            steps.push(format!("cd {} && trellis up", trellis.display()));
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "lumberjack")]
#[command(about = "Create a new Lumberjack project built on Bedrock")]
#[command(version)]
pub struct Args {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Lumberjack project built on Bedrock
    New(CliNewArgs),
}

#[derive(Parser, Debug)]
pub struct CliNewArgs {
    #[command(flatten)]
    pub flags: InstallFlags,

    /// Skip checking for newer versions of the installer
    #[arg(long = "skip-update-check")]
    pub skip_update_check: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliNewArgs> for NewArgs {
    fn from(args: CliNewArgs) -> Self {
        NewArgs {
            flags: args.flags,
            skip_update_check: args.skip_update_check,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    installer_core::logging::init_cli_logger(args.verbose);
    let config = LumberjackConfig;

    // No subcommand provided, default to `new` with defaults
    let new_args = match args.command {
        Some(Command::New(new_args)) => new_args.into(),
        None => NewArgs::default(),
    };

    let result = installer_core::run(&config, new_args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
