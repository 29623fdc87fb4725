//! Install options built once from the product config and command flags

use crate::product::{ProductConfig, RepoSource};
use std::fmt;
use std::path::PathBuf;

/// Feature flags accepted by the `new` command
#[derive(Debug, Clone, Default, PartialEq, Eq, clap::Args)]
pub struct InstallFlags {
    /// The name of the folder to create
    pub name: Option<String>,

    /// Use the latest development commits instead of the most recent stable releases
    #[arg(short, long)]
    pub dev: bool,

    /// Also install the Trellis deployment template next to the site
    #[arg(long = "with-trellis")]
    pub with_secondary_template: bool,

    /// Also install the Hatch CLI tool
    #[arg(long = "with-hatch")]
    pub with_cli_tool: bool,
}

/// A composer package with an optional version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerDependency {
    pub name: String,
    pub constraint: Option<String>,
}

impl ComposerDependency {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

impl fmt::Display for ComposerDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(f, "{}:{}", self.name, constraint),
            None => f.write_str(&self.name),
        }
    }
}

/// Class reference token such as `App\Providers\AppServiceProvider::class`.
/// Inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProviderRef(pub String);

impl ServiceProviderRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceProviderRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ServiceProviderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A repository with its override already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub label: String,
    pub url: String,
}

impl Repository {
    fn resolve(source: RepoSource, env: &impl Fn(&str) -> Option<String>) -> Self {
        let url = env(source.url_env)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| source.default_url.to_string());
        Self {
            label: source.label.to_string(),
            url,
        }
    }
}

/// Everything the pipeline needs, fixed for the duration of one install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub project_name: String,
    /// Check out trunk instead of the latest release tag
    pub use_trunk: bool,
    pub trunk_branch: String,
    pub primary: Repository,
    pub theme: Repository,
    /// Present only when the secondary template was requested
    pub secondary: Option<Repository>,
    pub theme_subpath: PathBuf,
    pub site_dir: String,
    pub secondary_dir: String,
    pub dependencies: Vec<ComposerDependency>,
    pub env_lines: Vec<String>,
    pub copy_working_env: bool,
    pub providers: Vec<ServiceProviderRef>,
    /// Relative to the theme directory
    pub provider_config: PathBuf,
    pub provider_key: String,
    pub cleanup_dirs: Vec<String>,
}

impl InstallOptions {
    /// Build options, reading repository overrides from the process environment
    pub fn from_product<C: ProductConfig>(config: &C, flags: &InstallFlags) -> Self {
        Self::from_product_with_env(config, flags, |key| std::env::var(key).ok())
    }

    pub fn from_product_with_env<C, F>(config: &C, flags: &InstallFlags, env: F) -> Self
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        let project_name = flags
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(config.default_folder_name())
            .to_string();

        Self {
            project_name,
            use_trunk: flags.dev,
            trunk_branch: config.trunk_branch().to_string(),
            primary: Repository::resolve(config.primary_template(), &env),
            theme: Repository::resolve(config.theme_template(), &env),
            secondary: flags
                .with_secondary_template
                .then(|| Repository::resolve(config.secondary_template(), &env)),
            theme_subpath: PathBuf::from(config.theme_subpath()),
            site_dir: config.site_dir().to_string(),
            secondary_dir: config.secondary_dir().to_string(),
            dependencies: config.composer_dependencies(flags),
            env_lines: config.dot_env_lines(),
            copy_working_env: config.copy_working_env(flags),
            providers: config.service_providers(flags),
            provider_config: PathBuf::from(config.provider_config_path()),
            provider_key: config.provider_block_key().to_string(),
            cleanup_dirs: config
                .cleanup_dirs()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::paths::ProjectPaths;
    use crate::product::ProductConfig;

    /// Minimal product used by tests across the crate
    #[derive(Clone)]
    pub(crate) struct TestProduct;

    impl ProductConfig for TestProduct {
        fn display_name(&self) -> &'static str {
            "Test"
        }

        fn default_folder_name(&self) -> &'static str {
            "test-site"
        }

        fn primary_template(&self) -> RepoSource {
            RepoSource {
                label: "Skeleton",
                default_url: "https://example.com/skeleton.git",
                url_env: "TEST_SKELETON_REPO",
            }
        }

        fn theme_template(&self) -> RepoSource {
            RepoSource {
                label: "Theme",
                default_url: "https://example.com/theme.git",
                url_env: "TEST_THEME_REPO",
            }
        }

        fn secondary_template(&self) -> RepoSource {
            RepoSource {
                label: "Deploy",
                default_url: "https://example.com/deploy.git",
                url_env: "TEST_DEPLOY_REPO",
            }
        }

        fn theme_subpath(&self) -> &'static str {
            "web/app/themes/theme"
        }

        fn secondary_dir(&self) -> &'static str {
            "deploy"
        }

        fn composer_dependencies(&self, flags: &InstallFlags) -> Vec<ComposerDependency> {
            let mut deps = vec![ComposerDependency::new("vendor/core")];
            if flags.with_cli_tool {
                deps.push(ComposerDependency::new("vendor/cli"));
            }
            deps
        }

        fn dot_env_lines(&self) -> Vec<String> {
            vec!["\n".to_string(), "APP_KEY=".to_string()]
        }

        fn copy_working_env(&self, flags: &InstallFlags) -> bool {
            !flags.with_secondary_template
        }

        fn service_providers(&self, flags: &InstallFlags) -> Vec<ServiceProviderRef> {
            if flags.with_cli_tool {
                vec!["Vendor\\Cli\\CliServiceProvider::class".into()]
            } else {
                Vec::new()
            }
        }

        fn provider_config_path(&self) -> &'static str {
            "config/app.php"
        }

        fn tracked_packages(&self) -> Vec<&'static str> {
            vec!["vendor/installer"]
        }

        fn docs_url(&self) -> &'static str {
            "https://example.com/docs"
        }

        fn next_steps(&self, paths: &ProjectPaths, _options: &InstallOptions) -> Vec<String> {
            vec![format!("cd {}", paths.root.display())]
        }
    }

    pub(crate) fn options(flags: &InstallFlags) -> InstallOptions {
        InstallOptions::from_product_with_env(&TestProduct, flags, |_| None)
    }
}
