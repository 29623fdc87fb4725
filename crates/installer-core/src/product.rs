//! Product configuration trait for installer binaries
//!
//! This trait defines what a product (e.g. Lumberjack on Bedrock) installs:
//! which repositories to check out, which packages to require and how the
//! generated files get patched.

use crate::config::{ComposerDependency, InstallFlags, InstallOptions, ServiceProviderRef};
use crate::paths::ProjectPaths;

/// A remote template repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoSource {
    /// Human-readable name shown in progress output
    pub label: &'static str,
    /// Clone URL used when no override is set
    pub default_url: &'static str,
    /// Environment variable that overrides the clone URL
    pub url_env: &'static str,
}

/// Configuration trait for different installer products
///
/// Each product implements this trait to define:
/// - Product identity (display name, default folder)
/// - Template repositories
/// - Composer dependencies and service providers
/// - Files to patch and metadata to clean up
/// - Post-install instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Folder created when no project name is given
    fn default_folder_name(&self) -> &'static str;

    /// The project skeleton checked out first
    fn primary_template(&self) -> RepoSource;

    /// The theme checked out inside the project
    fn theme_template(&self) -> RepoSource;

    /// Deployment template checked out next to the project when requested
    fn secondary_template(&self) -> RepoSource;

    /// Branch used when no release tag exists or trunk is requested
    fn trunk_branch(&self) -> &'static str {
        "master"
    }

    /// Theme location relative to the project directory
    fn theme_subpath(&self) -> &'static str;

    /// Project subdirectory when the secondary template is installed
    fn site_dir(&self) -> &'static str {
        "site"
    }

    /// Secondary template subdirectory, a sibling of `site_dir`
    fn secondary_dir(&self) -> &'static str;

    /// Packages required in a single composer call
    fn composer_dependencies(&self, flags: &InstallFlags) -> Vec<ComposerDependency>;

    /// Lines appended to the project's `.env.example`
    fn dot_env_lines(&self) -> Vec<String>;

    /// Whether a working `.env` is copied from the augmented template
    fn copy_working_env(&self, flags: &InstallFlags) -> bool;

    /// Providers registered in the theme config
    fn service_providers(&self, flags: &InstallFlags) -> Vec<ServiceProviderRef>;

    /// Config file holding the provider list, relative to the theme directory
    fn provider_config_path(&self) -> &'static str;

    /// Array key whose block receives new providers
    fn provider_block_key(&self) -> &'static str {
        "providers"
    }

    /// Template metadata directories removed after install
    fn cleanup_dirs(&self) -> Vec<&'static str> {
        vec![".github"]
    }

    /// Globally installed composer packages checked for updates before installing
    fn tracked_packages(&self) -> Vec<&'static str>;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, paths: &ProjectPaths, options: &InstallOptions) -> Vec<String>;
}
