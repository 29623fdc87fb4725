//! Installer Core - Shared library for scaffolding Bedrock-based projects
//!
//! This library checks out template repositories, installs composer
//! dependencies and patches the generated files. Binaries describe their
//! product through [`ProductConfig`] and hand over to [`run`] or drive
//! [`InstallPipeline`] directly.
//!
//! # Architecture
//!
//! - **Layer 1: Core Operations** - Ref resolution, checkout, composer, `.env` and
//!   provider patching, each usable on its own
//! - **Layer 2: Workflow Orchestration** - `InstallOptions`, `ProjectPaths` and the
//!   ordered `InstallPipeline`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use installer_core::{InstallFlags, InstallOptions, InstallPipeline, ProjectPaths};
//! use installer_core::process::SystemRunner;
//! use installer_core::pipeline::SilentReporter;
//!
//! let options = InstallOptions::from_product(&MyConfig, &InstallFlags::default());
//! let paths = ProjectPaths::resolve(&std::env::current_dir()?, &options);
//! let report = InstallPipeline::new(&options, &paths, &SystemRunner)
//!     .run(&mut SilentReporter)
//!     .await?;
//! ```

pub mod composer;
pub mod config;
pub mod env;
pub mod error;
pub mod logging;
pub mod paths;
pub mod pipeline;
pub mod process;
pub mod product;
pub mod providers;
pub mod repo;
pub mod update;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ComposerDependency, InstallFlags, InstallOptions, ServiceProviderRef};
pub use error::{ErrorKind, InstallError};
pub use paths::ProjectPaths;
pub use pipeline::{InstallPipeline, InstallReport, InstallReporter, InstallStep};
pub use product::{ProductConfig, RepoSource};
pub use repo::GitRef;
pub use update::{should_proceed, PackageUpdateInfo, UpdateCheck, UpdateCheckWarning};

#[cfg(feature = "tui")]
pub use tui::run;
