//! Filesystem layout of a new project

use crate::config::InstallOptions;
use crate::error::{InstallError, Result};
use std::path::{Path, PathBuf};

/// Directories an install writes to, all derived from the working directory
/// and the install options.
///
/// `project` and `theme` always live under `root`. `secondary_template` is a
/// sibling of `project` and only exists when that template was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub project: PathBuf,
    pub theme: PathBuf,
    pub secondary_template: Option<PathBuf>,
}

impl ProjectPaths {
    /// Pure path arithmetic, no filesystem access
    pub fn resolve(cwd: &Path, options: &InstallOptions) -> Self {
        let root = cwd.join(&options.project_name);

        let (project, secondary_template) = if options.secondary.is_some() {
            (
                root.join(&options.site_dir),
                Some(root.join(&options.secondary_dir)),
            )
        } else {
            (root.clone(), None)
        };

        let theme = project.join(&options.theme_subpath);

        Self {
            root,
            project,
            theme,
            secondary_template,
        }
    }

    /// Fail if anything already exists at the install root
    pub fn ensure_available(&self) -> Result<()> {
        if self.root.exists() {
            return Err(InstallError::TargetExists {
                path: self.root.clone(),
            });
        }
        Ok(())
    }
}
