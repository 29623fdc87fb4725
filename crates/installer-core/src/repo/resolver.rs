//! Resolve a repository to the ref that gets checked out

use super::version::latest_tag;
use crate::error::Result;
use crate::process::{spawn_error, CommandLine, CommandRunner};
use std::fmt;

/// A resolved checkout point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    Tag(String),
    Branch(String),
}

impl GitRef {
    pub fn name(&self) -> &str {
        match self {
            GitRef::Tag(name) | GitRef::Branch(name) => name,
        }
    }
}

impl fmt::Display for GitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitRef::Tag(tag) => f.write_str(tag),
            GitRef::Branch(branch) => write!(f, "dev-{}", branch),
        }
    }
}

/// Find the latest semantic-version tag of `url`, or fall back to `trunk`.
///
/// When `use_trunk` is set no network access happens. A repository without
/// any valid tag resolves to trunk rather than failing; a failing `ls-remote`
/// is still an error.
pub async fn resolve_ref(
    runner: &dyn CommandRunner,
    url: &str,
    use_trunk: bool,
    trunk: &str,
) -> Result<GitRef> {
    if use_trunk {
        tracing::debug!(url, trunk, "trunk requested, skipping tag lookup");
        return Ok(GitRef::Branch(trunk.to_string()));
    }

    let command = CommandLine::new("git").args(["ls-remote", "--tags", "--refs", url]);
    let output = runner
        .output(&command)
        .await
        .map_err(|e| spawn_error(&command, e))?
        .check(&command)?;

    let tags = tag_names(&output.stdout);
    match latest_tag(&tags) {
        Some(tag) => {
            tracing::debug!(url, %tag, candidates = tags.len(), "resolved latest tag");
            Ok(GitRef::Tag(tag))
        }
        None => {
            tracing::info!(url, trunk, "no release tags found, using trunk");
            Ok(GitRef::Branch(trunk.to_string()))
        }
    }
}

/// Extract tag names from `git ls-remote --tags` output
pub fn tag_names(ls_remote: &str) -> Vec<String> {
    ls_remote
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|reference| reference.strip_prefix("refs/tags/"))
        .map(|tag| tag.strip_suffix("^{}").unwrap_or(tag))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
