//! Service provider registration in the theme config
//!
//! The config file is never parsed as PHP. The `'providers' => [ ... ]` block
//! is located by pattern, the last `::class` entry inside it becomes the
//! anchor, and new entries are written directly after that anchor. Text
//! outside the block is never touched.

use crate::config::ServiceProviderRef;
use crate::error::{InstallError, Result};
use regex::Regex;
use std::path::Path;
use tokio::fs;

const CLASS_REF_PATTERN: &str = r"\\?[A-Za-z_][A-Za-z0-9_\\]*::class";

/// Add `providers` after the last existing entry of the `key` block in the
/// file at `config_path`. Does nothing when `providers` is empty.
pub async fn inject_providers(
    config_path: &Path,
    key: &str,
    providers: &[ServiceProviderRef],
) -> Result<()> {
    if providers.is_empty() {
        return Ok(());
    }

    let content = fs::read_to_string(config_path)
        .await
        .map_err(|e| InstallError::io(config_path, e))?;

    let updated = insert_after_last_entry(&content, key, providers)?.ok_or_else(|| {
        InstallError::ConfigBlockNotFound {
            path: config_path.to_path_buf(),
            key: key.to_string(),
        }
    })?;

    fs::write(config_path, updated)
        .await
        .map_err(|e| InstallError::io(config_path, e))?;

    tracing::info!(
        path = %config_path.display(),
        count = providers.len(),
        "registered service providers"
    );
    Ok(())
}

/// Pure text transformation behind [`inject_providers`].
///
/// Returns `Ok(None)` when the block is missing or holds no entry to anchor on.
pub fn insert_after_last_entry(
    content: &str,
    key: &str,
    entries: &[ServiceProviderRef],
) -> Result<Option<String>> {
    let block = Regex::new(&format!(
        r#"(?s)['"]{}['"]\s*=>\s*\[.*?\]"#,
        regex::escape(key)
    ))?;
    let class_ref = Regex::new(CLASS_REF_PATTERN)?;

    let Some(span) = block.find(content) else {
        return Ok(None);
    };
    let Some(anchor) = class_ref.find_iter(span.as_str()).last() else {
        return Ok(None);
    };

    let anchor_end = span.start() + anchor.end();
    let anchor_start = span.start() + anchor.start();
    let indent = line_indent(content, anchor_start);

    let joined = entries
        .iter()
        .map(ServiceProviderRef::as_str)
        .collect::<Vec<_>>()
        .join(&format!(",\n{}", indent));

    let mut updated = String::with_capacity(content.len() + joined.len() + indent.len() + 2);
    updated.push_str(&content[..anchor_end]);
    updated.push_str(",\n");
    updated.push_str(indent);
    updated.push_str(&joined);
    updated.push_str(&content[anchor_end..]);

    Ok(Some(updated))
}

/// Leading whitespace of the line containing byte offset `pos`
fn line_indent(content: &str, pos: usize) -> &str {
    let line_start = content[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &content[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}
