//! The list command: project names, or workspace names with `-w`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::manifest::Manifest;
use crate::core::workspace::{DEFAULT_LINK_NAME, MANIFEST_LINK_NAME};

/// Project names in declaration order.
pub fn projects(manifest: &Manifest) -> Vec<String> {
    manifest.names().map(String::from).collect()
}

/// Workspace names under a root, sorted. The `default` and `manifest`
/// symlinks live next to the workspace directories and are not
/// workspaces.
pub fn workspaces(root: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .with_context(|| format!("failed to read root directory {}", root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name != DEFAULT_LINK_NAME && name != MANIFEST_LINK_NAME)
        .collect();
    names.sort();
    Ok(names)
}
