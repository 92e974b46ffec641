//! The rename command: rename a workspace directory, keeping the default
//! link consistent.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::manifest::Manifest;
use crate::core::workspace::{default_link, validate_name, Workspace, DEFAULT_LINK_NAME};
use crate::util::fs::{remove_file_if_exists, symlink};

/// Rename workspace `old` to `new`.
pub fn rename(root: &Path, manifest: &Manifest, old: &str, new: &str) -> Result<()> {
    if old == DEFAULT_LINK_NAME {
        bail!(
            "cannot rename the default workspace; use `flotilla default` \
             if you want to change it"
        );
    }
    validate_name(new)?;

    let old_ws = Workspace::at(root, old);
    if !old_ws.dir().exists() {
        bail!("workspace {old} does not exist");
    }

    // Builds bake absolute paths into their artifacts, so a renamed
    // workspace with build output would be silently broken.
    for project in manifest.names() {
        if old_ws.build_dir(project).exists() {
            bail!(
                "cannot rename a workspace that contains build artifacts, as \
                 some builds contain absolute paths and are thus not \
                 relocatable; force-clean this workspace first and then \
                 rename it"
            );
        }
    }

    let new_ws = Workspace::at(root, new);
    if new_ws.dir().exists() {
        bail!("workspace {new} already exists; delete it first if you want this rename");
    }

    std::fs::rename(old_ws.dir(), new_ws.dir()).with_context(|| {
        format!(
            "failed to rename {} to {}",
            old_ws.dir().display(),
            new_ws.dir().display()
        )
    })?;

    let link = default_link(root);
    let was_default = std::fs::read_link(&link)
        .map(|target| target == Path::new(old))
        .unwrap_or(false);
    if was_default {
        remove_file_if_exists(&link)?;
        symlink(Path::new(new), &link).context("failed to update default workspace link")?;
    }
    Ok(())
}
