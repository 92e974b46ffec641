//! The default command: show or repoint the active-workspace symlink.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::workspace::{default_link, Workspace};
use crate::util::fs::{remove_file_if_exists, symlink};

/// The name of the current default workspace.
pub fn show(root: &Path) -> Result<String> {
    let link = default_link(root);
    let target = std::fs::read_link(&link)
        .with_context(|| format!("cannot resolve default workspace link {}", link.display()))?;
    Ok(target.to_string_lossy().into_owned())
}

/// Make `name` the default workspace.
pub fn set(root: &Path, name: &str) -> Result<()> {
    let ws = Workspace::at(root, name);
    if !ws.dir().exists() {
        bail!("cannot make non-existent workspace {name} the default");
    }

    let link = default_link(root);
    remove_file_if_exists(&link)?;
    symlink(Path::new(name), &link).context("failed to update default workspace link")?;
    Ok(())
}
