//! The remove command: delete a workspace, repointing the default link
//! when the default itself is removed.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::workspace::{default_link, Workspace};
use crate::util::fs::{remove_dir_all_if_exists, remove_file_if_exists, symlink};

/// Remove a workspace. Removing the default workspace requires naming a
/// new default with `new_default`; naming one otherwise is an error.
pub fn remove(root: &Path, workspace: &str, new_default: Option<&str>) -> Result<()> {
    let ws = Workspace::at(root, workspace);
    if !ws.dir().exists() {
        bail!("workspace {workspace} does not exist");
    }

    if let Some(new_default) = new_default {
        if !Workspace::at(root, new_default).dir().exists() {
            bail!("workspace {new_default} does not exist");
        }
    }

    let link = default_link(root);
    let is_default = std::fs::read_link(&link)
        .map(|target| target == Path::new(workspace))
        .unwrap_or(false);

    if is_default {
        if new_default.is_none() {
            bail!(
                "trying to remove the default workspace; \
                 specify a new default via -d/--default"
            );
        }
    } else if new_default.is_some() {
        bail!("-d/--default is only applicable when removing the default workspace");
    }

    remove_dir_all_if_exists(ws.dir())?;
    if let Some(new_default) = new_default {
        remove_file_if_exists(&link)?;
        symlink(Path::new(new_default), &link)
            .context("failed to update default workspace link")?;
    }
    Ok(())
}
