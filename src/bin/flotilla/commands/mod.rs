//! Command entry points. Each wrapper resolves the workspace context and
//! hands off to the corresponding `ops` function.

pub mod build;
pub mod clean;
pub mod config;
pub mod default;
pub mod env;
pub mod init;
pub mod list;
pub mod remove;
pub mod rename;
pub mod test;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use flotilla::core::manifest::Manifest;
use flotilla::core::workspace::{self, Workspace};

/// Find the root directory for the current invocation.
pub(crate) fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    match workspace::find_root(&cwd) {
        Some(root) => Ok(root),
        None => bail!(
            "no {} directory found here or in any parent; run `flotilla init` first",
            workspace::ROOT_DIR_NAME
        ),
    }
}

/// Open the default workspace under the discovered root.
pub(crate) fn open_workspace() -> Result<Workspace> {
    let root = find_root()?;
    Workspace::open(&root, None)
}

/// Load the manifest through the root's manifest link.
pub(crate) fn load_manifest(ws: &Workspace) -> Result<Manifest> {
    let link = workspace::manifest_link(ws.root());
    Ok(Manifest::load(ws.root(), &link)?)
}
