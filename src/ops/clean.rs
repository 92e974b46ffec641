//! The clean command: polite (ask the build system) or forced (remove the
//! build directory).

use anyhow::Result;

use crate::builder::environment::compose;
use crate::checksum;
use crate::core::config::ConfigHandle;
use crate::core::manifest::Manifest;
use crate::core::workspace::Workspace;
use crate::ops::resolve_requested;
use crate::util::fs::remove_dir_all_if_exists;

/// Clean the requested projects (all when empty). A force-clean covering
/// every project also clears the workspace taint flag, since no stale
/// build state survives it.
pub fn clean(
    ws: &Workspace,
    manifest: &Manifest,
    config: &mut ConfigHandle,
    projects: &[String],
    force: bool,
) -> Result<()> {
    let requested = resolve_requested(manifest, projects)?;

    for name in &requested {
        clean_one(ws, manifest, name, force)?;
    }

    if force && requested.len() == manifest.len() {
        config.get_mut().taint = false;
    }
    Ok(())
}

/// Clean one project. Always invalidates the stored checksum first, so a
/// half-cleaned project can never be skipped as current.
pub fn clean_one(ws: &Workspace, manifest: &Manifest, name: &str, force: bool) -> Result<()> {
    checksum::invalidate(ws, name)?;

    let build_dir = ws.build_dir(name);
    if force {
        tracing::info!("removing {}", build_dir.display());
        remove_dir_all_if_exists(&build_dir)?;
        return Ok(());
    }

    if !build_dir.exists() {
        return Ok(());
    }
    let project = manifest.get(name)?;
    let env = compose(ws, manifest, name, false)?;
    project.build.adapter().clean(
        name,
        &ws.install_dir(name),
        &project.path,
        &build_dir,
        &env,
    )
}
