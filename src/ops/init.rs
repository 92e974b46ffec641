//! The init command: create the root directory, a named workspace, its
//! initial config, and the default/manifest symlinks.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::config::{write_config, BuildType, WorkspaceConfig};
use crate::core::manifest::Manifest;
use crate::core::workspace::{
    self, default_link, manifest_link, validate_name, Workspace, MANIFEST_NAME,
};
use crate::util::fs::{ensure_dir, is_inside, normalize_path, symlink};

/// Where the manifest path is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSource {
    /// Relative to the current directory.
    Fs,
    /// Relative to the repo-tool manifest directory (`.repo/manifests`)
    /// next to the root.
    Repo,
}

/// Options for the init command.
#[derive(Debug)]
pub struct InitOptions {
    /// Workspace name; defaults to "ws".
    pub workspace: Option<String>,

    /// Build type for the new workspace.
    pub build_type: BuildType,

    /// Manifest path, interpreted per `source`.
    pub manifest: PathBuf,

    pub source: ManifestSource,
}

impl Default for InitOptions {
    fn default() -> Self {
        InitOptions {
            workspace: None,
            build_type: BuildType::Debug,
            manifest: PathBuf::from(MANIFEST_NAME),
            source: ManifestSource::Fs,
        }
    }
}

/// Initialize a workspace under `root` (which need not exist yet).
pub fn init(root: &Path, cwd: &Path, opts: &InitOptions) -> Result<()> {
    let name = match &opts.workspace {
        Some(name) => {
            validate_name(name)?;
            name.clone()
        }
        None => "ws".to_string(),
    };

    let ws = Workspace::at(root, &name);
    if ws.dir().exists() {
        bail!("cannot initialize already existing workspace {name}");
    }

    let base = match opts.source {
        ManifestSource::Repo => workspace::source_parent(root).join(".repo").join("manifests"),
        ManifestSource::Fs => cwd.to_path_buf(),
    };
    let mut manifest_path = base.join(&opts.manifest);
    if manifest_path.is_dir() {
        // A directory stands for the default-named manifest inside it.
        manifest_path = manifest_path.join(MANIFEST_NAME);
    }
    let abs_manifest = normalize_path(&manifest_path);

    // Store a relative link target for manifests inside the tree and an
    // absolute one otherwise; relative targets keep a group of repos
    // relocatable as a whole.
    let parent = workspace::source_parent(root);
    let stored_manifest = if is_inside(&abs_manifest, &parent) {
        pathdiff::diff_paths(&abs_manifest, root).unwrap_or_else(|| abs_manifest.clone())
    } else {
        abs_manifest.clone()
    };

    // Make sure the manifest is sane before creating anything.
    let manifest = Manifest::load(root, &abs_manifest)?;

    let new_root = match std::fs::create_dir(root) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => false,
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to create root directory {}", root.display()))
        }
    };

    std::fs::create_dir(ws.dir())
        .with_context(|| format!("failed to create workspace directory {}", ws.dir().display()))?;
    ensure_dir(&ws.build_root())?;
    ensure_dir(&ws.checksum_dir())?;

    let config = WorkspaceConfig::initial(opts.build_type, manifest.names());
    write_config(&ws.config_path(), &config)?;

    if new_root {
        symlink(Path::new(&name), &default_link(root))
            .context("failed to create default workspace link")?;
        symlink(&stored_manifest, &manifest_link(root))
            .context("failed to create manifest link")?;
    }

    tracing::info!("initialized workspace {name} at {}", ws.dir().display());
    Ok(())
}
