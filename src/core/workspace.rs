//! Workspace layout and path bookkeeping.
//!
//! The root directory (`.flotilla`) lives next to the project source trees
//! and holds one directory per named workspace plus two symlinks: `default`
//! (the active workspace) and `manifest` (the manifest file). Multiple
//! workspaces allow parallel build configurations from one manifest.
//!
//! Per workspace:
//!
//! ```text
//! <ws>/config.yaml            workspace configuration
//! <ws>/checksum/<project>     stored source checksums
//! <ws>/build/<project>/src    symlink back to the project source
//! <ws>/build/<project>/build  build-tool working directory
//! <ws>/build/<project>/build/install   install prefix
//! ```

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};

use crate::util::process::ProcessBuilder;

/// Name of the root directory searched for up the tree.
pub const ROOT_DIR_NAME: &str = ".flotilla";

/// Default manifest file name.
pub const MANIFEST_NAME: &str = "flotilla.yaml";

/// Name of the symlink pointing at the active workspace.
pub const DEFAULT_LINK_NAME: &str = "default";

/// Name of the symlink pointing at the manifest.
pub const MANIFEST_LINK_NAME: &str = "manifest";

/// A named workspace inside a root directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    name: String,
    dir: PathBuf,
}

impl Workspace {
    /// Refer to the workspace `name` under `root`. Does not touch the
    /// filesystem; use [`Workspace::open`] to require an existing one.
    pub fn at(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let root = root.into();
        let name = name.into();
        let dir = root.join(&name);
        Workspace { root, name, dir }
    }

    /// Open an existing workspace. With no name, follows the `default`
    /// symlink.
    pub fn open(root: &Path, name: Option<&str>) -> Result<Workspace> {
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let link = default_link(root);
                let target = std::fs::read_link(&link).with_context(|| {
                    format!("cannot resolve default workspace link {}", link.display())
                })?;
                target.to_string_lossy().into_owned()
            }
        };

        let ws = Workspace::at(root, name);
        if !ws.dir.is_dir() {
            bail!("workspace {} does not exist", ws.name);
        }
        Ok(ws)
    }

    /// The root directory this workspace lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The workspace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The workspace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The workspace configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.dir.join("config.yaml")
    }

    /// The directory containing per-project checksum files.
    pub fn checksum_dir(&self) -> PathBuf {
        self.dir.join("checksum")
    }

    /// The checksum file for a given project.
    pub fn checksum_file(&self, project: &str) -> PathBuf {
        self.checksum_dir().join(project)
    }

    /// The top-level directory containing build artifacts for all projects.
    pub fn build_root(&self) -> PathBuf {
        self.dir.join("build")
    }

    /// The per-project directory under the build root.
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.build_root().join(project)
    }

    /// The convenience symlink inside the project directory that points
    /// back at the source tree.
    pub fn source_link(&self, project: &str) -> PathBuf {
        self.project_dir(project).join("src")
    }

    /// The build directory for a given project.
    pub fn build_dir(&self, project: &str) -> PathBuf {
        self.project_dir(project).join("build")
    }

    /// The install prefix for a given project.
    pub fn install_dir(&self, project: &str) -> PathBuf {
        self.build_dir(project).join("install")
    }

    /// Installed library directories: the architecture-neutral one, and the
    /// triplet-qualified one when a host compiler is available.
    pub fn lib_paths(&self, project: &str) -> Vec<PathBuf> {
        arch_variants(self.install_dir(project).join("lib"))
    }

    /// Installed binary directories, neutral and triplet-qualified.
    pub fn bin_paths(&self, project: &str) -> Vec<PathBuf> {
        arch_variants(self.install_dir(project).join("bin"))
    }

    /// pkg-config metadata directories, one per library directory.
    pub fn pkgconfig_paths(&self, project: &str) -> Vec<PathBuf> {
        self.lib_paths(project)
            .into_iter()
            .map(|lib| lib.join("pkgconfig"))
            .collect()
    }
}

/// Check that a workspace name is neither reserved nor illegal. The
/// reserved names are the two symlinks living next to workspace
/// directories; dots and slashes would escape the root.
pub fn validate_name(name: &str) -> Result<()> {
    for reserved in [DEFAULT_LINK_NAME, MANIFEST_LINK_NAME] {
        if name == reserved {
            bail!("{name} is a reserved name; please choose a different one");
        }
    }
    if name.is_empty() || name.contains('.') || name.contains('/') {
        bail!(
            "workspace name \"{name}\" contains an illegal character (. or /); \
             please use a different name"
        );
    }
    Ok(())
}

/// Walk up from `start` looking for a root directory; returns the first
/// one found.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    let mut dir = crate::util::fs::normalize_path(start);
    loop {
        let candidate = dir.join(ROOT_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// The `default` symlink for a root directory.
pub fn default_link(root: &Path) -> PathBuf {
    root.join(DEFAULT_LINK_NAME)
}

/// The `manifest` symlink for a root directory.
pub fn manifest_link(root: &Path) -> PathBuf {
    root.join(MANIFEST_LINK_NAME)
}

/// The directory holding the project source trees (the parent of the root
/// directory).
pub fn source_parent(root: &Path) -> PathBuf {
    let root = crate::util::fs::normalize_path(root);
    root.parent().map(Path::to_path_buf).unwrap_or(root)
}

fn arch_variants(neutral: PathBuf) -> Vec<PathBuf> {
    let mut paths = vec![neutral.clone()];
    if let Some(triplet) = host_triplet() {
        paths.push(neutral.join(triplet));
    }
    paths
}

/// The GCC host triplet for this machine, computed once per process.
/// `None` when no host compiler is available; callers then compose only
/// the architecture-neutral paths.
pub fn host_triplet() -> Option<&'static str> {
    static TRIPLET: OnceLock<Option<String>> = OnceLock::new();
    TRIPLET
        .get_or_init(|| {
            match ProcessBuilder::new("gcc").arg("-dumpmachine").output_str() {
                Ok(out) => Some(out.trim().to_string()),
                Err(e) => {
                    tracing::debug!("no host triplet: {e:#}");
                    None
                }
            }
        })
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let ws = Workspace::at("/tree/.flotilla", "ws");

        assert_eq!(
            ws.checksum_file("libfoo"),
            PathBuf::from("/tree/.flotilla/ws/checksum/libfoo")
        );
        assert_eq!(
            ws.build_dir("libfoo"),
            PathBuf::from("/tree/.flotilla/ws/build/libfoo/build")
        );
        assert_eq!(
            ws.install_dir("libfoo"),
            PathBuf::from("/tree/.flotilla/ws/build/libfoo/build/install")
        );
        assert_eq!(
            ws.source_link("libfoo"),
            PathBuf::from("/tree/.flotilla/ws/build/libfoo/src")
        );
    }

    #[test]
    fn test_lib_paths_include_neutral_dir() {
        let ws = Workspace::at("/tree/.flotilla", "ws");
        let libs = ws.lib_paths("libfoo");
        assert_eq!(
            libs[0],
            PathBuf::from("/tree/.flotilla/ws/build/libfoo/build/install/lib")
        );
        let pc = ws.pkgconfig_paths("libfoo");
        assert_eq!(pc[0], libs[0].join("pkgconfig"));
    }

    #[test]
    fn test_find_root_walks_up() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(ROOT_DIR_NAME);
        let nested = tmp.path().join("proj").join("deep");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_root(&nested).unwrap();
        assert_eq!(found, crate::util::fs::normalize_path(&root));

        let outside = TempDir::new().unwrap();
        assert!(find_root(outside.path()).is_none());
    }

    #[test]
    fn test_open_requires_existing_workspace() {
        let tmp = TempDir::new().unwrap();
        assert!(Workspace::open(tmp.path(), Some("missing")).is_err());

        std::fs::create_dir_all(tmp.path().join("ws")).unwrap();
        let ws = Workspace::open(tmp.path(), Some("ws")).unwrap();
        assert_eq!(ws.name(), "ws");
    }
}
