//! Source checksums: content fingerprints deciding skip-vs-rebuild.
//!
//! A checksum is a hex SHA-1 over the resolved HEAD commit, the diff of
//! the working tree against HEAD (staged and unstaged changes both), and
//! the same diff of every nested submodule, depth-first. Ignored files are
//! invisible to it on purpose: they are assumed build-irrelevant, and an
//! ignored file that does affect the build is a bug in the project's
//! ignore rules. Walking the whole tree instead would be far slower and
//! would pick up editor droppings that never change the build.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{DiffFormat, DiffOptions, Repository};
use sha1::{Digest, Sha1};
use thiserror::Error;

use crate::core::workspace::Workspace;
use crate::util::fs::remove_file_if_exists;

/// The source tree's repository state cannot be resolved.
#[derive(Debug, Error)]
pub enum SourceStateError {
    #[error("{path} is not a git repository (sources must be version controlled): {source}")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("cannot resolve HEAD in {path}: {source}")]
    UnresolvedHead {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("cannot diff working tree in {path}: {source}")]
    Diff {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },
}

/// Calculate the checksum of a source tree.
///
/// Must be fast (it runs for every involved project on every invocation)
/// and accurate (a false match skips a needed rebuild). Rename detection
/// stays off and the default Myers diff is used, so equal trees always
/// hash equally.
pub fn calculate(source_dir: &Path) -> Result<String, SourceStateError> {
    let repo = Repository::open(source_dir).map_err(|source| SourceStateError::NotARepository {
        path: source_dir.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha1::new();
    hash_repository(&repo, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn hash_repository(repo: &Repository, hasher: &mut Sha1) -> Result<(), SourceStateError> {
    let path = repo
        .workdir()
        .unwrap_or_else(|| repo.path())
        .to_path_buf();

    let head = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .map_err(|source| SourceStateError::UnresolvedHead {
            path: path.clone(),
            source,
        })?;
    hasher.update(head.id().to_string().as_bytes());

    // Diff against HEAD rather than the index: that captures staged and
    // unstaged modifications both. Submodule changes appear as short-form
    // "Subproject commit" lines; their contents are hashed by the
    // recursive walk below.
    let tree = head
        .tree()
        .map_err(|source| SourceStateError::UnresolvedHead {
            path: path.clone(),
            source,
        })?;
    let mut opts = DiffOptions::new();
    let diff = repo
        .diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))
        .map_err(|source| SourceStateError::Diff {
            path: path.clone(),
            source,
        })?;
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        hasher.update([line.origin() as u8]);
        hasher.update(line.content());
        true
    })
    .map_err(|source| SourceStateError::Diff {
        path: path.clone(),
        source,
    })?;

    // Depth-first over nested submodules, so deeply nested changes still
    // alter the checksum. Submodules that are not initialized have no
    // working tree to diff and are skipped.
    let submodules = repo.submodules().map_err(|source| SourceStateError::Diff {
        path: path.clone(),
        source,
    })?;
    for submodule in submodules {
        match submodule.open() {
            Ok(sub) => hash_repository(&sub, hasher)?,
            Err(e) => {
                tracing::debug!(
                    "skipping uninitialized submodule {} in {}: {e}",
                    submodule.path().display(),
                    path.display()
                );
            }
        }
    }

    Ok(())
}

/// Retrieve the stored checksum for a project, or `None` if there is no
/// checksum (project cleaned, never built, or invalidated). A corrupt
/// stored checksum needs no special handling: it simply fails to match the
/// calculated one, and the project rebuilds.
pub fn stored(ws: &Workspace, project: &str) -> Option<String> {
    let text = std::fs::read_to_string(ws.checksum_file(project)).ok()?;
    Some(text.trim_end().to_string())
}

/// Persist a project checksum after a successful build.
///
/// Deliberately a plain (non-atomic) write: the worst a torn write can do
/// is produce a mismatching checksum and a spurious rebuild.
pub fn store(ws: &Workspace, project: &str, checksum: &str) -> Result<()> {
    crate::util::fs::ensure_dir(&ws.checksum_dir())?;
    let path = ws.checksum_file(project);
    std::fs::write(&path, format!("{checksum}\n"))
        .with_context(|| format!("failed to write checksum {}", path.display()))
}

/// Invalidate a project's stored checksum, forcing a rebuild on the next
/// pass (used when a dependency rebuilds). Already absent is fine.
pub fn invalidate(ws: &Workspace, project: &str) -> Result<()> {
    tracing::debug!("invalidating checksum for {project}");
    remove_file_if_exists(&ws.checksum_file(project))
}

/// The staleness decision: a project needs a build iff a build is forced,
/// no checksum is stored, or the stored checksum no longer matches the
/// calculated one.
pub fn is_stale(force: bool, stored: Option<&str>, current: &str) -> bool {
    force || stored != Some(current)
}
