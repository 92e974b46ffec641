//! Command implementations, one module per subcommand.

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

use crate::core::manifest::{Manifest, ManifestError};

/// Validate a set of requested project names against the manifest and
/// default an empty request to every project, in declaration order.
pub(crate) fn resolve_requested(
    manifest: &Manifest,
    requested: &[String],
) -> Result<Vec<String>, ManifestError> {
    for name in requested {
        if !manifest.contains(name) {
            return Err(ManifestError::UnknownProject {
                name: name.clone(),
            });
        }
    }
    if requested.is_empty() {
        Ok(manifest.names().map(String::from).collect())
    } else {
        Ok(requested.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn manifest() -> (TempDir, Manifest) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flotilla.yaml");
        std::fs::write(
            &path,
            "projects:\n  b:\n    build: cmake\n  a:\n    build: cmake\n",
        )
        .unwrap();
        let root = tmp.path().join(".flotilla");
        let m = Manifest::load(Path::new(&root), &path).unwrap();
        (tmp, m)
    }

    #[test]
    fn test_empty_request_means_all_in_declaration_order() {
        let (_tmp, m) = manifest();
        let all = resolve_requested(&m, &[]).unwrap();
        assert_eq!(all, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_project_is_rejected() {
        let (_tmp, m) = manifest();
        assert!(matches!(
            resolve_requested(&m, &["ghost".to_string()]),
            Err(ManifestError::UnknownProject { .. })
        ));
    }
}
