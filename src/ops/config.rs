//! The config command: inspect and modify workspace configuration.

use anyhow::Result;

use crate::core::config::{BuildType, ConfigError, ConfigHandle};
use crate::core::manifest::{Manifest, ManifestError};

/// Render the current config as YAML for `config -l`.
pub fn show(config: &ConfigHandle) -> Result<String> {
    Ok(serde_yaml::to_string(config.get())?)
}

/// Apply `key=value` options, either globally or scoped to one project.
/// Callers persist the result with [`ConfigHandle::sync`], which writes
/// only when something actually changed.
pub fn apply(
    manifest: &Manifest,
    config: &mut ConfigHandle,
    project: Option<&str>,
    options: &[String],
) -> Result<()> {
    for option in options {
        let (key, value) = match option.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (option.as_str(), None),
        };

        match project {
            Some(project) => apply_project(manifest, config, project, key, value)?,
            None => apply_global(config, key, value)?,
        }
    }
    Ok(())
}

fn apply_global(config: &mut ConfigHandle, key: &str, value: Option<&str>) -> Result<()> {
    match key {
        "type" => {
            let build_type: BuildType = value.unwrap_or_default().parse()?;
            let current = config.get().build_type;
            if current != build_type {
                // Every artifact built so far used the old type; nothing
                // can be trusted until a forced clean.
                config.get_mut().taint = true;
                config.get_mut().build_type = build_type;
            }
            Ok(())
        }
        other => Err(ConfigError::UnknownKey {
            scope: "global",
            key: other.to_string(),
        }
        .into()),
    }
}

fn apply_project(
    manifest: &Manifest,
    config: &mut ConfigHandle,
    project: &str,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    if !manifest.contains(project) {
        return Err(ManifestError::UnknownProject {
            name: project.to_string(),
        }
        .into());
    }

    let overlay = config
        .get_mut()
        .projects
        .entry(project.to_string())
        .or_default();
    match key {
        "enabled" => {
            overlay.enabled = parse_bool(value)?;
            Ok(())
        }
        "args" => {
            overlay.args = value
                .unwrap_or_default()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            Ok(())
        }
        other => Err(ConfigError::UnknownKey {
            scope: "project",
            key: other.to_string(),
        }
        .into()),
    }
}

/// Parse a boolean option value: a bare key means true; 0/1/false/true
/// (any casing) are accepted.
fn parse_bool(value: Option<&str>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(true);
    };
    match value.to_ascii_lowercase().as_str() {
        "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        _ => Err(ConfigError::InvalidBool {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{write_config, BuildType, WorkspaceConfig};
    use crate::core::workspace::Workspace;
    use std::path::Path;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Manifest, ConfigHandle) {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("flotilla.yaml");
        std::fs::write(
            &manifest_path,
            "projects:\n  a:\n    build: cmake\n  b:\n    build: cmake\n",
        )
        .unwrap();
        let root = tmp.path().join(".flotilla");
        let manifest = Manifest::load(Path::new(&root), &manifest_path).unwrap();

        let ws = Workspace::at(&root, "ws");
        std::fs::create_dir_all(ws.dir()).unwrap();
        write_config(
            &ws.config_path(),
            &WorkspaceConfig::initial(BuildType::Debug, ["a", "b"]),
        )
        .unwrap();
        let config = ConfigHandle::load(&ws).unwrap();
        (tmp, manifest, config)
    }

    #[test]
    fn test_type_change_taints_workspace() {
        let (_tmp, manifest, mut config) = fixture();

        apply(&manifest, &mut config, None, &["type=release".to_string()]).unwrap();
        assert_eq!(config.get().build_type, BuildType::Release);
        assert!(config.get().taint);
    }

    #[test]
    fn test_unchanged_type_does_not_taint() {
        let (_tmp, manifest, mut config) = fixture();

        apply(&manifest, &mut config, None, &["type=debug".to_string()]).unwrap();
        assert!(!config.get().taint);
    }

    #[test]
    fn test_invalid_type_is_rejected() {
        let (_tmp, manifest, mut config) = fixture();

        assert!(apply(&manifest, &mut config, None, &["type=profile".to_string()]).is_err());
    }

    #[test]
    fn test_project_enable_toggle() {
        let (_tmp, manifest, mut config) = fixture();

        apply(
            &manifest,
            &mut config,
            Some("a"),
            &["enabled=false".to_string()],
        )
        .unwrap();
        assert!(!config.get().project("a").enabled);

        // Bare key means true.
        apply(&manifest, &mut config, Some("a"), &["enabled".to_string()]).unwrap();
        assert!(config.get().project("a").enabled);
    }

    #[test]
    fn test_project_args_are_tokenized() {
        let (_tmp, manifest, mut config) = fixture();

        apply(
            &manifest,
            &mut config,
            Some("b"),
            &["args=-D trace=true".to_string()],
        )
        .unwrap();
        assert_eq!(config.get().project("b").args, vec!["-D", "trace=true"]);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let (_tmp, manifest, mut config) = fixture();

        assert!(apply(&manifest, &mut config, None, &["bogus=1".to_string()]).is_err());
        assert!(apply(&manifest, &mut config, Some("a"), &["bogus=1".to_string()]).is_err());
        assert!(apply(
            &manifest,
            &mut config,
            Some("ghost"),
            &["enabled=1".to_string()]
        )
        .is_err());
    }

    #[test]
    fn test_show_renders_yaml() {
        let (_tmp, _manifest, config) = fixture();
        let rendered = show(&config).unwrap();
        assert!(rendered.contains("type: debug"));
        assert!(rendered.contains("projects:"));
    }
}
