//! Workspace configuration: build type, taint flag, per-project overlay.
//!
//! The configuration is read into a [`ConfigHandle`] holding both the
//! current state and an as-loaded snapshot. [`ConfigHandle::sync`] writes
//! back only when the two differ structurally, and always atomically, so a
//! crash mid-write cannot leave a torn config behind.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::workspace::Workspace;
use crate::util::fs::atomic_write;

/// Errors around workspace configuration state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A global configuration change invalidated all prior builds.
    #[error(
        "workspace configuration changed since the last build; \
         run `flotilla clean -f` before building"
    )]
    Tainted,

    #[error("\"type\" must be one of: debug, release (got \"{value}\")")]
    InvalidBuildType { value: String },

    #[error("value \"{value}\" is not a valid boolean")]
    InvalidBool { value: String },

    #[error("unknown {scope} config key \"{key}\"")]
    UnknownKey { scope: &'static str, key: String },
}

/// Build type for a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Debug,
    Release,
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Debug => write!(f, "debug"),
            BuildType::Release => write!(f, "release"),
        }
    }
}

impl FromStr for BuildType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            _ => Err(ConfigError::InvalidBuildType {
                value: s.to_string(),
            }),
        }
    }
}

/// Per-project configuration overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Whether the project participates in builds.
    pub enabled: bool,

    /// Extra builder arguments, appended after the manifest's.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            enabled: true,
            args: Vec::new(),
        }
    }
}

/// Persisted workspace state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Build type passed to every configure step.
    #[serde(rename = "type")]
    pub build_type: BuildType,

    /// Set when a global config change invalidated all prior builds.
    #[serde(default)]
    pub taint: bool,

    /// Per-project overlay.
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl WorkspaceConfig {
    /// Initial configuration for a fresh workspace: every project enabled
    /// with no extra args, untainted.
    pub fn initial<'a>(
        build_type: BuildType,
        projects: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        WorkspaceConfig {
            build_type,
            taint: false,
            projects: projects
                .into_iter()
                .map(|name| (name.to_string(), ProjectConfig::default()))
                .collect(),
        }
    }

    /// The overlay for a project, defaulting to enabled/no-args for
    /// projects added to the manifest after the workspace was initialized.
    pub fn project(&self, name: &str) -> ProjectConfig {
        self.projects.get(name).cloned().unwrap_or_default()
    }
}

/// A loaded workspace config plus its as-loaded snapshot for change
/// detection. Passed by reference through the call chain; nothing is
/// cached process-wide.
#[derive(Debug)]
pub struct ConfigHandle {
    path: PathBuf,
    current: WorkspaceConfig,
    loaded: WorkspaceConfig,
}

impl ConfigHandle {
    /// Load the config for a workspace.
    pub fn load(ws: &Workspace) -> Result<ConfigHandle> {
        let path = ws.config_path();
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read workspace config {}", path.display()))?;
        let mut config: WorkspaceConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse workspace config {}", path.display()))?;

        // Split project args on whitespace so hand-edited entries like
        // "-D something" become separate tokens, the same way manifest
        // args are tokenized.
        for proj in config.projects.values_mut() {
            proj.args = proj
                .args
                .iter()
                .flat_map(|arg| arg.split_whitespace())
                .map(str::to_string)
                .collect();
        }

        Ok(ConfigHandle {
            path,
            loaded: config.clone(),
            current: config,
        })
    }

    /// The current config.
    pub fn get(&self) -> &WorkspaceConfig {
        &self.current
    }

    /// The current config, for modification. Changes take effect on disk
    /// only at [`ConfigHandle::sync`].
    pub fn get_mut(&mut self) -> &mut WorkspaceConfig {
        &mut self.current
    }

    /// Write the config back iff it changed since it was loaded.
    pub fn sync(&mut self) -> Result<()> {
        if self.current == self.loaded {
            tracing::debug!("workspace config unchanged, not updating");
            return Ok(());
        }
        tracing::debug!("updating workspace config at {}", self.path.display());
        write_config(&self.path, &self.current)?;
        self.loaded = self.current.clone();
        Ok(())
    }
}

/// Atomically write a workspace config. Used directly by `init` for the
/// first write, before any handle exists.
pub fn write_config(path: &std::path::Path, config: &WorkspaceConfig) -> Result<()> {
    let text = serde_yaml::to_string(config).context("failed to serialize workspace config")?;
    atomic_write(path, &text)
}
