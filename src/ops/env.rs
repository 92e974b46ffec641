//! The env command: run a command (or an interactive shell) inside a
//! project's composed build environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::environment::compose;
use crate::core::manifest::Manifest;
use crate::core::workspace::Workspace;
use crate::ops::build::require_build_dir;

/// Enter the build environment of `project`, executing `command` (or the
/// user's shell when empty) from `current_dir` (or the project's build
/// directory). On Unix this replaces the current process and only returns
/// on error.
pub fn enter(
    ws: &Workspace,
    manifest: &Manifest,
    project: &str,
    command: &[String],
    current_dir: Option<&Path>,
) -> Result<()> {
    manifest.get(project)?;
    let build_dir = require_build_dir(ws, project)?;

    let mut env = compose(ws, manifest, project, true)?;

    let mut cmd: Vec<String> = if command.is_empty() {
        vec![default_shell()]
    } else {
        command.to_vec()
    };

    // Make it obvious in the prompt that this shell runs in a build
    // environment.
    let exe = Path::new(&cmd[0])
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = format!("\\[\x1b[1;32m\\][flotilla-{project}-env]\\[\x1b[m\\]$ ");
    if exe == "bash" {
        cmd.insert(1, "--norc".to_string());
        env.insert("PS1".to_string(), format!("\\u@\\h:\\w {suffix}"));
    } else if exe == "sh" {
        // sh doesn't support \u and the other escapes.
        env.insert("PS1".to_string(), suffix);
    }

    let cwd: PathBuf = current_dir.map(Path::to_path_buf).unwrap_or(build_dir);

    tracing::debug!("execing with {project} build environment: {cmd:?}");
    exec(&cmd, &env, &cwd)
}

fn default_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string())
}

#[cfg(unix)]
fn exec(cmd: &[String], env: &crate::builder::environment::EnvMap, cwd: &Path) -> Result<()> {
    use std::os::unix::process::CommandExt;

    let mut command = std::process::Command::new(&cmd[0]);
    command
        .args(&cmd[1..])
        .env_clear()
        .envs(env)
        .current_dir(cwd);
    // exec only returns on failure.
    let err = command.exec();
    Err(err).with_context(|| format!("failed to exec {}", cmd[0]))
}

#[cfg(not(unix))]
fn exec(cmd: &[String], env: &crate::builder::environment::EnvMap, cwd: &Path) -> Result<()> {
    let status = std::process::Command::new(&cmd[0])
        .args(&cmd[1..])
        .env_clear()
        .envs(env)
        .current_dir(cwd)
        .status()
        .with_context(|| format!("failed to run {}", cmd[0]))?;
    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_enter_requires_build_dir() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("flotilla.yaml");
        std::fs::write(&manifest_path, "projects:\n  a:\n    build: cmake\n").unwrap();
        let root = tmp.path().join(".flotilla");
        let manifest = Manifest::load(&root, &manifest_path).unwrap();
        let ws = Workspace::at(&root, "ws");

        let err = enter(&ws, &manifest, "a", &[], None).unwrap_err();
        assert!(err.to_string().contains("have you built it yet"));
    }
}
