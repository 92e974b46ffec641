//! The test command: run each project's declared test suites inside its
//! composed build environment.

use anyhow::{bail, Result};

use crate::builder::environment::compose;
use crate::builder::{AdapterFailure, Step};
use crate::core::manifest::Manifest;
use crate::core::workspace::Workspace;
use crate::ops::build::{expand_template, require_build_dir};
use crate::ops::resolve_requested;
use crate::util::process::ProcessBuilder;

/// Run the test suites of the requested projects (all when empty). Every
/// project is validated up front, so nothing runs when any requested
/// project is unbuilt or has no tests configured.
pub fn test(ws: &Workspace, manifest: &Manifest, projects: &[String]) -> Result<()> {
    let requested = resolve_requested(manifest, projects)?;

    for name in &requested {
        require_build_dir(ws, name)?;
        if manifest.get(name)?.tests.is_empty() {
            bail!("no test configured for {name}");
        }
    }

    for name in &requested {
        tracing::info!("testing {name}");
        let project = manifest.get(name)?;
        let env = compose(ws, manifest, name, false)?;

        for suite in &project.tests {
            let cwd = expand_template(&suite.cwd, ws, name, &env);
            for cmd in &suite.cmds {
                let cmd = expand_template(cmd, ws, name, &env);
                let mut tokens = cmd.split_whitespace();
                let Some(program) = tokens.next() else {
                    continue;
                };

                let pb = ProcessBuilder::new(program)
                    .args(tokens)
                    .full_env(&env)
                    .cwd(&cwd);
                let status = pb.status()?;
                if !status.success() {
                    // Hand the user a command that reproduces the failure
                    // interactively inside the same environment.
                    return Err(AdapterFailure {
                        project: name.to_string(),
                        step: Step::Test,
                        command: format!("(cd {cwd} && flotilla env {name} {cmd})"),
                    }
                    .into());
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn fixture(yaml: &str) -> (TempDir, Workspace, Manifest) {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("flotilla.yaml");
        std::fs::write(&manifest_path, yaml).unwrap();
        let root = tmp.path().join(".flotilla");
        let manifest = Manifest::load(Path::new(&root), &manifest_path).unwrap();
        let ws = Workspace::at(root, "ws");
        (tmp, ws, manifest)
    }

    #[test]
    fn test_unbuilt_project_is_rejected() {
        let (_tmp, ws, manifest) = fixture(
            "projects:\n  a:\n    build: cmake\n    tests:\n      - cwd: \"${BUILD_DIR}\"\n        cmds: [\"true\"]\n",
        );

        let err = test(&ws, &manifest, &[]).unwrap_err();
        assert!(err.to_string().contains("have you built it yet"));
    }

    #[test]
    fn test_project_without_tests_is_rejected() {
        let (_tmp, ws, manifest) = fixture("projects:\n  a:\n    build: cmake\n");
        std::fs::create_dir_all(ws.build_dir("a")).unwrap();

        let err = test(&ws, &manifest, &[]).unwrap_err();
        assert!(err.to_string().contains("no test configured"));
    }

    #[test]
    fn test_passing_suite_succeeds() {
        let (_tmp, ws, manifest) = fixture(
            "projects:\n  a:\n    build: cmake\n    tests:\n      - cwd: \"${BUILD_DIR}\"\n        cmds: [\"true\"]\n",
        );
        std::fs::create_dir_all(ws.build_dir("a")).unwrap();

        test(&ws, &manifest, &[]).unwrap();
    }

    #[test]
    fn test_failing_suite_reports_repro_command() {
        let (_tmp, ws, manifest) = fixture(
            "projects:\n  a:\n    build: cmake\n    tests:\n      - cwd: \"${BUILD_DIR}\"\n        cmds: [\"false\"]\n",
        );
        std::fs::create_dir_all(ws.build_dir("a")).unwrap();

        let err = test(&ws, &manifest, &[]).unwrap_err();
        let failure = err.downcast_ref::<AdapterFailure>().unwrap();
        assert_eq!(failure.step, Step::Test);
        assert!(failure.command.contains("flotilla env a"));
    }
}
