//! setuptools adapter.
//!
//! setuptools has no configure step and no clean operation; clean just
//! removes the build directory.

use std::path::Path;

use anyhow::Result;

use crate::builder::environment::{merge_var, EnvMap};
use crate::builder::{ensure_tool, run_step, ToolAdapter, ToolInvocation};
use crate::core::config::BuildType;
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::process::ProcessBuilder;

pub struct SetuptoolsAdapter;

fn site_packages(prefix: &Path) -> std::path::PathBuf {
    prefix.join("lib").join("python3").join("site-packages")
}

impl ToolAdapter for SetuptoolsAdapter {
    fn name(&self) -> &'static str {
        "setuptools"
    }

    fn env(&self, _project: &str, prefix: &Path, _build_dir: &Path, env: &mut EnvMap) {
        merge_var(
            env,
            "PYTHONPATH",
            &[site_packages(prefix).to_string_lossy().into_owned()],
        );
    }

    fn conf(
        &self,
        _project: &str,
        _prefix: &Path,
        _source_dir: &Path,
        _build_dir: &Path,
        _env: &EnvMap,
        _build_type: BuildType,
        _args: &[String],
    ) -> Result<ToolInvocation> {
        Ok(ToolInvocation::no_op())
    }

    fn build(
        &self,
        project: &str,
        prefix: &Path,
        source_dir: &Path,
        _build_dir: &Path,
        env: &EnvMap,
        _targets: &[String],
        _args: &[String],
    ) -> Result<ToolInvocation> {
        ensure_tool("python3", project)?;

        // setuptools requires every PYTHONPATH entry under our prefix to
        // exist before installing into it.
        if let Some(paths) = env.get("PYTHONPATH") {
            for path in paths.split(':') {
                if Path::new(path).starts_with(prefix) {
                    crate::util::fs::ensure_dir(Path::new(path))?;
                }
            }
        }

        let pb = ProcessBuilder::new("python3")
            .arg("setup.py")
            .arg("install")
            .arg(format!("--prefix={}", prefix.display()))
            .full_env(env)
            .cwd(source_dir);
        run_step(pb)
    }

    fn clean(
        &self,
        _project: &str,
        _prefix: &Path,
        _source_dir: &Path,
        build_dir: &Path,
        _env: &EnvMap,
    ) -> Result<()> {
        remove_dir_all_if_exists(build_dir)
    }
}
