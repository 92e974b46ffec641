//! CMake adapter.

use std::path::Path;

use anyhow::Result;

use crate::builder::environment::EnvMap;
use crate::builder::{ensure_tool, job_count, run_step, ToolAdapter, ToolInvocation};
use crate::core::config::BuildType;
use crate::util::process::ProcessBuilder;

pub struct CMakeAdapter;

impl ToolAdapter for CMakeAdapter {
    fn name(&self) -> &'static str {
        "cmake"
    }

    fn env(&self, _project: &str, _prefix: &Path, _build_dir: &Path, _env: &mut EnvMap) {}

    fn conf(
        &self,
        project: &str,
        prefix: &Path,
        source_dir: &Path,
        build_dir: &Path,
        env: &EnvMap,
        build_type: BuildType,
        args: &[String],
    ) -> Result<ToolInvocation> {
        ensure_tool("cmake", project)?;
        let pb = ProcessBuilder::new("cmake")
            .arg(format!("-DCMAKE_BUILD_TYPE={build_type}"))
            .arg(format!("-DCMAKE_INSTALL_PREFIX={}", prefix.display()))
            .args(args)
            .arg(source_dir)
            .full_env(env)
            .cwd(build_dir);
        run_step(pb)
    }

    fn build(
        &self,
        project: &str,
        _prefix: &Path,
        _source_dir: &Path,
        build_dir: &Path,
        env: &EnvMap,
        targets: &[String],
        _args: &[String],
    ) -> Result<ToolInvocation> {
        ensure_tool("make", project)?;
        let pb = ProcessBuilder::new("make")
            .arg("-C")
            .arg(build_dir)
            .arg(format!("-j{}", job_count()))
            .args(targets)
            .full_env(env);
        run_step(pb)
    }

    fn clean(
        &self,
        project: &str,
        _prefix: &Path,
        _source_dir: &Path,
        build_dir: &Path,
        env: &EnvMap,
    ) -> Result<()> {
        let pb = ProcessBuilder::new("make")
            .arg("-C")
            .arg(build_dir)
            .arg("clean")
            .full_env(env);
        let outcome = run_step(pb)?;
        if !outcome.success {
            tracing::warn!("{project} clean reported failure: {}", outcome.command);
        }
        Ok(())
    }
}
