//! Meson adapter.

use std::path::Path;

use anyhow::Result;

use crate::builder::environment::EnvMap;
use crate::builder::{ensure_tool, run_step, ToolAdapter, ToolInvocation};
use crate::core::config::BuildType;
use crate::util::process::ProcessBuilder;

pub struct MesonAdapter;

impl ToolAdapter for MesonAdapter {
    fn name(&self) -> &'static str {
        "meson"
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
        ensure_tool("meson", project)?;
        let pb = ProcessBuilder::new("meson")
            .arg("setup")
            .arg("--buildtype")
            .arg(build_type.to_string())
            .arg("--prefix")
            .arg(prefix)
            .args(args)
            .arg(build_dir)
            .arg(source_dir)
            .full_env(env);
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
        ensure_tool("ninja", project)?;
        let pb = ProcessBuilder::new("ninja")
            .arg("-C")
            .arg(build_dir)
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
        let pb = ProcessBuilder::new("ninja")
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
