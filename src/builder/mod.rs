//! Build-tool adapters.
//!
//! One adapter per underlying build technology. The core never inspects
//! adapter internals; it drives the four-operation contract (`env`,
//! `conf`, `build`, `clean`) and interprets the returned invocation
//! outcome. Tags are a closed set resolved at manifest load time, so an
//! unknown tool is a configuration error, never a runtime surprise.

pub mod cmake;
pub mod environment;
pub mod meson;
pub mod setuptools;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Result};
use thiserror::Error;

use crate::core::config::BuildType;
use crate::util::process::ProcessBuilder;

use self::cmake::CMakeAdapter;
use self::environment::EnvMap;
use self::meson::MesonAdapter;
use self::setuptools::SetuptoolsAdapter;

/// The build technology of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTool {
    CMake,
    Meson,
    Setuptools,
}

/// Unknown build-tool tag in a manifest.
#[derive(Debug, Error)]
#[error("unknown build tool \"{0}\"")]
pub struct UnknownBuildTool(pub String);

impl BuildTool {
    /// The adapter implementing this tool's operations.
    pub fn adapter(self) -> &'static dyn ToolAdapter {
        match self {
            BuildTool::CMake => &CMakeAdapter,
            BuildTool::Meson => &MesonAdapter,
            BuildTool::Setuptools => &SetuptoolsAdapter,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildTool::CMake => "cmake",
            BuildTool::Meson => "meson",
            BuildTool::Setuptools => "setuptools",
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTool {
    type Err = UnknownBuildTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cmake" => Ok(BuildTool::CMake),
            "meson" => Ok(BuildTool::Meson),
            "setuptools" => Ok(BuildTool::Setuptools),
            other => Err(UnknownBuildTool(other.to_string())),
        }
    }
}

/// The step an adapter was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Configure,
    Build,
    Clean,
    Test,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Configure => write!(f, "configure"),
            Step::Build => write!(f, "build"),
            Step::Clean => write!(f, "clean"),
            Step::Test => write!(f, "test"),
        }
    }
}

/// An adapter subprocess reported failure. Carries the command so the user
/// can re-run the failing step by hand.
#[derive(Debug, Error)]
#[error("{project} {step} failed; you can re-run this step with:\n  {command}")]
pub struct AdapterFailure {
    pub project: String,
    pub step: Step,
    pub command: String,
}

/// Outcome of one adapter invocation: whether the tool succeeded, and the
/// command line it ran.
#[derive(Debug)]
pub struct ToolInvocation {
    pub success: bool,
    pub command: String,
}

impl ToolInvocation {
    /// A trivially successful outcome for adapters that have no work to do
    /// in a given step.
    pub fn no_op() -> Self {
        ToolInvocation {
            success: true,
            command: String::new(),
        }
    }
}

/// The interaction with one underlying build system. Operations only;
/// selection and validation happen at manifest load.
pub trait ToolAdapter: Sync {
    /// The manifest tag for this adapter.
    fn name(&self) -> &'static str;

    /// Apply tool-specific environment tweaks for a dependency installed
    /// at `prefix`.
    fn env(&self, project: &str, prefix: &Path, build_dir: &Path, env: &mut EnvMap);

    /// Run the configure step. A non-zero tool exit is reported in the
    /// outcome, not as an error.
    #[allow(clippy::too_many_arguments)]
    fn conf(
        &self,
        project: &str,
        prefix: &Path,
        source_dir: &Path,
        build_dir: &Path,
        env: &EnvMap,
        build_type: BuildType,
        args: &[String],
    ) -> Result<ToolInvocation>;

    /// Run the build step.
    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        project: &str,
        prefix: &Path,
        source_dir: &Path,
        build_dir: &Path,
        env: &EnvMap,
        targets: &[String],
        args: &[String],
    ) -> Result<ToolInvocation>;

    /// Ask the build system to clean itself. A failing clean is logged,
    /// not fatal.
    fn clean(
        &self,
        project: &str,
        prefix: &Path,
        source_dir: &Path,
        build_dir: &Path,
        env: &EnvMap,
    ) -> Result<()>;
}

/// Run one adapter step, capturing the command string for reproduction
/// messages.
pub(crate) fn run_step(pb: ProcessBuilder) -> Result<ToolInvocation> {
    let command = pb.display_command();
    let status = pb.status()?;
    Ok(ToolInvocation {
        success: status.success(),
        command,
    })
}

/// Fail early with an actionable message when the external tool is not on
/// PATH, instead of a bare spawn error mid-build.
pub(crate) fn ensure_tool(tool: &str, project: &str) -> Result<()> {
    if which::which(tool).is_err() {
        bail!("`{tool}` not found in PATH (required to build {project})");
    }
    Ok(())
}

/// Parallelism for build tools that take a job count.
pub(crate) fn job_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() + 1)
        .unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tool_parse() {
        assert_eq!("cmake".parse::<BuildTool>().unwrap(), BuildTool::CMake);
        assert_eq!("meson".parse::<BuildTool>().unwrap(), BuildTool::Meson);
        assert_eq!(
            "setuptools".parse::<BuildTool>().unwrap(),
            BuildTool::Setuptools
        );
        assert!("bazel".parse::<BuildTool>().is_err());
    }

    #[test]
    fn test_adapter_names_match_tags() {
        for tool in [BuildTool::CMake, BuildTool::Meson, BuildTool::Setuptools] {
            assert_eq!(tool.adapter().name(), tool.as_str());
        }
    }

    #[test]
    fn test_adapter_failure_message_carries_command() {
        let failure = AdapterFailure {
            project: "libfoo".to_string(),
            step: Step::Configure,
            command: "cmake -DCMAKE_BUILD_TYPE=debug /src/libfoo".to_string(),
        };
        let message = failure.to_string();
        assert!(message.contains("libfoo configure failed"));
        assert!(message.contains("cmake -DCMAKE_BUILD_TYPE=debug"));
    }
}
