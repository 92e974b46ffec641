//! The project model: one buildable unit of source, as declared in the
//! manifest.

use std::path::PathBuf;

use crate::builder::BuildTool;

/// Build targets used when the manifest does not name any.
pub const DEFAULT_TARGETS: &[&str] = &["install"];

/// A project parsed out of the manifest. Built once per manifest parse and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Project {
    /// Unique name; also the source directory name next to the root.
    pub name: String,

    /// The build technology driving this project.
    pub build: BuildTool,

    /// Projects this one depends on. No duplicates; every entry exists in
    /// the merged manifest.
    pub deps: Vec<String>,

    /// Environment variable templates, in declaration order. Values may
    /// reference `${LIBDIR}`, `${PREFIX}`, and any already-composed
    /// variable.
    pub env: Vec<(String, String)>,

    /// Extra builder arguments, already split into tokens.
    pub args: Vec<String>,

    /// Build targets. Defaults to [`DEFAULT_TARGETS`]; an explicit null in
    /// the manifest means no targets.
    pub targets: Vec<String>,

    /// Test suites runnable via `flotilla test`.
    pub tests: Vec<TestSuite>,

    /// Absolute path to the source tree.
    pub path: PathBuf,

    /// Reverse-dependency list, computed after merging.
    pub downstream: Vec<String>,
}

/// One test suite: commands run from a working directory, both subject to
/// `${VAR}` expansion against the composed build environment.
#[derive(Debug, Clone)]
pub struct TestSuite {
    pub cwd: String,
    pub cmds: Vec<String>,
}
