//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Flotilla - a multi-project workspace orchestrator
#[derive(Parser)]
#[command(name = "flotilla")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workspace
    Init(InitArgs),

    /// Build projects in dependency order
    Build(BuildArgs),

    /// Clean projects
    Clean(CleanArgs),

    /// Run project test suites
    Test(TestArgs),

    /// Show or modify workspace configuration
    Config(ConfigArgs),

    /// Run a command inside a project's build environment
    Env(EnvArgs),

    /// List projects, or workspaces with -w
    List(ListArgs),

    /// Show or change the default workspace
    Default(DefaultArgs),

    /// Remove a workspace
    Remove(RemoveArgs),

    /// Rename a workspace
    Rename(RenameArgs),
}

/// Where `init -m` paths are resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ManifestSourceArg {
    /// Relative to the current directory
    Fs,
    /// Relative to .repo/manifests next to the root
    Repo,
}

#[derive(Args)]
pub struct InitArgs {
    /// Workspace to initialize
    pub workspace: Option<String>,

    /// Workspace build type
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "debug")]
    pub build_type: String,

    /// Manifest path
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// What the -m path is relative to
    #[arg(short = 's', long = "manifest-source", value_enum, default_value = "fs")]
    pub manifest_source: ManifestSourceArg,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build a particular project or projects
    pub projects: Vec<String>,

    /// Force a build even when checksums are current
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Clean project(s)
    pub projects: Vec<String>,

    /// Force-clean (remove the build directory)
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TestArgs {
    /// Test a particular project or projects
    pub projects: Vec<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// List the current workspace config
    #[arg(short, long)]
    pub list: bool,

    /// Set project-specific config
    #[arg(short, long)]
    pub project: Option<String>,

    /// Key-value options (format key=value)
    pub options: Vec<String>,
}

#[derive(Args)]
pub struct EnvArgs {
    /// Run from the project build directory (the default)
    #[arg(short = 'b', long = "build-dir", conflicts_with = "current_dir")]
    pub build_dir: bool,

    /// The directory the command will run from
    #[arg(short = 'c', long = "current-dir", value_name = "DIR")]
    pub current_dir: Option<PathBuf>,

    /// Enter the build environment of this project
    pub project: String,

    /// Command to run inside the environment (defaults to your shell)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// List workspaces instead of projects
    #[arg(short = 'w', long = "workspaces")]
    pub workspaces: bool,
}

#[derive(Args)]
pub struct DefaultArgs {
    /// Workspace to make the default
    pub workspace: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Workspace to remove
    pub workspace: String,

    /// New default workspace
    #[arg(short = 'd', long = "default")]
    pub default: Option<String>,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Old workspace name
    pub old: String,

    /// New workspace name
    pub new: String,
}
