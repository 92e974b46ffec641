//! `flotilla build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::{load_manifest, open_workspace};
use flotilla::core::config::ConfigHandle;
use flotilla::ops::build::{build, BuildOptions};

pub fn execute(args: BuildArgs) -> Result<()> {
    let ws = open_workspace()?;
    let manifest = load_manifest(&ws)?;
    let mut config = ConfigHandle::load(&ws)?;

    let opts = BuildOptions {
        projects: args.projects,
        force: args.force,
    };
    build(&ws, &manifest, &mut config, &opts)?;
    config.sync()
}
