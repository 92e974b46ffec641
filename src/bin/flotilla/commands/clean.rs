//! `flotilla clean` command

use anyhow::Result;

use crate::cli::CleanArgs;
use crate::commands::{load_manifest, open_workspace};
use flotilla::core::config::ConfigHandle;
use flotilla::ops::clean::clean;

pub fn execute(args: CleanArgs) -> Result<()> {
    let ws = open_workspace()?;
    let manifest = load_manifest(&ws)?;
    let mut config = ConfigHandle::load(&ws)?;

    clean(&ws, &manifest, &mut config, &args.projects, args.force)?;
    config.sync()
}
