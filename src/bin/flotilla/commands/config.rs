//! `flotilla config` command

use anyhow::Result;

use crate::cli::ConfigArgs;
use crate::commands::{load_manifest, open_workspace};
use flotilla::core::config::ConfigHandle;
use flotilla::ops::config::{apply, show};

pub fn execute(args: ConfigArgs) -> Result<()> {
    let ws = open_workspace()?;
    let mut config = ConfigHandle::load(&ws)?;

    if args.list {
        print!("{}", show(&config)?);
        return Ok(());
    }

    let manifest = load_manifest(&ws)?;
    apply(
        &manifest,
        &mut config,
        args.project.as_deref(),
        &args.options,
    )?;
    config.sync()
}
