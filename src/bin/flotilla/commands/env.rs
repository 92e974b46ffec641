//! `flotilla env` command

use anyhow::Result;

use crate::cli::EnvArgs;
use crate::commands::{load_manifest, open_workspace};
use flotilla::ops::env::enter;

pub fn execute(args: EnvArgs) -> Result<()> {
    let ws = open_workspace()?;
    let manifest = load_manifest(&ws)?;

    // -b forces the default (the project build directory); -c picks a
    // custom one. The two conflict at the clap level.
    let current_dir = if args.build_dir {
        None
    } else {
        args.current_dir.as_deref()
    };
    enter(&ws, &manifest, &args.project, &args.command, current_dir)
}
