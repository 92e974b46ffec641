//! `flotilla rename` command

use anyhow::Result;

use crate::cli::RenameArgs;
use crate::commands::{find_root, load_manifest, open_workspace};
use flotilla::ops::rename::rename;

pub fn execute(args: RenameArgs) -> Result<()> {
    let root = find_root()?;
    let ws = open_workspace()?;
    let manifest = load_manifest(&ws)?;
    rename(&root, &manifest, &args.old, &args.new)
}
