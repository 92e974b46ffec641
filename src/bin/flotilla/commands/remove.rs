//! `flotilla remove` command

use anyhow::Result;

use crate::cli::RemoveArgs;
use crate::commands::find_root;
use flotilla::ops::remove::remove;

pub fn execute(args: RemoveArgs) -> Result<()> {
    let root = find_root()?;
    remove(&root, &args.workspace, args.default.as_deref())
}
