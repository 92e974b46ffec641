//! `flotilla list` command

use anyhow::Result;

use crate::cli::ListArgs;
use crate::commands::{find_root, load_manifest, open_workspace};
use flotilla::ops::list;

pub fn execute(args: ListArgs) -> Result<()> {
    if args.workspaces {
        for name in list::workspaces(&find_root()?)? {
            println!("{name}");
        }
    } else {
        let ws = open_workspace()?;
        let manifest = load_manifest(&ws)?;
        for name in list::projects(&manifest) {
            println!("{name}");
        }
    }
    Ok(())
}
