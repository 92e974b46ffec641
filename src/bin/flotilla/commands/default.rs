//! `flotilla default` command

use anyhow::Result;

use crate::cli::DefaultArgs;
use crate::commands::find_root;
use flotilla::ops::default;

pub fn execute(args: DefaultArgs) -> Result<()> {
    let root = find_root()?;
    match args.workspace {
        None => {
            println!("{}", default::show(&root)?);
            Ok(())
        }
        Some(name) => default::set(&root, &name),
    }
}
