//! `flotilla test` command

use anyhow::Result;

use crate::cli::TestArgs;
use crate::commands::{load_manifest, open_workspace};
use flotilla::ops::test::test;

pub fn execute(args: TestArgs) -> Result<()> {
    let ws = open_workspace()?;
    let manifest = load_manifest(&ws)?;
    test(&ws, &manifest, &args.projects)
}
