//! `flotilla init` command

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{InitArgs, ManifestSourceArg};
use flotilla::core::workspace::{self, MANIFEST_NAME};
use flotilla::ops::init::{init, InitOptions, ManifestSource};

pub fn execute(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;

    // Reuse an existing root when inside an initialized tree; otherwise
    // create one right here.
    let root = workspace::find_root(&cwd)
        .unwrap_or_else(|| cwd.join(workspace::ROOT_DIR_NAME));

    let opts = InitOptions {
        workspace: args.workspace,
        build_type: args.build_type.parse()?,
        manifest: args.manifest.unwrap_or_else(|| PathBuf::from(MANIFEST_NAME)),
        source: match args.manifest_source {
            ManifestSourceArg::Fs => ManifestSource::Fs,
            ManifestSourceArg::Repo => ManifestSource::Repo,
        },
    };
    init(&root, &cwd, &opts)
}
