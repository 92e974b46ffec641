//! Flotilla CLI - a multi-project workspace orchestrator

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("flotilla=debug")
    } else {
        EnvFilter::new("flotilla=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Build(args) => commands::build::execute(args),
        Commands::Clean(args) => commands::clean::execute(args),
        Commands::Test(args) => commands::test::execute(args),
        Commands::Config(args) => commands::config::execute(args),
        Commands::Env(args) => commands::env::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Default(args) => commands::default::execute(args),
        Commands::Remove(args) => commands::remove::execute(args),
        Commands::Rename(args) => commands::rename::execute(args),
    }
}
