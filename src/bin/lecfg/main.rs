//! lecfg CLI - build-configuration resolver for libethercat

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use lecfg::ops::ResolveError;
use lecfg::util::diagnostic::emit;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        match e.downcast_ref::<ResolveError>() {
            Some(resolve_err) => emit(&resolve_err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("lecfg=debug")
    } else {
        EnvFilter::new("lecfg=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args, color),
        Commands::Schema(args) => commands::schema::execute(args),
        Commands::Versions => commands::versions::execute(),
        Commands::Configure(args) => commands::configure::execute(args, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
