//! typemill CLI - column type inference for tabular files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Infer {
            file,
            sample_size,
            stride,
            threshold,
            category_cap,
            output,
            json,
        } => commands::infer::run(
            file,
            sample_size,
            stride,
            threshold,
            category_cap,
            output,
            json,
            cli.verbose,
        ),

        Commands::Types => commands::types::run(),

        Commands::Override {
            report,
            column,
            requested,
        } => commands::overrides::run(report, column, requested),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
