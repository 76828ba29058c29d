//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// typemill: streaming column type inference for tabular files
#[derive(Parser)]
#[command(name = "typemill")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer column types for a delimited file
    Infer {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum number of data rows to sample
        #[arg(long, default_value = "1000")]
        sample_size: usize,

        /// Sample every K-th row instead of the first N
        #[arg(long, value_name = "K")]
        stride: Option<usize>,

        /// Minimum match ratio for a type to be selected
        #[arg(long, default_value = "0.95")]
        threshold: f64,

        /// Maximum distinct values for Category eligibility
        #[arg(long, default_value = "50")]
        category_cap: usize,

        /// Write the report as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the type vocabulary
    Types,

    /// Override one column's type in a saved report
    Override {
        /// Path to a report JSON produced by `infer --output`
        #[arg(value_name = "REPORT")]
        report: PathBuf,

        /// Column name to override
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Requested type (snake_case or display name)
        #[arg(value_name = "TYPE")]
        requested: String,
    },
}
