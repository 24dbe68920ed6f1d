//! CLI argument definitions using clap
//!
//! Commands:
//! - freightdb init --config <path>
//! - freightdb load --config <path> <file>
//! - freightdb view --config <path> <name>
//! - freightdb views
//! - freightdb stats --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// freightdb - a strict, deterministic, embedded supply-chain analytics store
#[derive(Parser, Debug)]
#[command(name = "freightdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new freightdb data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./freightdb.json")]
        config: PathBuf,
    },

    /// Import a transaction dataset (JSON array of flat records)
    Load {
        /// Path to configuration file
        #[arg(long, default_value = "./freightdb.json")]
        config: PathBuf,

        /// Path to the dataset file
        file: PathBuf,
    },

    /// Print the rows of a named view
    View {
        /// Path to configuration file
        #[arg(long, default_value = "./freightdb.json")]
        config: PathBuf,

        /// View name (e.g. v_monthly_kpis)
        name: String,
    },

    /// List registered views
    Views,

    /// Print table counts and headline metrics
    Stats {
        /// Path to configuration file
        #[arg(long, default_value = "./freightdb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
