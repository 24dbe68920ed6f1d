//! CLI module for freightdb
//!
//! Provides the command-line interface:
//! - init: create the data directory
//! - load: import a transaction dataset and persist a snapshot
//! - view: print the rows of a named view
//! - views: list registered views
//! - stats: table counts and headline metrics

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, load, run, run_command, stats, view, views, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
