//! CLI module for Float.
//!
//! Inspects the picture-in-picture proxy from the command line.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::FloatError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), FloatError> {
    let cli = Cli::parse();
    cli.execute()
}
