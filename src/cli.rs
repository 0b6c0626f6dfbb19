//! Command-line interface implementation for sitepatch.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for sitepatch.
#[derive(Parser, Debug)]
#[command(author, version, about = "sitepatch: assemble a static site in place from data and fragments", long_about = None)]
pub struct Args {
    /// Site root containing the `_src` directory and the pages to patch
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// Exits through clap's own error handling on invalid arguments.
pub fn get_args() -> Args {
    Args::parse()
}
