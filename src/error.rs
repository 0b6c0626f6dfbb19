//! Error handling for sitepatch.
//! Defines the error type and result alias used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for sitepatch operations.
///
/// Every variant here aborts the run when it reaches `main`. Per-file problems
/// (missing pages, absent anchors) are reported as skips instead and never
/// become an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A data document could not be read or parsed.
    #[error("Data error in '{path}': {source}.")]
    DataError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Post '{slug}' has an unparseable date '{date}'.")]
    InvalidDate { slug: String, date: String },

    #[error("Duplicate post slug '{slug}'.")]
    DuplicateSlug { slug: String },

    /// The post collection is empty, so there is nothing to feature.
    #[error("No blog posts available to build the blog index.")]
    NoPosts,

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// An `exclude` pattern in the configuration is not a valid glob.
    #[error("Exclude pattern error: {0}.")]
    GlobError(#[from] globset::Error),

    #[error("Directory walk error: {0}.")]
    WalkError(#[from] walkdir::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
