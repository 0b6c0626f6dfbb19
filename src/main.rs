//! sitepatch's main application entry point.
//! Parses arguments, sets up logging and runs a single build over the site root.

use sitepatch::{
    builder::build,
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    logger::init_logger,
    renderer::PlaceholderRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Runs one build over `args.root`.
///
/// Missing pages and absent anchors are reported per file; only data,
/// configuration and I/O failures end the run with an error.
fn run(args: Args) -> Result<()> {
    let renderer = PlaceholderRenderer::new();
    build(&args.root, &renderer)?;
    Ok(())
}
