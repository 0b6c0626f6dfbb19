/// Initialises the global logger. Warnings and errors are always shown;
/// `verbose` adds per-page patch decisions.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .init();
}
