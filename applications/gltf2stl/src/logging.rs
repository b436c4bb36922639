/// Sends `log` records to stderr.
///
/// `RUST_LOG` is applied on top of the default filter, e.g. `RUST_LOG=debug` shows per-file details.
pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .init();
}
