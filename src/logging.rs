/// Route `log` output to stderr. Defaults to warnings only so the menu
/// stays readable; `RUST_LOG` overrides it.
pub fn setup_logging() {
    let mut builder = env_logger::Builder::new();

    builder.filter(None, log::LevelFilter::Warn);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.init();
}
