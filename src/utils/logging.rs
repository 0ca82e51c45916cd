use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `RUST_LOG` wins over the default filter.
pub fn init() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,virtual_tourist_backend=debug".to_string());
    let fmt = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(filter)).with_ansi(false).with_target(false);
    // A subscriber may already be installed (tests, embedding binaries).
    let _ = fmt.try_init();
}
