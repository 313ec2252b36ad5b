use tracing_subscriber::EnvFilter;

/// Create an environment filter based on verbosity level
pub fn create_env_filter(verbosity: u8) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbosity {
            0 => EnvFilter::new("hashiup=warn"),
            1 => EnvFilter::new("hashiup=info"),
            2 => EnvFilter::new("hashiup=debug"),
            _ => EnvFilter::new("hashiup=trace,reqwest=debug"),
        }
    }
}

/// Initialize logging to stderr so progress output on stdout stays clean
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(create_env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
