use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Diagnostics go to stderr so stdout stays
/// reserved for the manifest summary.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
