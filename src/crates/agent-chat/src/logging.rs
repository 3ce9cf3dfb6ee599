//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Filter directive: `--verbose` forces debug, else `RUST_LOG`, else the
/// configured level.
pub fn filter_directive(configured: &str, verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| configured.to_string())
}

/// Install the global subscriber. Logs go to stderr so command output stays clean.
pub fn init(configured: &str, verbose: bool) {
    let directive = filter_directive(configured, verbose, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
