//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

use crate::LogFormat;

/// Initialize tracing for the process.
///
/// `RUST_LOG` wins over `default_level`. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init(format: LogFormat, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Human => builder.compact().try_init(),
    };
}
