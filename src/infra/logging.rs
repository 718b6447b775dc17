//! Console logging setup.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (defaults to `info`).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(service_name: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .try_init();

    if result.is_ok() {
        tracing::info!("logging initialized (service={})", service_name);
    }
}
