use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Console logging for the operator. `RUST_LOG` overrides the default level.
pub fn init_subscriber() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A second init (e.g. from tests) keeps the first subscriber
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
