use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Tracing target for successful request outcomes
pub const OUT_CHANNEL: &str = "revive_branch_api::out";
/// Tracing target for failed request outcomes
pub const ERROR_CHANNEL: &str = "revive_branch_api::error";

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
/// Safe to call more than once; later calls are ignored.
pub fn init_subscriber(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
