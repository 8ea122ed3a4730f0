//! Tracing initialization for embedding applications.

use tracing_subscriber::EnvFilter;

use crate::config;

/// Initialize the global tracing subscriber.
///
/// Honors RUST_LOG when set, otherwise falls back to the application
/// default. Call once at startup; panics if a subscriber is already set.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
