use tracing_subscriber::EnvFilter;

use crate::settings::AppConfig;

/// JSON lines in production, human-readable output everywhere else.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.is_production() {
        builder.json().with_current_span(true).init();
    } else {
        builder.with_target(false).init();
    }
}
