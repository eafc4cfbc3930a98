use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber. `log_level` is either a bare level (`debug`) or a full
/// directive string (`fire_age=trace,axum=info`).
pub fn setup_logging(log_level: &str, json_format: bool) {
    let normalized = log_level.trim();
    let filter_spec = if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("{normalized},hyper=info,tower=info")
    };
    let filter = EnvFilter::from_str(&filter_spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json_format {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).compact().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!(
        filter = %filter_spec,
        format = if json_format { "json" } else { "compact" },
        "logging initialized"
    );
}
