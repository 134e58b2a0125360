//! Tracing subscriber setup.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// A `RUST_LOG` environment filter wins over the configured level. The
/// format switch picks json output for production and pretty output for
/// development.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "pretty" {
        registry
            .with(fmt::layer().pretty().with_span_events(FmtSpan::CLOSE))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    }
}
