//! Log output setup for the swap submitter binary

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
///
/// The filter defaults to `INFO` and is overridden by `RUST_LOG`
pub fn setup_logging(json: bool) {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_file(true).with_line_number(true).json().flatten_event(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_file(true).with_line_number(true))
            .init();
    }
}
