//! Analytics events emitted by the swap submitter, and the sinks that record
//! them

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use self::labels::{
    EVENT_TAG, PROVIDER_TAG, QUOTE_TO_CONFIRM_METRIC_NAME, QUOTE_TO_SEND_METRIC_NAME,
    SWAP_EVENT_METRIC_NAME,
};

pub mod events;
pub mod labels;

/// The property holding the quote provider
const PROVIDER_PROPERTY: &str = "provider";
/// The property holding the quote-to-confirm elapsed time
const QUOTE_TO_CONFIRM_PROPERTY: &str = "quoteToUserConfirmsSwapElapsedTimeInMs";
/// The property holding the quote-to-send elapsed time
const QUOTE_TO_SEND_PROPERTY: &str = "quoteToTransactionElapsedTimeInMs";

// ---------
// | Types |
// ---------

/// The names of the events a swap submission can emit
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwapEvent {
    /// The swap was confirmed on-chain
    ExecuteSuccess,
    /// The swap failed
    ExecuteError,
    /// The quote went stale before submission
    ExecutePriceChange,
}

impl SwapEvent {
    /// The wire name of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapEvent::ExecuteSuccess => "swap_execute_success",
            SwapEvent::ExecuteError => "swap_execute_error",
            SwapEvent::ExecutePriceChange => "swap_execute_price_change",
        }
    }
}

impl Display for SwapEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named analytics event with a flat property map
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyticsEvent {
    /// The event name
    pub name: SwapEvent,
    /// The event properties
    pub properties: Map<String, Value>,
}

impl AnalyticsEvent {
    /// Build an event from a serializable property set
    pub fn new<P: Serialize>(name: SwapEvent, properties: &P) -> Self {
        let properties = match serde_json::to_value(properties) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!("{name} properties are not a map: {other}");
                Map::new()
            },
            Err(e) => {
                warn!("failed to serialize {name} properties: {e}");
                Map::new()
            },
        };

        Self { name, properties }
    }

    /// Get a property by name
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// A destination for analytics events
pub trait AnalyticsSink: Send + Sync {
    /// Record an event
    fn track(&self, event: AnalyticsEvent);
}

// ------------------
// | Telemetry Sink |
// ------------------

/// An analytics sink that logs events and records them as metrics
#[derive(Clone, Copy, Debug, Default)]
pub struct TelemetrySink;

impl AnalyticsSink for TelemetrySink {
    fn track(&self, event: AnalyticsEvent) {
        let provider = event
            .property(PROVIDER_PROPERTY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        metrics::counter!(
            SWAP_EVENT_METRIC_NAME,
            EVENT_TAG => event.name.as_str(),
            PROVIDER_TAG => provider.clone(),
        )
        .increment(1);

        if let Some(ms) = event.property(QUOTE_TO_CONFIRM_PROPERTY).and_then(Value::as_i64) {
            metrics::histogram!(QUOTE_TO_CONFIRM_METRIC_NAME, PROVIDER_TAG => provider.clone())
                .record(ms as f64);
        }

        if let Some(ms) = event.property(QUOTE_TO_SEND_PROPERTY).and_then(Value::as_i64) {
            metrics::histogram!(QUOTE_TO_SEND_METRIC_NAME, PROVIDER_TAG => provider)
                .record(ms as f64);
        }

        let properties = Value::Object(event.properties);
        info!(event = %event.name, %properties, "swap analytics event");
    }
}
