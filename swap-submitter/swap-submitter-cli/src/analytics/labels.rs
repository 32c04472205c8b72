//! Constants for metric labels and metric names

/// Metric counting swap analytics events, tagged by event name
pub const SWAP_EVENT_METRIC_NAME: &str = "swap_submission_events";

/// Metric for the time from quote receipt to the user confirming the swap
pub const QUOTE_TO_CONFIRM_METRIC_NAME: &str = "swap_quote_to_confirm_ms";

/// Metric for the time from quote receipt to sending the swap transaction
pub const QUOTE_TO_SEND_METRIC_NAME: &str = "swap_quote_to_send_ms";

/// Metric tag for the analytics event name
pub const EVENT_TAG: &str = "event";

/// Metric tag for the quote provider
pub const PROVIDER_TAG: &str = "provider";
