//! Wall-clock access for swap timing metrics

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of wall-clock time
pub trait Clock: Send + Sync {
    /// The current time in milliseconds since the UNIX epoch
    fn now_millis(&self) -> u64;
}

/// The system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        get_current_time_millis()
    }
}

/// Returns the current unix timestamp in milliseconds
pub fn get_current_time_millis() -> u64 {
    // A clock set before the epoch reads as zero
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default()
}
