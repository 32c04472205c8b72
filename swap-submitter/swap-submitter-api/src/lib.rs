//! The API types for the swap submitter
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod serialization;
mod types;
pub use types::*;

use alloy_primitives::U256;

/// Convert a U256 to a u64, returning an error if the value overflows
pub fn u256_try_into_u64(value: U256) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("U256 value {value} overflows u64"))
}

/// Convert a U256 to a u128, returning an error if the value overflows
pub fn u256_try_into_u128(value: U256) -> Result<u128, String> {
    u128::try_from(value).map_err(|_| format!("U256 value {value} overflows u128"))
}
