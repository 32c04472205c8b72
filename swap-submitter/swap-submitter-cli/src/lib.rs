//! Submits quoted token swaps on-chain: checks the quote for staleness,
//! approves the sell token when needed, sends the swap, and reports the
//! outcome along with the ledger updates and analytics it produced
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]
#![deny(clippy::needless_pass_by_ref_mut)]

pub mod analytics;
pub mod cli;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod telemetry;
pub mod tokens;
pub mod transaction_client;
pub mod workflow;

#[cfg(test)]
mod test_helpers;
