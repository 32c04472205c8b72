//! CLI argument definition & parsing for the swap submitter

use std::{str::FromStr, time::Duration};

use alloy::signers::local::PrivateKeySigner;
use bigdecimal::{BigDecimal, Zero};
use clap::Parser;
use swap_submitter_api::swap::SwapInfo;
use tokio::fs::read_to_string;

use crate::{
    error::SwapSubmitterError,
    transaction_client::{DEFAULT_RECEIPT_TIMEOUT_SECS, ONE_CONFIRMATION},
    workflow::{price::DEFAULT_MAX_PRICE_DEVIATION, SubmitterConfig},
};

/// The cli for the swap submitter
#[rustfmt::skip]
#[derive(Parser, Debug, Clone)]
#[clap(about = "Submits a quoted swap on-chain")]
pub struct Cli {
    // --- Inputs --- //

    /// Path to a JSON file holding the quoted swap
    #[clap(long, env = "SWAP_PATH")]
    pub swap_path: String,
    /// Path to a JSON file holding the cached token balances
    ///
    /// This file should be a JSON array of token balances
    #[clap(long, env = "TOKEN_BALANCES_PATH")]
    pub token_balances_path: String,

    // --- Chain Config --- //

    /// The RPC url to use
    #[clap(long, env = "RPC_URL")]
    pub rpc_url: String,
    /// The private key used to sign transactions
    #[clap(long, env = "PRIVATE_KEY")]
    pub private_key: String,
    /// The number of confirmations to wait for
    #[clap(long, env = "CONFIRMATIONS", default_value_t = ONE_CONFIRMATION)]
    pub confirmations: u64,
    /// How long to wait for a receipt, in seconds
    #[clap(long, env = "RECEIPT_TIMEOUT_SECS", default_value_t = DEFAULT_RECEIPT_TIMEOUT_SECS)]
    pub receipt_timeout_secs: u64,

    // --- Workflow Config --- //

    /// The maximum deviation of the guaranteed price from the quoted price, as
    /// a fraction of the quoted price
    #[clap(long, env = "MAX_PRICE_DEVIATION", default_value = DEFAULT_MAX_PRICE_DEVIATION)]
    pub max_price_deviation: String,

    // --- Telemetry --- //

    /// Whether to emit JSON formatted logs
    #[clap(long, env = "JSON_LOGS")]
    pub json_logs: bool,
}

impl Cli {
    /// Validate the CLI arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.confirmations == 0 {
            return Err("--confirmations must be at least 1".to_string());
        }

        if self.receipt_timeout_secs == 0 {
            return Err("--receipt-timeout-secs must be positive".to_string());
        }

        let deviation = self.get_max_price_deviation().map_err(|e| e.to_string())?;
        if deviation < BigDecimal::zero() {
            return Err("--max-price-deviation must not be negative".to_string());
        }

        self.get_signer().map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Get the maximum price deviation
    pub fn get_max_price_deviation(&self) -> Result<BigDecimal, SwapSubmitterError> {
        BigDecimal::from_str(&self.max_price_deviation).map_err(SwapSubmitterError::config)
    }

    /// Get the receipt timeout
    pub fn get_receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    /// Get the signer for the configured private key
    pub fn get_signer(&self) -> Result<PrivateKeySigner, SwapSubmitterError> {
        PrivateKeySigner::from_str(&self.private_key).map_err(SwapSubmitterError::config)
    }

    /// Get the workflow config
    pub fn submitter_config(&self) -> Result<SubmitterConfig, SwapSubmitterError> {
        Ok(SubmitterConfig { max_price_deviation: self.get_max_price_deviation()? })
    }

    /// Read and parse the quoted swap
    pub async fn read_swap(&self) -> Result<SwapInfo, SwapSubmitterError> {
        let json_str = read_to_string(&self.swap_path).await.map_err(SwapSubmitterError::config)?;
        serde_json::from_str(&json_str).map_err(SwapSubmitterError::parse)
    }
}
