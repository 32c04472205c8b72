//! Cached token balances and USD prices
//!
//! The submitter only reads from the cache: balances are refreshed by
//! whatever process writes the cache file

use std::{collections::HashMap, path::Path};

use alloy_primitives::Address;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use tokio::fs::read_to_string;

use crate::error::SwapSubmitterError;

/// A token's cached balance and price
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// The identifier of the token
    pub token_id: String,
    /// The token's contract address
    pub address: Address,
    /// The token's ticker
    pub symbol: String,
    /// The number of decimals in one whole unit of the token
    pub decimals: u32,
    /// The wallet's balance, in whole units
    pub balance: BigDecimal,
    /// The price of one whole unit in USD, if known
    #[serde(default)]
    pub price_usd: Option<BigDecimal>,
}

/// A lookup of cached token balances
#[async_trait]
pub trait TokenBalances: Send + Sync {
    /// Get the cached balance of the token at the given address
    async fn get_token_balance(
        &self,
        address: &Address,
    ) -> Result<Option<TokenBalance>, SwapSubmitterError>;
}

/// An in-memory token balance cache, keyed by token address
#[derive(Clone, Debug, Default)]
pub struct TokenBalanceCache {
    /// The cached balances
    by_address: HashMap<Address, TokenBalance>,
}

impl TokenBalanceCache {
    /// Build a cache from a list of balances
    pub fn new(balances: Vec<TokenBalance>) -> Self {
        let by_address = balances.into_iter().map(|b| (b.address, b)).collect();
        Self { by_address }
    }

    /// Load a cache from a JSON file holding an array of balances
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SwapSubmitterError> {
        let json_str = read_to_string(path.as_ref()).await.map_err(SwapSubmitterError::config)?;
        Self::from_json(&json_str)
    }

    /// Parse a cache from a JSON array of balances
    pub fn from_json(json_str: &str) -> Result<Self, SwapSubmitterError> {
        let balances: Vec<TokenBalance> = serde_json::from_str(json_str)?;
        Ok(Self::new(balances))
    }

    /// The number of cached tokens
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

#[async_trait]
impl TokenBalances for TokenBalanceCache {
    async fn get_token_balance(
        &self,
        address: &Address,
    ) -> Result<Option<TokenBalance>, SwapSubmitterError> {
        Ok(self.by_address.get(address).cloned())
    }
}
