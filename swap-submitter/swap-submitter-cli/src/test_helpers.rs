//! Mock collaborators for exercising the swap workflow without a chain

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use swap_submitter_api::{
    swap::{SwapInfo, TransactionPayload},
    transactions::{TransactionContext, TransactionReceipt},
};
use tokio::sync::Mutex as TokioMutex;

use crate::{
    analytics::{AnalyticsEvent, AnalyticsSink, SwapEvent},
    clock::Clock,
    error::SwapSubmitterError,
    tokens::{TokenBalance, TokenBalanceCache, TokenBalances},
    transaction_client::TransactionSender,
};

/// The block every mock receipt lands in
pub const MOCK_BLOCK: u64 = 1234;

/// A swap of 0.01 cEUR for CELO at a guaranteed price of 1.02
pub const SWAP_JSON: &str = r#"{
    "approveTransaction": {
        "from": "0x0000000000000000000000000000000000007e57",
        "to": "0x10c892a6ec43a53e45d0b916b4b7d383b1b78c0f",
        "data": "0x095ea7b3",
        "gas": "59480",
        "chainId": 42220
    },
    "userInput": {
        "updatedField": "TO",
        "fromToken": "0x10c892a6ec43a53e45d0b916b4b7d383b1b78c0f",
        "toToken": "0xf194afdf50b03e69bd7d057c1aa9e10c9954e4c9"
    },
    "unvalidatedSwapTransaction": {
        "buyAmount": "10000000000000000",
        "sellAmount": "10000000000000000",
        "buyTokenAddress": "0xf194afdf50b03e69bd7d057c1aa9e10c9954e4c9",
        "sellTokenAddress": "0x10c892a6ec43a53e45d0b916b4b7d383b1b78c0f",
        "price": "1",
        "guaranteedPrice": "1.02",
        "from": "0x0000000000000000000000000000000000007e57",
        "to": "0xdef1c0ded9bec7f1a1670819833240f027b25eff",
        "data": "0x0123",
        "gas": "460533",
        "allowanceTarget": "0xdef1c0ded9bec7f1a1670819833240f027b25eff",
        "estimatedPriceImpact": "0.1"
    },
    "details": { "swapProvider": "0x" },
    "quoteReceivedAt": 1000000000000
}"#;

/// Cached balances for the tokens in `SWAP_JSON`
pub const TOKENS_JSON: &str = r#"[
    {
        "tokenId": "celo-alfajores:0x10c892a6ec43a53e45d0b916b4b7d383b1b78c0f",
        "address": "0x10c892a6ec43a53e45d0b916b4b7d383b1b78c0f",
        "symbol": "cEUR",
        "decimals": 18,
        "balance": "10",
        "priceUsd": "1"
    },
    {
        "tokenId": "celo-alfajores:native",
        "address": "0xf194afdf50b03e69bd7d057c1aa9e10c9954e4c9",
        "symbol": "CELO",
        "decimals": 18,
        "balance": "5",
        "priceUsd": "0.5"
    }
]"#;

/// Parse the swap fixture
pub fn mock_swap() -> SwapInfo {
    serde_json::from_str(SWAP_JSON).unwrap()
}

/// The swap fixture, selling the native asset instead
pub fn mock_native_swap() -> SwapInfo {
    let mut swap = mock_swap();
    swap.approve_transaction = None;
    swap.swap_transaction.allowance_target = Address::ZERO;
    swap
}

/// Parse the token balance fixture
pub fn mock_tokens() -> TokenBalanceCache {
    TokenBalanceCache::from_json(TOKENS_JSON).unwrap()
}

/// The hash the mock sender assigns to the nth transaction sent, from one
pub fn mock_tx_hash(n: usize) -> TxHash {
    TxHash::with_last_byte(n as u8)
}

// ---------------
// | Mock Sender |
// ---------------

/// The scripted behavior of the mock sender
#[derive(Default)]
struct SenderScript {
    /// Sends that should fail, keyed by the one-based call number
    send_failures: HashMap<usize, String>,
    /// Receipt waits that should fail, keyed by the one-based call number
    receipt_failures: HashMap<usize, String>,
    /// Receipt waits that should report a revert
    reverts: Vec<usize>,
}

/// A transaction sender that records every call and follows a script
#[derive(Default)]
pub struct MockTransactionSender {
    /// The behavior to follow
    script: TokioMutex<SenderScript>,
    /// The payloads and contexts of every send, in order
    sent: TokioMutex<Vec<(TransactionPayload, TransactionContext)>>,
    /// The hashes of every receipt wait, in order
    awaited: TokioMutex<Vec<TxHash>>,
}

impl MockTransactionSender {
    /// Create a sender where every call succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the nth send
    pub async fn fail_send(&self, n: usize, msg: &str) {
        self.script.lock().await.send_failures.insert(n, msg.to_string());
    }

    /// Fail the nth receipt wait
    pub async fn fail_receipt(&self, n: usize, msg: &str) {
        self.script.lock().await.receipt_failures.insert(n, msg.to_string());
    }

    /// Report the nth receipt as reverted
    pub async fn revert_receipt(&self, n: usize) {
        self.script.lock().await.reverts.push(n);
    }

    /// The payloads and contexts sent so far
    pub async fn sent(&self) -> Vec<(TransactionPayload, TransactionContext)> {
        self.sent.lock().await.clone()
    }

    /// The hashes awaited so far
    pub async fn awaited(&self) -> Vec<TxHash> {
        self.awaited.lock().await.clone()
    }
}

#[async_trait]
impl TransactionSender for MockTransactionSender {
    async fn send_transaction(
        &self,
        payload: &TransactionPayload,
        context: &TransactionContext,
    ) -> Result<TxHash, SwapSubmitterError> {
        let mut sent = self.sent.lock().await;
        sent.push((payload.clone(), context.clone()));
        let n = sent.len();

        match self.script.lock().await.send_failures.get(&n) {
            Some(msg) => Err(SwapSubmitterError::onchain(msg)),
            None => Ok(mock_tx_hash(n)),
        }
    }

    async fn await_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<TransactionReceipt, SwapSubmitterError> {
        let mut awaited = self.awaited.lock().await;
        awaited.push(tx_hash);
        let n = awaited.len();

        let script = self.script.lock().await;
        if let Some(msg) = script.receipt_failures.get(&n) {
            return Err(SwapSubmitterError::onchain(msg));
        }

        let status = !script.reverts.contains(&n);
        Ok(TransactionReceipt { transaction_hash: tx_hash, block: MOCK_BLOCK, status })
    }
}

// ---------------
// | Mock Tokens |
// ---------------

/// A token lookup whose every call fails
pub struct FailingTokenBalances;

#[async_trait]
impl TokenBalances for FailingTokenBalances {
    async fn get_token_balance(
        &self,
        _address: &Address,
    ) -> Result<Option<TokenBalance>, SwapSubmitterError> {
        Err(SwapSubmitterError::token("cache unavailable"))
    }
}

// ------------------
// | Recording Sink |
// ------------------

/// An analytics sink that keeps every event
#[derive(Default)]
pub struct RecordingAnalyticsSink {
    /// The events tracked so far
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalyticsSink {
    /// The events tracked so far
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The single event tracked, asserting its name
    pub fn only_event(&self, name: SwapEvent) -> AnalyticsEvent {
        let events = self.events();
        assert_eq!(events.len(), 1, "expected exactly one event, got {events:?}");
        assert_eq!(events[0].name, name);
        events[0].clone()
    }
}

impl AnalyticsSink for RecordingAnalyticsSink {
    fn track(&self, event: AnalyticsEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// --------------
// | Mock Clock |
// --------------

/// A clock that returns queued readings, then a fixed fallback
pub struct MockClock {
    /// The readings to return first, in order
    readings: Mutex<VecDeque<u64>>,
    /// The reading once the queue is drained
    fallback: u64,
}

impl MockClock {
    /// Create a clock with the given queued readings and fallback
    pub fn new(readings: &[u64], fallback: u64) -> Arc<Self> {
        Arc::new(Self { readings: Mutex::new(readings.iter().copied().collect()), fallback })
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> u64 {
        self.readings.lock().unwrap().pop_front().unwrap_or(self.fallback)
    }
}
