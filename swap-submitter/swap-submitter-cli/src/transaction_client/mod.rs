//! Client for sending pre-built transactions on-chain and awaiting their
//! receipts

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use alloy_primitives::TxHash;
use async_trait::async_trait;
use swap_submitter_api::{
    swap::TransactionPayload,
    transactions::{TransactionContext, TransactionReceipt},
    u256_try_into_u128, u256_try_into_u64,
};
use tracing::{info, instrument};

use crate::error::SwapSubmitterError;

// -------------
// | Constants |
// -------------

/// The default number of confirmations to wait for
pub const ONE_CONFIRMATION: u64 = 1;
/// The default bound on how long to wait for a receipt, in seconds
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

// ---------
// | Trait |
// ---------

/// A service that submits transactions and reports their on-chain result
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Send a transaction, returning its hash once the node accepts it
    async fn send_transaction(
        &self,
        payload: &TransactionPayload,
        context: &TransactionContext,
    ) -> Result<TxHash, SwapSubmitterError>;

    /// Wait for a sent transaction to be included, returning its receipt
    async fn await_receipt(&self, tx_hash: TxHash)
        -> Result<TransactionReceipt, SwapSubmitterError>;
}

// --------------
// | RPC Sender |
// --------------

/// A transaction sender backed by a JSON-RPC provider with a local signer
#[derive(Clone)]
pub struct RpcTransactionSender {
    /// The signing RPC provider
    provider: DynProvider,
    /// The number of confirmations to wait for
    confirmations: u64,
    /// The bound on how long to wait for a receipt
    receipt_timeout: Duration,
}

impl RpcTransactionSender {
    /// Create a new sender for the given RPC url and signer
    pub fn new(
        rpc_url: &str,
        signer: PrivateKeySigner,
        confirmations: u64,
        receipt_timeout: Duration,
    ) -> Result<Self, SwapSubmitterError> {
        let url = rpc_url.parse().map_err(SwapSubmitterError::config)?;
        let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

        Ok(Self { provider: DynProvider::new(provider), confirmations, receipt_timeout })
    }

    /// Construct a transaction request from a pre-built payload
    fn build_tx(payload: &TransactionPayload) -> Result<TransactionRequest, SwapSubmitterError> {
        let mut tx = TransactionRequest::default()
            .with_to(payload.to)
            .with_from(payload.from)
            .with_value(payload.value)
            .with_input(payload.data.clone());

        if let Some(gas) = payload.gas {
            let gas_limit = u256_try_into_u64(gas).map_err(SwapSubmitterError::parse)?;
            tx = tx.with_gas_limit(gas_limit);
        }

        if let Some(gas_price) = payload.gas_price {
            let gas_price = u256_try_into_u128(gas_price).map_err(SwapSubmitterError::parse)?;
            tx = tx.with_gas_price(gas_price);
        }

        if let Some(chain_id) = payload.chain_id {
            tx = tx.with_chain_id(chain_id);
        }

        Ok(tx)
    }
}

#[async_trait]
impl TransactionSender for RpcTransactionSender {
    #[instrument(skip_all, fields(context = %context.id, description = %context.description))]
    async fn send_transaction(
        &self,
        payload: &TransactionPayload,
        context: &TransactionContext,
    ) -> Result<TxHash, SwapSubmitterError> {
        let tx = Self::build_tx(payload)?;
        let pending =
            self.provider.send_transaction(tx).await.map_err(SwapSubmitterError::onchain)?;

        let tx_hash = *pending.tx_hash();
        info!("sent transaction {tx_hash:#x}");
        Ok(tx_hash)
    }

    #[instrument(skip(self))]
    async fn await_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<TransactionReceipt, SwapSubmitterError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(SwapSubmitterError::onchain)?;

        let block = receipt
            .block_number
            .ok_or_else(|| SwapSubmitterError::onchain("receipt has no block number"))?;

        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash,
            block,
            status: receipt.status(),
        })
    }
}
