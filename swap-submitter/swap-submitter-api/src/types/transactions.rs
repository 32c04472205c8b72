//! API types for standby transactions and their reconciliation
use alloy_primitives::TxHash;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An amount of a token, in whole units
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    /// The decimal-corrected amount
    pub value: BigDecimal,
    /// The identifier of the token
    pub token_id: String,
}

/// The kinds of token transactions the submitter records
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenTransactionType {
    /// An exchange of one token for another
    SwapTransaction,
}

/// Identifies a single submitted transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    /// The unique id of the transaction
    pub id: Uuid,
    /// The component that submitted the transaction
    pub tag: String,
    /// A human-readable description of the transaction
    pub description: String,
}

impl TransactionContext {
    /// Create a context with a fresh id
    pub fn new(tag: &str, description: &str) -> Self {
        Self { id: Uuid::new_v4(), tag: tag.to_string(), description: description.to_string() }
    }
}

/// An optimistic ledger entry for a swap that has been sent but not yet
/// confirmed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandbyTransaction {
    /// The context of the swap transaction
    pub context: TransactionContext,
    /// The type of the transaction
    #[serde(rename = "type")]
    pub transaction_type: TokenTransactionType,
    /// The hash of the sent transaction
    pub transaction_hash: TxHash,
    /// The amount received by the wallet
    pub in_amount: TokenAmount,
    /// The amount sent by the wallet
    pub out_amount: TokenAmount,
    /// The time the transaction was sent, in milliseconds since the UNIX
    /// epoch
    pub timestamp: u64,
}

/// The on-chain result of a transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// The hash of the transaction
    pub transaction_hash: TxHash,
    /// The block in which the transaction was included
    pub block: u64,
    /// Whether the transaction succeeded
    pub status: bool,
}

/// A change to the standby ledger, produced by a swap submission and applied
/// by the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum LedgerUpdate {
    /// Record a sent, unconfirmed transaction
    AddStandby {
        /// The standby record
        transaction: StandbyTransaction,
    },
    /// Reconcile a standby record with its receipt
    #[serde(rename_all = "camelCase")]
    Confirmed {
        /// The context id of the standby record
        context_id: Uuid,
        /// The on-chain receipt
        receipt: TransactionReceipt,
    },
    /// Drop a standby record whose transaction never confirmed
    #[serde(rename_all = "camelCase")]
    RemoveStandby {
        /// The context id of the standby record
        context_id: Uuid,
    },
}

impl LedgerUpdate {
    /// The context id of the record the update applies to
    pub fn context_id(&self) -> Uuid {
        match self {
            LedgerUpdate::AddStandby { transaction } => transaction.context.id,
            LedgerUpdate::Confirmed { context_id, .. }
            | LedgerUpdate::RemoveStandby { context_id } => *context_id,
        }
    }
}
