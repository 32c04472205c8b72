//! The standby ledger, which holds optimistic swap records until they are
//! reconciled with an on-chain receipt.
//!
//! The swap workflow never writes here directly; it returns `LedgerUpdate`s
//! that the caller applies.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use swap_submitter_api::transactions::{LedgerUpdate, StandbyTransaction, TransactionReceipt};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::SwapSubmitterError;

/// A ledger entry, together with its reconciliation state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The standby record
    pub transaction: StandbyTransaction,
    /// The receipt, once the transaction is confirmed
    pub receipt: Option<TransactionReceipt>,
}

impl LedgerEntry {
    /// Whether the entry is still awaiting confirmation
    pub fn is_pending(&self) -> bool {
        self.receipt.is_none()
    }
}

/// A thread-safe store of standby transactions
#[derive(Clone, Default)]
pub struct StandbyLedger {
    /// The entries, keyed by transaction context id
    by_id: Arc<DashMap<Uuid, LedgerEntry>>,
}

impl StandbyLedger {
    /// Creates a new, empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // --------------
    // | Public API |
    // --------------

    /// Apply a single update to the ledger
    pub fn apply(&self, update: &LedgerUpdate) -> Result<(), SwapSubmitterError> {
        match update {
            LedgerUpdate::AddStandby { transaction } => self.add_standby(transaction),
            LedgerUpdate::Confirmed { context_id, receipt } => self.confirm(context_id, receipt),
            LedgerUpdate::RemoveStandby { context_id } => self.remove(context_id),
        }
    }

    /// Apply a sequence of updates in order, stopping at the first failure
    pub fn apply_all<'a, I>(&self, updates: I) -> Result<(), SwapSubmitterError>
    where
        I: IntoIterator<Item = &'a LedgerUpdate>,
    {
        updates.into_iter().try_for_each(|update| self.apply(update))
    }

    /// Apply a submission's updates, logging rather than returning a failure
    ///
    /// Returns whether every update applied
    pub fn reconcile(&self, updates: &[LedgerUpdate]) -> bool {
        match self.apply_all(updates) {
            Ok(()) => true,
            Err(e) => {
                error!("failed to reconcile standby ledger: {e}");
                false
            },
        }
    }

    /// Get the entry for the given context id
    pub fn get(&self, context_id: &Uuid) -> Option<LedgerEntry> {
        self.by_id.get(context_id).map(|entry| entry.clone())
    }

    /// Get all entries still awaiting confirmation
    pub fn pending(&self) -> Vec<LedgerEntry> {
        self.by_id.iter().filter(|e| e.is_pending()).map(|e| e.value().clone()).collect()
    }

    /// Get all confirmed entries
    pub fn confirmed(&self) -> Vec<LedgerEntry> {
        self.by_id.iter().filter(|e| !e.is_pending()).map(|e| e.value().clone()).collect()
    }

    /// The number of entries in the ledger
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the ledger is empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // -----------
    // | Helpers |
    // -----------

    /// Insert a new standby record, rejecting a duplicate context id
    fn add_standby(&self, transaction: &StandbyTransaction) -> Result<(), SwapSubmitterError> {
        let id = transaction.context.id;
        match self.by_id.entry(id) {
            Entry::Occupied(_) => {
                Err(SwapSubmitterError::ledger(format!("standby record {id} already exists")))
            },
            Entry::Vacant(slot) => {
                info!("adding standby transaction {id} ({:#x})", transaction.transaction_hash);
                slot.insert(LedgerEntry { transaction: transaction.clone(), receipt: None });
                Ok(())
            },
        }
    }

    /// Reconcile a standby record with its receipt
    fn confirm(
        &self,
        context_id: &Uuid,
        receipt: &TransactionReceipt,
    ) -> Result<(), SwapSubmitterError> {
        let mut entry = self.by_id.get_mut(context_id).ok_or_else(|| {
            SwapSubmitterError::ledger(format!("no standby record for {context_id}"))
        })?;

        if entry.transaction.transaction_hash != receipt.transaction_hash {
            return Err(SwapSubmitterError::ledger(format!(
                "receipt hash {:#x} does not match standby record {context_id}",
                receipt.transaction_hash
            )));
        }

        info!(
            "confirmed standby transaction {context_id} in block {} (status: {})",
            receipt.block, receipt.status
        );
        entry.receipt = Some(receipt.clone());
        Ok(())
    }

    /// Drop a standby record
    fn remove(&self, context_id: &Uuid) -> Result<(), SwapSubmitterError> {
        if self.by_id.remove(context_id).is_none() {
            return Err(SwapSubmitterError::ledger(format!("no standby record for {context_id}")));
        }

        info!("removed standby transaction {context_id}");
        Ok(())
    }
}
