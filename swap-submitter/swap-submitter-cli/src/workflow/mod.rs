//! The swap submission workflow
//!
//! A submission runs strictly in sequence:
//! 1. Check the guaranteed price against the quoted price. A stale quote ends
//!    the submission before any transaction is sent.
//! 2. If the sell token is not native, send the approval transaction and wait
//!    for it to confirm.
//! 3. Send the swap transaction and record a standby ledger entry for it.
//! 4. Wait for the swap to confirm and reconcile the standby entry.
//!
//! Every submission ends in exactly one `SwapOutcome` and emits exactly one
//! analytics event. Failures are never retried here; the caller decides
//! whether to re-quote.

use std::sync::Arc;

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use serde::Serialize;
use swap_submitter_api::{
    swap::{SwapInfo, SwapStatus, TransactionPayload},
    transactions::{
        LedgerUpdate, StandbyTransaction, TokenAmount, TokenTransactionType, TransactionContext,
        TransactionReceipt,
    },
};
use tracing::{error, info, instrument};

use crate::{
    analytics::{
        events::{PriceChangeProperties, SwapExecutionProperties},
        AnalyticsEvent, AnalyticsSink, SwapEvent,
    },
    clock::Clock,
    error::SwapSubmitterError,
    tokens::{TokenBalance, TokenBalances},
    transaction_client::TransactionSender,
};

use self::{
    amounts::{atoms_to_decimal, decimal_to_atoms, usd_value},
    price::{default_max_price_deviation, exceeds_price_deviation},
};

pub mod amounts;
pub mod price;

// -------------
// | Constants |
// -------------

/// The tag attached to transactions sent by the workflow
pub const SWAP_TRANSACTION_TAG: &str = "swap/submit";
/// The description of an approval transaction
const APPROVE_DESCRIPTION: &str = "Swap/Approve";
/// The description of a swap transaction
const EXECUTE_DESCRIPTION: &str = "Swap/Execute";

// ---------
// | Types |
// ---------

/// Tunables for the swap workflow
#[derive(Clone, Debug)]
pub struct SubmitterConfig {
    /// The maximum deviation of the guaranteed price from the quoted price, as
    /// a fraction of the quoted price
    pub max_price_deviation: BigDecimal,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self { max_price_deviation: default_max_price_deviation() }
    }
}

/// The terminal outcome of a swap submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SwapOutcome {
    /// The swap was executed and confirmed on-chain
    Confirmed {
        /// Whether an approval was sent before the swap
        approved: bool,
        /// The swap receipt
        receipt: TransactionReceipt,
    },
    /// The approval confirmed but the swap failed
    #[serde(rename_all = "camelCase")]
    ApprovedThenFailed {
        /// The error that ended the swap
        error: String,
    },
    /// The quote went stale, nothing was sent
    #[serde(rename_all = "camelCase")]
    PriceChanged {
        /// The quoted price
        price: BigDecimal,
        /// The price guaranteed by the provider
        guaranteed_price: BigDecimal,
    },
    /// The swap failed before any approval confirmed
    Failed {
        /// The error that ended the swap
        error: String,
    },
}

impl SwapOutcome {
    /// Whether the swap was confirmed
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SwapOutcome::Confirmed { .. })
    }
}

/// Everything a submission produced, for the caller to act on
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapReport {
    /// The terminal outcome
    pub outcome: SwapOutcome,
    /// The status transitions, in order
    pub transitions: Vec<SwapStatus>,
    /// The ledger updates to apply, in order
    pub ledger_updates: Vec<LedgerUpdate>,
}

/// The mutable state of a single submission
struct SwapAttempt<'a> {
    /// The swap being submitted
    swap: &'a SwapInfo,
    /// The context of the approval transaction
    approve_context: TransactionContext,
    /// The context of the swap transaction
    execute_context: TransactionContext,
    /// When the user confirmed the swap
    submitted_at: u64,
    /// When the swap transaction was sent, if it was
    sent_at: Option<u64>,
    /// Whether the approval confirmed
    approved: bool,
    /// The cached sell token, once resolved
    sell_token: Option<TokenBalance>,
    /// The cached buy token, once resolved
    buy_token: Option<TokenBalance>,
    /// The status transitions so far
    transitions: Vec<SwapStatus>,
    /// The ledger updates so far
    ledger_updates: Vec<LedgerUpdate>,
}

impl<'a> SwapAttempt<'a> {
    /// Start a new attempt
    fn new(swap: &'a SwapInfo, submitted_at: u64) -> Self {
        Self {
            swap,
            approve_context: TransactionContext::new(SWAP_TRANSACTION_TAG, APPROVE_DESCRIPTION),
            execute_context: TransactionContext::new(SWAP_TRANSACTION_TAG, EXECUTE_DESCRIPTION),
            submitted_at,
            sent_at: None,
            approved: false,
            sell_token: None,
            buy_token: None,
            transitions: Vec::new(),
            ledger_updates: Vec::new(),
        }
    }

    /// Finish the attempt with the given outcome
    fn into_report(self, outcome: SwapOutcome) -> SwapReport {
        SwapReport { outcome, transitions: self.transitions, ledger_updates: self.ledger_updates }
    }
}

// ------------------
// | Swap Submitter |
// ------------------

/// Submits quoted swaps on-chain
#[derive(Clone)]
pub struct SwapSubmitter {
    /// The service sending transactions
    sender: Arc<dyn TransactionSender>,
    /// The cached token balances
    tokens: Arc<dyn TokenBalances>,
    /// The sink for analytics events
    analytics: Arc<dyn AnalyticsSink>,
    /// The wall clock
    clock: Arc<dyn Clock>,
    /// The workflow tunables
    config: SubmitterConfig,
}

impl SwapSubmitter {
    /// Create a new submitter
    pub fn new(
        sender: Arc<dyn TransactionSender>,
        tokens: Arc<dyn TokenBalances>,
        analytics: Arc<dyn AnalyticsSink>,
        clock: Arc<dyn Clock>,
        config: SubmitterConfig,
    ) -> Self {
        Self { sender, tokens, analytics, clock, config }
    }

    /// Submit a quoted swap, returning its outcome along with the status
    /// transitions and ledger updates the caller should apply
    #[instrument(
        skip_all,
        fields(
            from_token = %swap.user_input.from_token,
            to_token = %swap.user_input.to_token,
            sell_amount = %swap.swap_transaction.sell_amount,
            provider = %swap.details.swap_provider,
        )
    )]
    pub async fn submit(&self, swap: &SwapInfo) -> SwapReport {
        let mut attempt = SwapAttempt::new(swap, self.clock.now_millis());

        let tx = &swap.swap_transaction;
        let stale =
            exceeds_price_deviation(&tx.price, &tx.guaranteed_price, &self.config.max_price_deviation);
        let result = match stale {
            Ok(true) => return self.price_changed(attempt),
            Ok(false) => self.execute(&mut attempt).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(receipt) => {
                info!("swap confirmed in block {} ({:#x})", receipt.block, receipt.transaction_hash);
                attempt.transitions.push(SwapStatus::Complete);
                self.track_execution(&attempt, SwapEvent::ExecuteSuccess, None);

                let outcome = SwapOutcome::Confirmed { approved: attempt.approved, receipt };
                attempt.into_report(outcome)
            },
            Err(e) => {
                error!("error while submitting swap: {e}");
                let error = e.to_string();
                attempt.transitions.push(SwapStatus::Error);
                let message = e.message().to_string();
                self.track_execution(&attempt, SwapEvent::ExecuteError, Some(message));

                let outcome = if attempt.approved {
                    SwapOutcome::ApprovedThenFailed { error }
                } else {
                    SwapOutcome::Failed { error }
                };
                attempt.into_report(outcome)
            },
        }
    }

    // -----------
    // | Helpers |
    // -----------

    /// Run the approval and swap, returning the swap's receipt
    async fn execute(
        &self,
        attempt: &mut SwapAttempt<'_>,
    ) -> Result<TransactionReceipt, SwapSubmitterError> {
        let swap = attempt.swap;
        let tx = &swap.swap_transaction;

        let sell_token = self.resolve_token(&tx.sell_token_address).await?;
        attempt.sell_token = Some(sell_token.clone());
        let buy_token = self.resolve_token(&tx.buy_token_address).await?;
        attempt.buy_token = Some(buy_token.clone());

        // The wallet receives `guaranteed_price` buy tokens per sell token
        let sell_amount = atoms_to_decimal(tx.sell_amount, sell_token.decimals)?;
        let in_amount = TokenAmount {
            value: &tx.guaranteed_price * &sell_amount,
            token_id: buy_token.token_id.clone(),
        };
        let out_amount = TokenAmount { value: sell_amount, token_id: sell_token.token_id.clone() };

        if !tx.is_native_sell() {
            let approval = swap.approve_transaction.as_ref().ok_or_else(|| {
                SwapSubmitterError::validation("non-native sell token but no approval transaction")
            })?;

            attempt.transitions.push(SwapStatus::Approving);
            self.approve(approval, &attempt.approve_context).await?;
            attempt.approved = true;
        }

        attempt.transitions.push(SwapStatus::Executing);
        let sent_at = self.clock.now_millis();
        attempt.sent_at = Some(sent_at);

        let context = attempt.execute_context.clone();
        let tx_hash = self.sender.send_transaction(&tx.payload, &context).await?;

        let context_id = context.id;
        let standby = StandbyTransaction {
            context,
            transaction_type: TokenTransactionType::SwapTransaction,
            transaction_hash: tx_hash,
            in_amount,
            out_amount,
            timestamp: sent_at,
        };
        attempt.ledger_updates.push(LedgerUpdate::AddStandby { transaction: standby });

        let receipt = match self.sender.await_receipt(tx_hash).await {
            Ok(receipt) => receipt,
            Err(e) => {
                attempt.ledger_updates.push(LedgerUpdate::RemoveStandby { context_id });
                return Err(e);
            },
        };

        attempt
            .ledger_updates
            .push(LedgerUpdate::Confirmed { context_id, receipt: receipt.clone() });

        if !receipt.status {
            return Err(SwapSubmitterError::onchain(format!(
                "swap transaction {tx_hash:#x} reverted"
            )));
        }

        Ok(receipt)
    }

    /// Send the approval transaction and wait for it to confirm
    async fn approve(
        &self,
        approval: &TransactionPayload,
        context: &TransactionContext,
    ) -> Result<(), SwapSubmitterError> {
        let tx_hash = self.sender.send_transaction(approval, context).await?;
        let receipt = self.sender.await_receipt(tx_hash).await?;
        if !receipt.status {
            return Err(SwapSubmitterError::onchain(format!(
                "approval transaction {tx_hash:#x} reverted"
            )));
        }

        info!("approved swap allowance at {tx_hash:#x}");
        Ok(())
    }

    /// Look up a token's cached balance, erroring if the token is unknown
    async fn resolve_token(&self, address: &Address) -> Result<TokenBalance, SwapSubmitterError> {
        self.tokens
            .get_token_balance(address)
            .await?
            .ok_or_else(|| SwapSubmitterError::token(format!("no cached balance for {address:#x}")))
    }

    /// End an attempt whose quote went stale
    fn price_changed(&self, mut attempt: SwapAttempt<'_>) -> SwapReport {
        let swap = attempt.swap;
        let tx = &swap.swap_transaction;

        attempt.transitions.push(SwapStatus::PriceChanged);
        let props = PriceChangeProperties {
            price: tx.price.to_string(),
            guaranteed_price: tx.guaranteed_price.to_string(),
            to_token: swap.user_input.to_token,
            from_token: swap.user_input.from_token,
        };
        self.analytics.track(AnalyticsEvent::new(SwapEvent::ExecutePriceChange, &props));

        let outcome = SwapOutcome::PriceChanged {
            price: tx.price.clone(),
            guaranteed_price: tx.guaranteed_price.clone(),
        };
        attempt.into_report(outcome)
    }

    /// Emit the success or error event for an attempt
    fn track_execution(&self, attempt: &SwapAttempt<'_>, event: SwapEvent, error: Option<String>) {
        let props = execution_properties(attempt, error);
        self.analytics.track(AnalyticsEvent::new(event, &props));
    }
}

/// Build the analytics properties summarizing an attempt
fn execution_properties(attempt: &SwapAttempt<'_>, error: Option<String>) -> SwapExecutionProperties {
    let swap = attempt.swap;
    let tx = &swap.swap_transaction;
    let (amount, amount_type) = tx.amount_for(swap.user_input.updated_field);

    let from_token_balance = attempt
        .sell_token
        .as_ref()
        .map(|token| decimal_to_atoms(&token.balance, token.decimals).to_string());
    let estimated_sell_token_usd_value = attempt.sell_token.as_ref().and_then(|token| {
        let amount = atoms_to_decimal(tx.sell_amount, token.decimals).ok()?;
        usd_value(&amount, token.price_usd.as_ref())
    });
    let estimated_buy_token_usd_value = attempt.buy_token.as_ref().and_then(|token| {
        let amount = atoms_to_decimal(tx.buy_amount, token.decimals).ok()?;
        usd_value(&amount, token.price_usd.as_ref())
    });

    SwapExecutionProperties {
        error,
        to_token: swap.user_input.to_token,
        from_token: swap.user_input.from_token,
        amount: amount.to_string(),
        amount_type,
        price: tx.price.to_string(),
        allowance_target: tx.allowance_target,
        estimated_price_impact: tx.estimated_price_impact.as_ref().map(ToString::to_string),
        provider: swap.details.swap_provider.clone(),
        from_token_balance,
        swap_approve_tx_id: attempt.approve_context.id,
        swap_execute_tx_id: attempt.execute_context.id,
        quote_to_user_confirms_swap_elapsed_time_in_ms: elapsed_millis(
            swap.quote_received_at,
            attempt.submitted_at,
        ),
        quote_to_transaction_elapsed_time_in_ms: attempt
            .sent_at
            .map(|sent_at| elapsed_millis(swap.quote_received_at, sent_at)),
        estimated_buy_token_usd_value,
        estimated_sell_token_usd_value,
    }
}

/// The signed milliseconds from `since` to `now`, negative if the clock reads
/// earlier than `since`
fn elapsed_millis(since: u64, now: u64) -> i64 {
    let elapsed = i128::from(now) - i128::from(since);
    i64::try_from(elapsed).unwrap_or(if elapsed < 0 { i64::MIN } else { i64::MAX })
}
