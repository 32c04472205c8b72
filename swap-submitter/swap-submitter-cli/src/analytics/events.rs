//! Property sets carried by swap analytics events

use alloy_primitives::Address;
use serde::Serialize;
use uuid::Uuid;

/// The properties of a swap execution event, reported on both success and
/// error
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapExecutionProperties {
    /// The error that ended the swap, for error events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The address of the token being bought
    pub to_token: Address,
    /// The address of the token being sold
    pub from_token: Address,
    /// The amount the user entered, in atoms
    pub amount: String,
    /// Which side of the swap `amount` refers to
    pub amount_type: &'static str,
    /// The quoted price
    pub price: String,
    /// The contract allowed to spend the sell token
    pub allowance_target: Address,
    /// The provider's price impact estimate
    pub estimated_price_impact: Option<String>,
    /// The quote provider
    pub provider: String,
    /// The cached balance of the sell token, in atoms
    pub from_token_balance: Option<String>,
    /// The context id of the approval transaction
    pub swap_approve_tx_id: Uuid,
    /// The context id of the swap transaction
    pub swap_execute_tx_id: Uuid,
    /// Milliseconds from quote receipt to the user confirming the swap
    pub quote_to_user_confirms_swap_elapsed_time_in_ms: i64,
    /// Milliseconds from quote receipt to sending the swap, if it was sent
    pub quote_to_transaction_elapsed_time_in_ms: Option<i64>,
    /// The USD value of the quoted buy amount
    pub estimated_buy_token_usd_value: Option<f64>,
    /// The USD value of the sell amount
    pub estimated_sell_token_usd_value: Option<f64>,
}

/// The properties of a price change event
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeProperties {
    /// The quoted price
    pub price: String,
    /// The price guaranteed by the provider
    pub guaranteed_price: String,
    /// The address of the token being bought
    pub to_token: Address,
    /// The address of the token being sold
    pub from_token: Address,
}
