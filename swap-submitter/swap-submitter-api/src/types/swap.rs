//! API types for swap submission
use alloy_primitives::{Address, Bytes, U256};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::serialization::{option_u256_string_serialization, u256_string_serialization};

// -------------
// | Constants |
// -------------

/// The allowance target a quote provider reports when the sell token is the
/// chain's native asset, in which case no approval is needed
pub const NATIVE_ALLOWANCE_TARGET: Address = Address::ZERO;

/// The amount type reported when the user last edited the buy amount
pub const BUY_AMOUNT_TYPE: &str = "buyAmount";
/// The amount type reported when the user last edited the sell amount
pub const SELL_AMOUNT_TYPE: &str = "sellAmount";

// -------------
// | Api Types |
// -------------

/// The amount field the user last edited when requesting a quote
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Field {
    /// The sell side of the swap
    From,
    /// The buy side of the swap
    To,
}

/// The user's input that produced the quote
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// The field the user last edited
    pub updated_field: Field,
    /// The address of the token being sold
    pub from_token: Address,
    /// The address of the token being bought
    pub to_token: Address,
}

/// A pre-built transaction supplied by the quote provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    /// The submitting address
    pub from: Address,
    /// The contract the transaction is sent to
    pub to: Address,
    /// The calldata
    pub data: Bytes,
    /// The native value attached to the transaction
    #[serde(default, with = "u256_string_serialization")]
    pub value: U256,
    /// The gas limit, if the provider estimated one
    #[serde(default, with = "option_u256_string_serialization")]
    pub gas: Option<U256>,
    /// The gas price, if the provider set one
    #[serde(default, with = "option_u256_string_serialization")]
    pub gas_price: Option<U256>,
    /// The chain id the transaction is built for
    #[serde(default)]
    pub chain_id: Option<u64>,
}

/// The quoted swap transaction, as returned by the quote provider
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransaction {
    /// The quoted amount of the buy token, in atoms
    #[serde(with = "u256_string_serialization")]
    pub buy_amount: U256,
    /// The amount of the sell token, in atoms
    #[serde(with = "u256_string_serialization")]
    pub sell_amount: U256,
    /// The address of the token being bought
    pub buy_token_address: Address,
    /// The address of the token being sold
    pub sell_token_address: Address,
    /// The quoted price, in buy token per sell token
    pub price: BigDecimal,
    /// The worst price the provider guarantees after slippage
    pub guaranteed_price: BigDecimal,
    /// The contract allowed to spend the sell token, or
    /// `NATIVE_ALLOWANCE_TARGET` for the native asset
    pub allowance_target: Address,
    /// The provider's estimate of the price impact of the swap
    #[serde(default)]
    pub estimated_price_impact: Option<BigDecimal>,
    /// The swap transaction to submit
    #[serde(flatten)]
    pub payload: TransactionPayload,
}

impl SwapTransaction {
    /// Whether the sell token is the native asset, which needs no approval
    pub fn is_native_sell(&self) -> bool {
        self.allowance_target == NATIVE_ALLOWANCE_TARGET
    }

    /// The amount reported for the given edited field, along with its type
    pub fn amount_for(&self, field: Field) -> (U256, &'static str) {
        match field {
            Field::To => (self.buy_amount, BUY_AMOUNT_TYPE),
            Field::From => (self.sell_amount, SELL_AMOUNT_TYPE),
        }
    }
}

/// Details about the quote's origin
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapDetails {
    /// The identifier of the quote provider
    pub swap_provider: String,
}

/// A quoted swap submitted by the user
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    /// The approval transaction for the sell token, absent when the sell
    /// token is native
    #[serde(default)]
    pub approve_transaction: Option<TransactionPayload>,
    /// The user input that produced the quote
    pub user_input: UserInput,
    /// The quoted swap, not yet checked against the guaranteed price
    #[serde(alias = "unvalidatedSwapTransaction")]
    pub swap_transaction: SwapTransaction,
    /// Details about the quote's origin
    pub details: SwapDetails,
    /// The time at which the quote was received, in milliseconds since the
    /// UNIX epoch
    pub quote_received_at: u64,
}

/// The status transitions a swap submission moves through
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapStatus {
    /// The approval transaction is being submitted
    Approving,
    /// The swap transaction is being submitted
    Executing,
    /// The swap was confirmed on-chain
    Complete,
    /// The submission failed
    Error,
    /// The quoted price went stale before submission
    PriceChanged,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use alloy_primitives::{Address, U256};
    use bigdecimal::BigDecimal;

    use super::*;

    /// A swap payload in the shape quote providers hand to the submitter
    const SWAP_JSON: &str = r#"{
        "approveTransaction": {
            "from": "0x0000000000000000000000000000000000007e57",
            "to": "0x0000000000000000000000000000000000000abc",
            "data": "0x00",
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
            "from": "0x078e54ad49b0865fff9086fd084b92b3dac0857d",
            "to": "0xdef1c0ded9bec7f1a1670819833240f027b25eff",
            "data": "0x",
            "gas": "460533",
            "allowanceTarget": "0xdef1c0ded9bec7f1a1670819833240f027b25eff",
            "estimatedPriceImpact": "0.1"
        },
        "details": { "swapProvider": "0x" },
        "quoteReceivedAt": 1000000000000
    }"#;

    /// Tests parsing a provider-shaped swap payload
    #[test]
    fn test_parse_swap_info() {
        let swap: SwapInfo = serde_json::from_str(SWAP_JSON).unwrap();

        let tx = &swap.swap_transaction;
        assert_eq!(tx.sell_amount, U256::from(10_000_000_000_000_000u64));
        assert_eq!(tx.guaranteed_price, BigDecimal::from_str("1.02").unwrap());
        assert_eq!(tx.payload.gas, Some(U256::from(460_533u64)));
        assert_eq!(tx.payload.value, U256::ZERO);
        assert_eq!(tx.estimated_price_impact, Some(BigDecimal::from_str("0.1").unwrap()));
        assert!(!tx.is_native_sell());

        let approval = swap.approve_transaction.as_ref().unwrap();
        assert_eq!(approval.chain_id, Some(42220));
        assert_eq!(approval.gas_price, None);

        assert_eq!(swap.user_input.updated_field, Field::To);
        assert_eq!(swap.details.swap_provider, "0x");
        assert_eq!(swap.quote_received_at, 1_000_000_000_000);
    }

    /// Tests the amount reported for each edited field
    #[test]
    fn test_amount_for_field() {
        let mut swap: SwapInfo = serde_json::from_str(SWAP_JSON).unwrap();
        swap.swap_transaction.sell_amount = U256::from(7u8);
        swap.swap_transaction.buy_amount = U256::from(9u8);

        let tx = &swap.swap_transaction;
        assert_eq!(tx.amount_for(Field::To), (U256::from(9u8), BUY_AMOUNT_TYPE));
        assert_eq!(tx.amount_for(Field::From), (U256::from(7u8), SELL_AMOUNT_TYPE));
    }

    /// Tests that the zero allowance target marks a native sell token
    #[test]
    fn test_native_sell_detection() {
        let mut swap: SwapInfo = serde_json::from_str(SWAP_JSON).unwrap();
        swap.swap_transaction.allowance_target = Address::ZERO;
        assert!(swap.swap_transaction.is_native_sell());
    }
}
