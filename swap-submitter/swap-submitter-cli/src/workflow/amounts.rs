//! Exact decimal conversions between token atoms and whole units

use std::str::FromStr;

use alloy_primitives::U256;
use bigdecimal::{num_bigint::BigInt, BigDecimal, ToPrimitive};

use crate::error::SwapSubmitterError;

/// Convert an amount in atoms to whole units of a token with the given
/// decimals
pub fn atoms_to_decimal(atoms: U256, decimals: u32) -> Result<BigDecimal, SwapSubmitterError> {
    let digits = BigInt::from_str(&atoms.to_string()).map_err(SwapSubmitterError::parse)?;
    Ok(BigDecimal::new(digits, i64::from(decimals)))
}

/// Convert an amount in whole units to atoms of a token with the given
/// decimals, truncating any sub-atom remainder
pub fn decimal_to_atoms(value: &BigDecimal, decimals: u32) -> BigInt {
    let scaled = value * BigDecimal::new(BigInt::from(1), -i64::from(decimals));
    let (digits, _) = scaled.with_scale(0).into_bigint_and_exponent();
    digits
}

/// The USD value of an amount of a token, if the token is priced
pub fn usd_value(amount: &BigDecimal, price_usd: Option<&BigDecimal>) -> Option<f64> {
    price_usd.and_then(|price| (amount * price).to_f64())
}
