//! Staleness checks on a quote's guaranteed price

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use tracing::warn;

use crate::error::SwapSubmitterError;

/// The default maximum allowable deviation of the guaranteed price from the
/// quoted price
pub const DEFAULT_MAX_PRICE_DEVIATION: &str = "0.02"; // 2%

/// The default maximum price deviation as a decimal
pub fn default_max_price_deviation() -> BigDecimal {
    BigDecimal::from_str(DEFAULT_MAX_PRICE_DEVIATION).unwrap_or_else(|_| BigDecimal::zero())
}

/// Check whether the guaranteed price deviates from the quoted price by more
/// than the given fraction of the quoted price
///
/// Errors if the quoted price is not positive
pub fn exceeds_price_deviation(
    price: &BigDecimal,
    guaranteed_price: &BigDecimal,
    max_deviation: &BigDecimal,
) -> Result<bool, SwapSubmitterError> {
    if price <= &BigDecimal::zero() {
        return Err(SwapSubmitterError::validation(format!("invalid quoted price: {price}")));
    }

    let deviation = (guaranteed_price - price).abs();
    let threshold = price * max_deviation;

    let exceeds = deviation > threshold;
    if exceeds {
        warn!(%price, %guaranteed_price, %deviation, %threshold, "guaranteed price deviates from quote");
    }

    Ok(exceeds)
}
