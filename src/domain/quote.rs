use crate::error::{GatewayError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The rate locked in when a transaction is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub amount_thb: Decimal,
    /// THB per USDT, fee included.
    pub rate: Decimal,
    pub amount_usdt: Decimal,
}

impl Quote {
    /// Prices `amount_thb` at `base_rate` marked up by `fee_percent` (e.g. `11`
    /// for 11 %). Rate and USDT amount are both rounded to two places.
    pub fn new(amount_thb: Decimal, base_rate: Decimal, fee_percent: Decimal) -> Result<Self> {
        if amount_thb <= Decimal::ZERO {
            return Err(GatewayError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }
        let rate = round2(base_rate * (Decimal::ONE + fee_percent / Decimal::ONE_HUNDRED));
        if rate <= Decimal::ZERO {
            return Err(GatewayError::ValidationError(
                "Exchange rate must be positive".to_string(),
            ));
        }
        Ok(Self {
            amount_thb,
            rate,
            amount_usdt: round2(amount_thb / rate),
        })
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
