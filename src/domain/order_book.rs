use crate::error::{GatewayError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A reserve balance.
///
/// Wraps `rust_decimal::Decimal` so reserve arithmetic never touches floating
/// point. Balances may go negative; the book does not enforce liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Balance {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Custody reserves backing the THB → USDT exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// THB received from bank transfers.
    pub thb_reserves: Balance,
    /// USDT available for disbursement.
    pub usdt_reserves: Balance,
    /// Whether settlements should be paired with an offsetting buy order.
    pub auto_hedge: bool,
    pub spread: Decimal,
}

impl OrderBook {
    pub fn new(thb_reserves: Decimal, usdt_reserves: Decimal, auto_hedge: bool, spread: Decimal) -> Self {
        Self {
            thb_reserves: Balance(thb_reserves),
            usdt_reserves: Balance(usdt_reserves),
            auto_hedge,
            spread,
        }
    }

    /// Books a settled exchange: THB comes in, USDT goes out.
    ///
    /// Both reserves are computed before either is written, so an overflow
    /// leaves the book untouched.
    pub(crate) fn settle(&mut self, amount_thb: Decimal, amount_usdt: Decimal) -> Result<()> {
        let thb = self.thb_reserves.0.checked_add(amount_thb);
        let usdt = self.usdt_reserves.0.checked_sub(amount_usdt);
        let (Some(thb), Some(usdt)) = (thb, usdt) else {
            return Err(GatewayError::ReserveOverflow {
                amount_thb,
                amount_usdt,
            });
        };
        self.thb_reserves = Balance(thb);
        self.usdt_reserves = Balance(usdt);
        Ok(())
    }

    /// Flips the auto-hedge flag and returns the new value.
    pub(crate) fn toggle_auto_hedge(&mut self) -> bool {
        self.auto_hedge = !self.auto_hedge;
        self.auto_hedge
    }
}
