//! Gateway configuration, loaded from TOML or built from defaults.

use crate::domain::order_book::OrderBook;
use crate::domain::payload::DEFAULT_MERCHANT_NAME;
use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Everything the gateway reads at the moment of each operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Market rate in THB per USD before fees.
    pub base_rate: Decimal,
    /// Markup in percent, e.g. `11` for 11 %.
    pub fee_percent: Decimal,
    /// PromptPay proxy (mobile, national ID or e-wallet) receiving THB.
    pub merchant_target_id: String,
    pub merchant_name: String,
    /// Hot wallet the USDT is sent from.
    pub provider_wallet_address: String,
    pub default_amount: Decimal,
    /// USDT amounts above this need a manual approval.
    pub auto_approve_ceiling: Decimal,
    pub verification_delay_ms: u64,
    pub settlement_delay_ms: u64,
    /// Opening state of the order book.
    pub reserves: ReservesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservesConfig {
    pub thb: Decimal,
    pub usdt: Decimal,
    pub auto_hedge: bool,
    pub spread: Decimal,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_rate: dec!(31.26),
            fee_percent: dec!(11),
            merchant_target_id: "0899999999".to_string(),
            merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
            provider_wallet_address: "TWd4...SimulatedProviderHotWallet".to_string(),
            default_amount: dec!(1000),
            auto_approve_ceiling: dec!(5000),
            verification_delay_ms: 2000,
            settlement_delay_ms: 3000,
            reserves: ReservesConfig::default(),
        }
    }
}

impl Default for ReservesConfig {
    fn default() -> Self {
        Self {
            thb: dec!(5000000),
            usdt: dec!(150000),
            auto_hedge: true,
            spread: dec!(0.008),
        }
    }
}

impl GatewayConfig {
    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    pub fn settlement_delay(&self) -> Duration {
        Duration::from_millis(self.settlement_delay_ms)
    }

    pub fn opening_order_book(&self) -> OrderBook {
        OrderBook::new(
            self.reserves.thb,
            self.reserves.usdt,
            self.reserves.auto_hedge,
            self.reserves.spread,
        )
    }
}
