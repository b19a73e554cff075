use super::crc;
use super::target::PaymentTarget;
use super::tlv::{self, TlvField};
use crate::error::{GatewayError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application identifier of the PromptPay credit transfer scheme.
pub const PROMPTPAY_AID: &str = "A000000677010111";
/// ISO 4217 numeric code for THB.
pub const CURRENCY_THB: &str = "764";
pub const COUNTRY_CODE: &str = "TH";
pub const MERCHANT_CITY: &str = "Bangkok";
pub const DEFAULT_MERCHANT_NAME: &str = "PromptPay Gateway";
pub const MERCHANT_NAME_MAX_CHARS: usize = 25;

/// Header of the checksum field; part of the checksummed data.
const CRC_HEADER: &str = "6304";
const CRC_LEN: usize = 4;

/// A complete EMVCo merchant-presented QR payload.
///
/// Deserialization goes through [`QrPayload::parse`], so every value holds a
/// checksum-valid ASCII payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QrPayload(String);

impl QrPayload {
    /// Builds the payload for `target`, optionally fixing the amount.
    ///
    /// A missing or zero amount produces a static (reusable) QR code.
    pub fn encode(raw_target: &str, amount: Option<Decimal>, merchant_name: &str) -> Result<Self> {
        let target = PaymentTarget::classify(raw_target);
        if target.value().is_empty() {
            return Err(GatewayError::ValidationError(format!(
                "Payment target {raw_target:?} contains no digits"
            )));
        }

        let amount = match amount {
            Some(value) if value < Decimal::ZERO => {
                return Err(GatewayError::ValidationError(format!(
                    "Amount {value} must not be negative"
                )));
            }
            Some(value) if value.is_zero() => None,
            other => other,
        };

        let merchant_info = [
            tlv::field("00", PROMPTPAY_AID)?,
            tlv::field(target.tag(), &target.value())?,
        ]
        .concat();

        let merchant_name: String = merchant_name.chars().take(MERCHANT_NAME_MAX_CHARS).collect();
        let initiation = if amount.is_some() { "12" } else { "11" };
        let amount = amount.map(format_amount).unwrap_or_default();

        let mut data = [
            tlv::field("00", "01")?,
            tlv::field("01", initiation)?,
            tlv::field("29", &merchant_info)?,
            tlv::field("53", CURRENCY_THB)?,
            tlv::field("54", &amount)?,
            tlv::field("58", COUNTRY_CODE)?,
            tlv::field("59", &merchant_name)?,
            tlv::field("60", MERCHANT_CITY)?,
        ]
        .concat();
        data.push_str(CRC_HEADER);
        let checksum = crc::checksum(&data);
        data.push_str(&checksum);

        Ok(Self(data))
    }

    /// Recomputes the trailing checksum of an arbitrary payload string.
    pub fn verify(payload: &str) -> bool {
        if !payload.is_ascii() || payload.len() < CRC_LEN {
            return false;
        }
        let (body, checksum) = payload.split_at(payload.len() - CRC_LEN);
        crc::checksum(body).eq_ignore_ascii_case(checksum)
    }

    /// Parses and checksum-validates an externally supplied payload.
    pub fn parse(payload: &str) -> Result<Self> {
        if !Self::verify(payload) {
            return Err(GatewayError::Malformed("checksum mismatch".to_string()));
        }
        let payload = Self(payload.to_string());
        payload.fields()?;
        Ok(payload)
    }

    /// Top-level TLV fields, including the trailing checksum field.
    pub fn fields(&self) -> Result<Vec<TlvField>> {
        tlv::decode(&self.0)
    }

    /// The four checksum characters.
    pub fn checksum(&self) -> &str {
        &self.0[self.0.len() - CRC_LEN..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QrPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QrPayload {
    type Error = GatewayError;

    fn try_from(payload: String) -> Result<Self> {
        Self::parse(&payload)
    }
}

impl From<QrPayload> for String {
    fn from(payload: QrPayload) -> Self {
        payload.0
    }
}

fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
