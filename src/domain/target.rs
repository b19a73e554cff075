use serde::{Deserialize, Serialize};

/// Thai international dialling prefix in the form PromptPay expects.
const MOBILE_PREFIX: &str = "0066";

/// A PromptPay proxy identifier, normalized from user input.
///
/// `Mobile` carries the 9-digit national subscriber number without any
/// country or trunk prefix; `NationalId` and `EWallet` carry the digits as
/// entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PaymentTarget {
    Mobile(String),
    NationalId(String),
    EWallet(String),
}

impl PaymentTarget {
    /// Classifies a raw identifier. Never fails: anything unrecognized falls
    /// back to `NationalId` with the stripped digits.
    ///
    /// Precedence matters for 13-digit input, where a mobile number in full
    /// `0066` form overlaps the national ID range.
    pub fn classify(raw: &str) -> Self {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        match digits.len() {
            15 => Self::EWallet(digits),
            13 if digits.starts_with(MOBILE_PREFIX) => {
                Self::Mobile(digits[MOBILE_PREFIX.len()..].to_string())
            }
            13 if matches!(digits.as_bytes()[0], b'0'..=b'5') => Self::NationalId(digits),
            11 if digits.starts_with("66") => Self::Mobile(digits[2..].to_string()),
            10 if digits.starts_with('0') => Self::Mobile(digits[1..].to_string()),
            _ => Self::NationalId(digits),
        }
    }

    /// Sub-tag inside the merchant account information template.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Mobile(_) => "01",
            Self::NationalId(_) => "02",
            Self::EWallet(_) => "03",
        }
    }

    /// Canonical value as it appears in the payload.
    pub fn value(&self) -> String {
        match self {
            Self::Mobile(subscriber) => format!("{MOBILE_PREFIX}{subscriber}"),
            Self::NationalId(id) => id.clone(),
            Self::EWallet(id) => id.clone(),
        }
    }
}
