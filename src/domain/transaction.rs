use super::audit::LogEntry;
use super::payload::QrPayload;
use crate::error::{GatewayError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of an exchange transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// QR code issued, waiting for the bank transfer.
    AwaitingPayment,
    /// Transfer received, sender identity being checked.
    VerifyingBank,
    /// Above the auto-approval ceiling, waiting for an operator.
    AwaitingApproval,
    /// USDT transfer in flight.
    Disbursing,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Applies `event`, rejecting anything outside the transition table.
    pub fn transition(self, event: TransactionEvent) -> Result<Self> {
        use TransactionEvent as E;
        use TransactionStatus as S;

        let next = match (self, event) {
            (S::AwaitingPayment, E::PaymentReceived) => S::VerifyingBank,
            (S::VerifyingBank, E::IdentityConfirmed) => S::Disbursing,
            (S::VerifyingBank, E::ApprovalRequired) => S::AwaitingApproval,
            (S::VerifyingBank, E::IdentityRejected) => S::Failed,
            (S::AwaitingApproval, E::Approved) => S::Disbursing,
            (S::Disbursing, E::SettlementConfirmed) => S::Completed,
            _ => {
                return Err(GatewayError::ValidationError(format!(
                    "{event:?} is not allowed while {self}"
                )));
            }
        };

        tracing::debug!(from = %self, to = %next, event = ?event, "transaction state transition");
        Ok(next)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitingPayment => "AWAITING_PAYMENT",
            Self::VerifyingBank => "VERIFYING_BANK",
            Self::AwaitingApproval => "AWAITING_APPROVAL",
            Self::Disbursing => "DISBURSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        })
    }
}

/// Inputs that drive [`TransactionStatus::transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    PaymentReceived,
    IdentityConfirmed,
    ApprovalRequired,
    IdentityRejected,
    Approved,
    SettlementConfirmed,
}

/// The verified recipient of the USDT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub full_name: String,
    pub national_id: String,
    pub wallet_address: String,
}

impl Beneficiary {
    /// Whether `sender` plausibly names the same person.
    ///
    /// Case-insensitive containment in either direction, so a bank that
    /// reports "MR SOMCHAI JAIDEE" still matches "Somchai Jaidee".
    pub fn matches_sender(&self, sender: &str) -> bool {
        let expected = self.full_name.to_uppercase();
        let actual = sender.to_uppercase();
        actual.contains(&expected) || expected.contains(&actual)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Reference quoted to the bank for reconciliation.
    pub reference_id: String,
    pub beneficiary: Beneficiary,
    pub amount_thb: Decimal,
    pub amount_usdt: Decimal,
    /// THB per USDT, locked at creation.
    pub rate: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub qr_payload: Option<QrPayload>,
    pub memo: Option<String>,
    /// Audit entries recorded while this transaction was active, newest first.
    pub logs: Vec<LogEntry>,
}

impl Transaction {
    /// Applies a lifecycle event in place.
    pub fn apply(&mut self, event: TransactionEvent) -> Result<()> {
        self.status = self.status.transition(event)?;
        Ok(())
    }
}
