//! PromptPay QR payload encoding and the THB → USDT transaction lifecycle.
//!
//! - [`domain`] - QR payload pipeline (checksum, TLV, target classification,
//!   encoder) and the transaction, audit and order book types.
//! - [`application`] - `PaymentGateway`, the single-active-transaction state
//!   machine driven by webhooks, approvals and deferred callbacks.
//! - [`infrastructure`] - adapters for configuration, audit, scheduling and
//!   reference generation.
//! - [`interfaces`] - CSV formats used by the command line simulator.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::gateway::{OpenRequest, PaymentGateway};
pub use config::GatewayConfig;
pub use domain::payload::QrPayload;
pub use domain::target::PaymentTarget;
pub use error::{GatewayError, Result};
