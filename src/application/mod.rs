//! Application layer: the transaction lifecycle service.
//!
//! `PaymentGateway` owns the single active-transaction slot and advances it in
//! response to webhooks, operator approvals and deferred callbacks scheduled
//! on a `tokio` runtime.

pub mod gateway;
pub mod subscription;
