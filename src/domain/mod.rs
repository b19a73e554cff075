//! Domain types and the pure QR encoding pipeline.
//!
//! `crc`, `tlv`, `target` and `payload` have no side effects; everything that
//! touches time, configuration or the outside world goes through `ports`.

pub mod audit;
pub mod crc;
pub mod order_book;
pub mod payload;
pub mod ports;
pub mod quote;
pub mod target;
pub mod tlv;
pub mod transaction;
