use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    reference: &'a str,
    status: TransactionStatus,
    amount_thb: Decimal,
    amount_usdt: Decimal,
    rate: Decimal,
}

/// Writes the transaction ledger as CSV, one row per transaction.
pub struct LedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transactions<'a>(
        &mut self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<()> {
        for tx in transactions {
            self.writer.serialize(LedgerRow {
                reference: &tx.reference_id,
                status: tx.status,
                amount_thb: tx.amount_thb,
                amount_usdt: tx.amount_usdt,
                rate: tx.rate,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
