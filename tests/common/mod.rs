#![allow(dead_code)]

use chrono::Utc;
use promptpay_gateway::application::gateway::PaymentGateway;
use promptpay_gateway::config::GatewayConfig;
use promptpay_gateway::domain::transaction::{Beneficiary, Transaction, TransactionStatus};
use promptpay_gateway::infrastructure::in_memory::{InMemoryConfigProvider, RecordingAuditSink};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use uuid::Uuid;

pub struct Harness {
    pub gateway: PaymentGateway,
    pub config: InMemoryConfigProvider,
    pub audit: RecordingAuditSink,
}

pub fn harness() -> Harness {
    harness_with(GatewayConfig::default())
}

pub fn harness_with(config: GatewayConfig) -> Harness {
    let config = InMemoryConfigProvider::new(config);
    let audit = RecordingAuditSink::new();
    let gateway = PaymentGateway::builder(Box::new(config.clone()))
        .audit_sink(Box::new(audit.clone()))
        .build();
    Harness {
        gateway,
        config,
        audit,
    }
}

pub fn transaction(name: &str, amount_thb: Decimal, amount_usdt: Decimal) -> Transaction {
    Transaction {
        id: Uuid::now_v7(),
        reference_id: format!("TX-TEST-{}", Uuid::now_v7().simple()),
        beneficiary: Beneficiary {
            full_name: name.to_string(),
            national_id: "1103700012345".to_string(),
            wallet_address: "TQn9Y2khEsLJW1ChVWFMSMeRDow5KcbLSE".to_string(),
        },
        amount_thb,
        amount_usdt,
        rate: Decimal::ONE,
        status: TransactionStatus::Completed,
        created_at: Utc::now(),
        qr_payload: None,
        memo: None,
        logs: Vec::new(),
    }
}

pub fn write_scenario(path: &Path, rows: &[[&str; 5]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["event", "amount", "name", "national_id", "wallet"])?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}
