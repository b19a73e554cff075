use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Critical,
}

/// Subsystem that produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogModule {
    Webhook,
    Kyc,
    Ledger,
    Disburser,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Critical => "CRITICAL",
        })
    }
}

impl fmt::Display for LogModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Webhook => "WEBHOOK",
            Self::Kyc => "KYC",
            Self::Ledger => "LEDGER",
            Self::Disburser => "DISBURSER",
        })
    }
}

/// One audit record. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub module: LogModule,
    pub message: String,
    /// Integrity fingerprint of message and timestamp. Not a security control.
    pub hash: String,
}

impl LogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        module: LogModule,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let hash = fingerprint(&format!("{message}{}", timestamp.timestamp_millis()));
        Self {
            timestamp,
            level,
            module,
            message,
            hash,
        }
    }
}

/// DJB2 over the UTF-8 bytes of `data`, as lowercase hex.
pub fn fingerprint(data: &str) -> String {
    let hash = data
        .bytes()
        .fold(5381u32, |hash, b| {
            (hash << 5).wrapping_add(hash).wrapping_add(u32::from(b))
        });
    format!("{hash:x}")
}

/// Masks personal data for display, keeping two characters at each end.
pub fn mask_pii(data: &str) -> String {
    let chars: Vec<char> = data.chars().collect();
    if chars.len() < 4 {
        return "****".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}****{tail}")
}
