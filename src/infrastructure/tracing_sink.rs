use crate::domain::audit::{LogEntry, LogLevel};
use crate::domain::ports::AuditSink;

/// Forwards audit entries to `tracing`, mapping CRITICAL to `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: &LogEntry) {
        let module = entry.module.to_string();
        match entry.level {
            LogLevel::Info => {
                tracing::info!(module = %module, hash = %entry.hash, "{}", entry.message)
            }
            LogLevel::Warn => {
                tracing::warn!(module = %module, hash = %entry.hash, "{}", entry.message)
            }
            LogLevel::Critical => {
                tracing::error!(module = %module, hash = %entry.hash, "{}", entry.message)
            }
        }
    }
}
