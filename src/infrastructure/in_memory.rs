use crate::config::GatewayConfig;
use crate::domain::audit::LogEntry;
use crate::domain::ports::{AuditSink, ConfigProvider};
use std::sync::{Arc, PoisonError, RwLock};

/// A thread-safe, editable configuration held in memory.
///
/// Clones share the same underlying value, so an operator handle can edit the
/// configuration the gateway reads. Nothing is persisted.
#[derive(Clone)]
pub struct InMemoryConfigProvider {
    defaults: GatewayConfig,
    current: Arc<RwLock<GatewayConfig>>,
}

impl InMemoryConfigProvider {
    /// Creates a provider whose current value and reset target are `defaults`.
    pub fn new(defaults: GatewayConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(defaults.clone())),
            defaults,
        }
    }

    /// Applies `edit` to the current configuration.
    pub fn update(&self, edit: impl FnOnce(&mut GatewayConfig)) {
        let mut config = self.current.write().unwrap_or_else(PoisonError::into_inner);
        edit(&mut config);
    }

    /// Restores the configuration this provider was created with.
    pub fn reset(&self) {
        let mut config = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *config = self.defaults.clone();
    }
}

impl Default for InMemoryConfigProvider {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    fn current(&self) -> GatewayConfig {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Collects audit entries in append order. Clones share storage.
#[derive(Default, Clone)]
pub struct RecordingAuditSink {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, entry: &LogEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
    }
}
