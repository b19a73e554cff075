use super::audit::LogEntry;
use crate::config::GatewayConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Supplies a fresh configuration snapshot on every call.
pub trait ConfigProvider: Send + Sync {
    fn current(&self) -> GatewayConfig;
}

/// Issues unique, time-ordered, human-presentable transaction references.
pub trait ReferenceGenerator: Send + Sync {
    fn next_reference(&self, now: DateTime<Utc>) -> String;
}

/// Receives every audit entry the gateway records.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &LogEntry);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs single-shot deferred tasks.
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Runs `task` once after `delay`. Cannot be cancelled.
    fn schedule(&self, delay: Duration, task: Task);

    /// Waits until no scheduled task is pending, including tasks scheduled
    /// while draining.
    async fn drain(&self);
}

pub type ConfigProviderBox = Box<dyn ConfigProvider>;
pub type ReferenceGeneratorBox = Box<dyn ReferenceGenerator>;
pub type AuditSinkBox = Box<dyn AuditSink>;
pub type ClockBox = Box<dyn Clock>;
pub type SchedulerBox = Box<dyn Scheduler>;
