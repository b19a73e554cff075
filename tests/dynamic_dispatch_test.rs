use chrono::Utc;
use promptpay_gateway::domain::audit::{LogEntry, LogLevel, LogModule};
use promptpay_gateway::domain::ports::{
    AuditSinkBox, ConfigProviderBox, ReferenceGeneratorBox, SchedulerBox,
};
use promptpay_gateway::infrastructure::in_memory::{InMemoryConfigProvider, RecordingAuditSink};
use promptpay_gateway::infrastructure::reference::SequentialReferenceGenerator;
use promptpay_gateway::infrastructure::scheduler::TokioScheduler;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_ports_as_trait_objects() {
    let handle = InMemoryConfigProvider::default();
    let recorder = RecordingAuditSink::new();

    let config: ConfigProviderBox = Box::new(handle.clone());
    let references: ReferenceGeneratorBox = Box::new(SequentialReferenceGenerator::new());
    let audit: AuditSinkBox = Box::new(recorder.clone());
    let scheduler: SchedulerBox = Box::new(TokioScheduler::new());

    // Verify Send + Sync by spawning tasks
    let config_handle = tokio::spawn(async move {
        handle.update(|c| c.base_rate = dec!(30));
        config.current().base_rate
    });

    let reference_handle = tokio::spawn(async move {
        let now = Utc::now();
        (references.next_reference(now), references.next_reference(now))
    });

    let audit_handle = tokio::spawn(async move {
        audit.record(&LogEntry::new(
            Utc::now(),
            LogLevel::Info,
            LogModule::Ledger,
            "from another task",
        ));
    });

    let ran = Arc::new(AtomicUsize::new(0));
    let counter = ran.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.schedule(
            Duration::from_millis(10),
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        scheduler.drain().await;
    });

    assert_eq!(config_handle.await.unwrap(), dec!(30));

    let (first, second) = reference_handle.await.unwrap();
    assert_ne!(first, second);

    audit_handle.await.unwrap();
    assert_eq!(recorder.entries().len(), 1);

    scheduler_handle.await.unwrap();
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}
