use super::subscription::{Subscribers, Subscription, SubscriptionId};
use crate::config::GatewayConfig;
use crate::domain::audit::{LogEntry, LogLevel, LogModule, mask_pii};
use crate::domain::order_book::OrderBook;
use crate::domain::payload::QrPayload;
use crate::domain::ports::{
    AuditSinkBox, ClockBox, ConfigProviderBox, ReferenceGeneratorBox, SchedulerBox,
};
use crate::domain::quote::Quote;
use crate::domain::transaction::{Beneficiary, Transaction, TransactionEvent, TransactionStatus};
use crate::error::{GatewayError, Result};
use crate::infrastructure::reference::{SequentialReferenceGenerator, SystemClock};
use crate::infrastructure::scheduler::TokioScheduler;
use crate::infrastructure::tracing_sink::TracingAuditSink;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// What a user submits after beneficiary verification.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub beneficiary: Beneficiary,
    /// Falls back to the configured default amount.
    pub amount_thb: Option<Decimal>,
    pub memo: Option<String>,
}

/// Everything guarded by the gateway's single lock.
struct GatewayState {
    /// Oldest first.
    history: Vec<Transaction>,
    /// Index into `history` of the transaction receiving events.
    active: Option<usize>,
    /// Oldest first.
    logs: Vec<LogEntry>,
    order_book: OrderBook,
    subscribers: Subscribers,
}

impl GatewayState {
    fn active(&self) -> Option<&Transaction> {
        self.active.and_then(|i| self.history.get(i))
    }

    fn active_mut(&mut self) -> Option<&mut Transaction> {
        self.active.and_then(|i| self.history.get_mut(i))
    }

    /// Whether `id` is still the active transaction and sits in `status`.
    /// Deferred callbacks check this before touching anything.
    fn is_active_in(&self, id: Uuid, status: TransactionStatus) -> bool {
        self.active()
            .is_some_and(|tx| tx.id == id && tx.status == status)
    }

    fn apply(&mut self, event: TransactionEvent) -> Result<()> {
        self.active_mut()
            .ok_or(GatewayError::NoActiveTransaction)?
            .apply(event)
    }

    fn append_log(&mut self, entry: LogEntry) {
        if let Some(tx) = self.active_mut() {
            tx.logs.insert(0, entry.clone());
        }
        self.logs.push(entry);
    }

    fn notify(&mut self) {
        if let Some(i) = self.active {
            let snapshot = self.history[i].clone();
            self.subscribers.publish(&snapshot);
        }
    }
}

struct Inner {
    state: Mutex<GatewayState>,
    config: ConfigProviderBox,
    references: ReferenceGeneratorBox,
    audit: AuditSinkBox,
    clock: ClockBox,
    scheduler: SchedulerBox,
}

/// Drives the lifecycle of the active exchange transaction.
///
/// The gateway owns the active-transaction slot, the transaction history, the
/// global audit log and the order book, all behind one lock so deferred
/// verification and settlement callbacks serialize with fresh requests.
/// Cloning is cheap and yields a handle to the same gateway.
#[derive(Clone)]
pub struct PaymentGateway {
    inner: Arc<Inner>,
}

/// Assembles a [`PaymentGateway`], defaulting every port to its production
/// adapter.
pub struct GatewayBuilder {
    config: ConfigProviderBox,
    references: Option<ReferenceGeneratorBox>,
    audit: Option<AuditSinkBox>,
    clock: Option<ClockBox>,
    scheduler: Option<SchedulerBox>,
}

impl GatewayBuilder {
    pub fn references(mut self, references: ReferenceGeneratorBox) -> Self {
        self.references = Some(references);
        self
    }

    pub fn audit_sink(mut self, audit: AuditSinkBox) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn clock(mut self, clock: ClockBox) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn scheduler(mut self, scheduler: SchedulerBox) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn build(self) -> PaymentGateway {
        let order_book = self.config.current().opening_order_book();
        let state = GatewayState {
            history: Vec::new(),
            active: None,
            logs: Vec::new(),
            order_book,
            subscribers: Subscribers::default(),
        };
        PaymentGateway {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                config: self.config,
                references: self
                    .references
                    .unwrap_or_else(|| Box::new(SequentialReferenceGenerator::new())),
                audit: self.audit.unwrap_or_else(|| Box::new(TracingAuditSink)),
                clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
                scheduler: self
                    .scheduler
                    .unwrap_or_else(|| Box::new(TokioScheduler::new())),
            }),
        }
    }
}

impl PaymentGateway {
    /// Creates a gateway with default adapters. The opening order book is
    /// taken from the configuration at this moment.
    pub fn new(config: ConfigProviderBox) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: ConfigProviderBox) -> GatewayBuilder {
        GatewayBuilder {
            config,
            references: None,
            audit: None,
            clock: None,
            scheduler: None,
        }
    }

    /// Prices, references and encodes a new transaction, then makes it active.
    pub async fn open(&self, request: OpenRequest) -> Result<Transaction> {
        if request.beneficiary.full_name.trim().is_empty() {
            return Err(GatewayError::ValidationError(
                "Beneficiary name is required".to_string(),
            ));
        }

        let config = self.inner.config.current();
        let amount_thb = request.amount_thb.unwrap_or(config.default_amount);
        let quote = Quote::new(amount_thb, config.base_rate, config.fee_percent)?;
        let qr_payload = QrPayload::encode(
            &config.merchant_target_id,
            Some(quote.amount_thb),
            &config.merchant_name,
        )?;

        let now = self.inner.clock.now();
        let tx = Transaction {
            id: Uuid::now_v7(),
            reference_id: self.inner.references.next_reference(now),
            beneficiary: request.beneficiary,
            amount_thb: quote.amount_thb,
            amount_usdt: quote.amount_usdt,
            rate: quote.rate,
            status: TransactionStatus::AwaitingPayment,
            created_at: now,
            qr_payload: Some(qr_payload),
            memo: request.memo.filter(|m| !m.trim().is_empty()),
            logs: Vec::new(),
        };

        Ok(self.create(tx).await)
    }

    /// Makes `tx` the active transaction, replacing whatever was active.
    ///
    /// The previous transaction stays in history in its current state; any
    /// callback still scheduled for it becomes a no-op.
    pub async fn create(&self, mut tx: Transaction) -> Transaction {
        tx.status = TransactionStatus::AwaitingPayment;
        tx.logs.clear();

        let mut state = self.inner.state.lock().await;
        if let Some(previous) = state.active()
            && !previous.status.is_terminal()
        {
            tracing::warn!(
                reference = %previous.reference_id,
                status = %previous.status,
                "replacing an unfinished transaction"
            );
        }

        let kyc = format!(
            "New beneficiary session: {} ({})",
            tx.beneficiary.full_name,
            mask_pii(&tx.beneficiary.national_id)
        );
        let ledger = format!(
            "Created TX {}. Expecting {} THB",
            tx.reference_id, tx.amount_thb
        );

        state.history.push(tx);
        let index = state.history.len() - 1;
        state.active = Some(index);
        self.log(&mut state, LogLevel::Info, LogModule::Kyc, kyc);
        self.log(&mut state, LogLevel::Info, LogModule::Ledger, ledger);
        state.notify();

        state.history[index].clone()
    }

    /// Handles the bank's incoming-transfer webhook.
    ///
    /// Deliveries that arrive after the transaction left `AWAITING_PAYMENT`
    /// are logged and dropped. Otherwise the sender's name is checked against
    /// the beneficiary after the configured verification delay.
    pub async fn on_incoming_transfer(
        &self,
        amount: Decimal,
        sender_name: &str,
        reference: &str,
    ) -> Result<()> {
        if sender_name.trim().is_empty() {
            return Err(GatewayError::ValidationError(
                "Sender name is required".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(GatewayError::ValidationError(
                "Transfer amount must be positive".to_string(),
            ));
        }

        let mut state = self.inner.state.lock().await;
        let Some(tx) = state.active() else {
            return Err(GatewayError::NoActiveTransaction);
        };
        let (id, status) = (tx.id, tx.status);

        self.log(
            &mut state,
            LogLevel::Info,
            LogModule::Webhook,
            format!("Received incoming transfer: {amount} THB from {sender_name}. Ref: {reference}"),
        );

        if status != TransactionStatus::AwaitingPayment {
            self.log(
                &mut state,
                LogLevel::Warn,
                LogModule::Webhook,
                format!("Duplicate or late webhook ignored; transaction is {status}"),
            );
            return Ok(());
        }

        state.apply(TransactionEvent::PaymentReceived)?;
        state.notify();

        let delay = self.inner.config.current().verification_delay();
        self.schedule_verification(id, sender_name.to_string(), delay);
        Ok(())
    }

    /// Releases a transaction held for manual approval.
    ///
    /// Returns `false` without side effects unless the active transaction is
    /// `AWAITING_APPROVAL`.
    pub async fn approve(&self) -> Result<bool> {
        let mut state = self.inner.state.lock().await;
        let Some(id) = state
            .active()
            .filter(|tx| tx.status == TransactionStatus::AwaitingApproval)
            .map(|tx| tx.id)
        else {
            return Ok(false);
        };

        self.log(
            &mut state,
            LogLevel::Info,
            LogModule::Disburser,
            "Manual approval received from administrator. Proceeding to settlement.",
        );
        state.apply(TransactionEvent::Approved)?;
        state.notify();
        self.schedule_settlement(id, self.inner.config.current().settlement_delay());
        Ok(true)
    }

    /// Schedules settlement of the active transaction if it is `DISBURSING`.
    ///
    /// Scheduling twice is harmless: whichever callback runs second finds the
    /// transaction already completed.
    pub async fn settle(&self) -> bool {
        let state = self.inner.state.lock().await;
        let Some(id) = state
            .active()
            .filter(|tx| tx.status == TransactionStatus::Disbursing)
            .map(|tx| tx.id)
        else {
            return false;
        };
        self.schedule_settlement(id, self.inner.config.current().settlement_delay());
        true
    }

    /// Flips the auto-hedge flag and returns its new value.
    pub async fn toggle_auto_hedge(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        let enabled = state.order_book.toggle_auto_hedge();
        self.log(
            &mut state,
            LogLevel::Warn,
            LogModule::Ledger,
            format!(
                "Auto-hedge switched {}",
                if enabled { "ON" } else { "OFF" }
            ),
        );
        enabled
    }

    pub async fn subscribe(&self) -> Subscription {
        self.inner.state.lock().await.subscribers.add()
    }

    /// Stops deliveries to `id`. Safe to call any number of times.
    pub async fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.state.lock().await.subscribers.remove(id);
    }

    pub async fn subscriber_count(&self) -> usize {
        self.inner.state.lock().await.subscribers.len()
    }

    pub async fn active(&self) -> Option<Transaction> {
        self.inner.state.lock().await.active().cloned()
    }

    /// All transactions ever created, newest first.
    pub async fn history(&self) -> Vec<Transaction> {
        let state = self.inner.state.lock().await;
        state.history.iter().rev().cloned().collect()
    }

    /// The global audit log, newest first.
    pub async fn logs(&self) -> Vec<LogEntry> {
        let state = self.inner.state.lock().await;
        state.logs.iter().rev().cloned().collect()
    }

    pub async fn order_book(&self) -> OrderBook {
        self.inner.state.lock().await.order_book.clone()
    }

    /// The CRITICAL message explaining why the active transaction failed.
    pub async fn last_failure_reason(&self) -> Option<String> {
        let state = self.inner.state.lock().await;
        let tx = state
            .active()
            .filter(|tx| tx.status == TransactionStatus::Failed)?;
        tx.logs
            .iter()
            .find(|entry| entry.level == LogLevel::Critical)
            .map(|entry| entry.message.clone())
    }

    /// Waits for every scheduled verification and settlement to run.
    pub async fn wait_idle(&self) {
        self.inner.scheduler.drain().await;
    }

    pub fn config(&self) -> GatewayConfig {
        self.inner.config.current()
    }

    fn log(
        &self,
        state: &mut GatewayState,
        level: LogLevel,
        module: LogModule,
        message: impl Into<String>,
    ) {
        let entry = LogEntry::new(self.inner.clock.now(), level, module, message);
        self.inner.audit.record(&entry);
        state.append_log(entry);
    }

    fn schedule_verification(&self, id: Uuid, sender_name: String, delay: Duration) {
        let gateway = self.clone();
        self.inner.scheduler.schedule(
            delay,
            Box::pin(async move {
                if let Err(e) = gateway.complete_verification(id, &sender_name).await {
                    tracing::error!(error = %e, transaction = %id, "verification could not be applied");
                }
            }),
        );
    }

    fn schedule_settlement(&self, id: Uuid, delay: Duration) {
        let gateway = self.clone();
        self.inner.scheduler.schedule(
            delay,
            Box::pin(async move {
                if let Err(e) = gateway.complete_settlement(id).await {
                    tracing::error!(error = %e, transaction = %id, "settlement could not be applied");
                }
            }),
        );
    }

    async fn complete_verification(&self, id: Uuid, sender_name: &str) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        if !state.is_active_in(id, TransactionStatus::VerifyingBank) {
            return Ok(());
        }
        let Some(tx) = state.active() else {
            return Ok(());
        };
        let beneficiary = tx.beneficiary.clone();
        let actual = sender_name.to_uppercase();

        if beneficiary.matches_sender(sender_name) {
            self.log(
                &mut state,
                LogLevel::Info,
                LogModule::Kyc,
                format!("Logic guard passed: {actual} matches KYC record."),
            );
            self.enter_disbursement(&mut state, id)
        } else {
            let expected = beneficiary.full_name.to_uppercase();
            self.log(
                &mut state,
                LogLevel::Critical,
                LogModule::Kyc,
                format!("Logic guard FAILED: {actual} does not match {expected}. Freezing funds."),
            );
            state.apply(TransactionEvent::IdentityRejected)?;
            state.notify();
            Ok(())
        }
    }

    /// Routes a verified transaction to settlement or to the approval queue.
    fn enter_disbursement(&self, state: &mut GatewayState, id: Uuid) -> Result<()> {
        let config = self.inner.config.current();
        let amount_usdt = state
            .active()
            .map(|tx| tx.amount_usdt)
            .ok_or(GatewayError::NoActiveTransaction)?;

        if amount_usdt > config.auto_approve_ceiling {
            self.log(
                state,
                LogLevel::Warn,
                LogModule::Disburser,
                format!(
                    "Amount {amount_usdt} USDT exceeds auto-approval ceiling of {} USDT. Manual approval required.",
                    config.auto_approve_ceiling
                ),
            );
            state.apply(TransactionEvent::ApprovalRequired)?;
            state.notify();
            return Ok(());
        }

        state.apply(TransactionEvent::IdentityConfirmed)?;
        state.notify();
        self.schedule_settlement(id, config.settlement_delay());
        Ok(())
    }

    async fn complete_settlement(&self, id: Uuid) -> Result<()> {
        let mut state = self.inner.state.lock().await;
        if !state.is_active_in(id, TransactionStatus::Disbursing) {
            return Ok(());
        }
        let Some(tx) = state.active() else {
            return Ok(());
        };
        let (amount_thb, amount_usdt) = (tx.amount_thb, tx.amount_usdt);
        let wallet = tx.beneficiary.wallet_address.clone();
        let reference = tx.reference_id.clone();

        if let Err(e) = state.order_book.settle(amount_thb, amount_usdt) {
            self.log(
                &mut state,
                LogLevel::Critical,
                LogModule::Disburser,
                format!("Settlement of {reference} halted, nothing broadcast: {e}"),
            );
            return Ok(());
        }
        self.log(
            &mut state,
            LogLevel::Info,
            LogModule::Disburser,
            format!("Broadcasting TRC20 transfer of {amount_usdt} USDT to {wallet}"),
        );

        let hedge = if state.order_book.auto_hedge {
            format!("Auto-hedge: placed buy order for {amount_usdt} USDT.")
        } else {
            "Auto-hedge skipped (manual mode). Reserves may unbalance.".to_string()
        };
        self.log(&mut state, LogLevel::Info, LogModule::Ledger, hedge);

        state.apply(TransactionEvent::SettlementConfirmed)?;
        self.log(
            &mut state,
            LogLevel::Info,
            LogModule::Ledger,
            format!("Transaction finalized. Reconciliation ID: {reference}"),
        );
        state.notify();

        tracing::info!(
            reference = %reference,
            thb_reserves = %state.order_book.thb_reserves,
            usdt_reserves = %state.order_book.usdt_reserves,
            "settlement booked"
        );
        Ok(())
    }
}
