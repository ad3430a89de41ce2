use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use axum::response::Response;
use serde_json::Value;

use crate::leads::capture::{
    lead_router, sort_newest_first, CapturedLead, LeadCaptureService, LeadNotification,
    LeadNotifier, LeadStore, LeadSubmission, NotificationSender, NotifyError, StoreError,
    SummaryError, UnconfiguredSummarizer, UnderwritingSummarizer,
};
use crate::leads::domain::{CanonicalField, LeadRecord};

pub(super) fn submission() -> LeadSubmission {
    LeadSubmission {
        first_name: "Dana".to_string(),
        last_name: "Whitfield".to_string(),
        email: "dana@example.com".to_string(),
        phone: "555-0100".to_string(),
        state: "ca".to_string(),
        occupancy: "Investment".to_string(),
        loan_purpose: "DSCR Refi".to_string(),
        credit_band: "660-720".to_string(),
        property_value: 500_000.0,
        liquid_assets: 50_000.0,
        notes: "Fourplex, fully leased.".to_string(),
    }
}

pub(super) fn sender() -> NotificationSender {
    NotificationSender {
        from: "info@fettifi.com".to_string(),
        to: "loans@fettifi.com".to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    leads: Mutex<Vec<CapturedLead>>,
}

impl MemoryStore {
    pub(super) fn stored(&self) -> Vec<CapturedLead> {
        self.leads.lock().expect("store mutex poisoned").clone()
    }
}

impl LeadStore for MemoryStore {
    fn append(&self, lead: &CapturedLead) -> Result<(), StoreError> {
        self.leads
            .lock()
            .expect("store mutex poisoned")
            .push(lead.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<CapturedLead>, StoreError> {
        let mut leads = self.stored();
        sort_newest_first(&mut leads);
        Ok(leads)
    }
}

/// Remembers which thread served each store call.
#[derive(Default)]
pub(super) struct ThreadRecordingStore {
    inner: MemoryStore,
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingStore {
    pub(super) fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().expect("store mutex poisoned").clone()
    }

    fn record_thread(&self) {
        self.threads
            .lock()
            .expect("store mutex poisoned")
            .push(thread::current().id());
    }
}

impl LeadStore for ThreadRecordingStore {
    fn append(&self, lead: &CapturedLead) -> Result<(), StoreError> {
        self.record_thread();
        self.inner.append(lead)
    }

    fn list(&self) -> Result<Vec<CapturedLead>, StoreError> {
        self.record_thread();
        self.inner.list()
    }
}

pub(super) struct UnavailableStore;

impl LeadStore for UnavailableStore {
    fn append(&self, _lead: &CapturedLead) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn list(&self) -> Result<Vec<CapturedLead>, StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<LeadNotification>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<LeadNotification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl LeadNotifier for MemoryNotifier {
    fn publish(&self, notification: &LeadNotification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl LeadNotifier for FailingNotifier {
    fn publish(&self, _notification: &LeadNotification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

/// Summarizer that echoes the loan purpose back.
pub(super) struct EchoSummarizer;

impl UnderwritingSummarizer for EchoSummarizer {
    fn summarize(&self, record: &LeadRecord) -> Result<String, SummaryError> {
        let purpose = record
            .field(CanonicalField::LoanPurpose)
            .unwrap_or("unknown purpose");
        Ok(format!("Borrower seeks {purpose}."))
    }
}

pub(super) type MemoryService = LeadCaptureService<MemoryStore, MemoryNotifier, EchoSummarizer>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryStore>, Arc<MemoryNotifier>) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(LeadCaptureService::new(
        store.clone(),
        notifier.clone(),
        Arc::new(EchoSummarizer),
        sender(),
    ));
    (service, store, notifier)
}

pub(super) fn unconfigured_service(
    store: Arc<MemoryStore>,
) -> LeadCaptureService<MemoryStore, FailingNotifier, UnconfiguredSummarizer> {
    LeadCaptureService::new(
        store,
        Arc::new(FailingNotifier),
        Arc::new(UnconfiguredSummarizer),
        sender(),
    )
}

pub(super) fn router_with_service(service: Arc<MemoryService>) -> axum::Router {
    lead_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("valid json")
}

static SCRATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Fresh path under the system temp dir; the file itself is not created.
pub(super) fn scratch_csv(label: &str) -> PathBuf {
    let id = SCRATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "fetti-leads-{label}-{}-{id}.csv",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}
