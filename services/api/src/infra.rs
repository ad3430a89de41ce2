use fetti_leads::config::StorageConfig;
use fetti_leads::error::AppError;
use fetti_leads::leads::capture::{
    sort_newest_first, CapturedLead, LeadNotification, LeadNotifier, LeadStore, NotifyError,
    StoreError,
};
use fetti_leads::leads::{AliasTable, ScoringConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Alias table and default scoring settings shared by the batch scoring routes.
#[derive(Debug, Clone)]
pub(crate) struct ScoringContext {
    pub(crate) aliases: Arc<AliasTable>,
    pub(crate) defaults: ScoringConfig,
}

impl ScoringContext {
    pub(crate) fn new(aliases: AliasTable, defaults: ScoringConfig) -> Self {
        Self {
            aliases: Arc::new(aliases),
            defaults,
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadStore {
    leads: Arc<Mutex<Vec<CapturedLead>>>,
}

impl LeadStore for InMemoryLeadStore {
    fn append(&self, lead: &CapturedLead) -> Result<(), StoreError> {
        let mut guard = self.leads.lock().expect("lead store mutex poisoned");
        guard.push(lead.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<CapturedLead>, StoreError> {
        let mut leads = self.leads.lock().expect("lead store mutex poisoned").clone();
        sort_newest_first(&mut leads);
        Ok(leads)
    }
}

/// Writes each notification to the log instead of an outbound transport.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingNotifier;

impl LeadNotifier for TracingNotifier {
    fn publish(&self, notification: &LeadNotification) -> Result<(), NotifyError> {
        info!(
            from = %notification.from,
            to = %notification.to,
            subject = %notification.subject,
            body_len = notification.body.len(),
            "lead notification"
        );
        Ok(())
    }
}

/// The configured alias table, or the built-in one when none is set.
pub(crate) fn load_alias_table(storage: &StorageConfig) -> Result<AliasTable, AppError> {
    match &storage.alias_table {
        Some(path) => {
            let table = AliasTable::from_path(path)?;
            info!(path = %path.display(), version = table.version(), "loaded alias table");
            Ok(table)
        }
        None => Ok(AliasTable::standard()),
    }
}
