//! Single-lead capture: triage scoring, underwriting summary, persistence, and notification.

pub mod domain;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{CapturedLead, LeadSubmission, CREATED_AT_FORMAT};
pub use notify::{
    compose_notification, LeadNotification, LeadNotifier, NotificationSender, NotificationStatus,
    NotifyError, DEFAULT_FROM_ADDRESS,
};
pub use router::lead_router;
pub use service::{CaptureError, CaptureReceipt, LeadCaptureService};
pub use store::{sort_newest_first, CsvLeadStore, LeadStore, StoreError};
pub use summary::{summary_placeholder, SummaryError, UnconfiguredSummarizer, UnderwritingSummarizer};
