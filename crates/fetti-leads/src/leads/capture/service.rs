use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CapturedLead, LeadSubmission};
use super::notify::{compose_notification, LeadNotifier, NotificationSender, NotificationStatus};
use super::store::{LeadStore, StoreError};
use super::summary::{summary_placeholder, UnderwritingSummarizer};
use crate::leads::scoring::{score_lead, TriageOutcome};

/// Service composing triage scoring, summary generation, storage, and notification.
pub struct LeadCaptureService<S, N, P> {
    store: Arc<S>,
    notifier: Arc<N>,
    summarizer: Arc<P>,
    sender: NotificationSender,
}

/// What the caller gets back after a capture attempt was persisted.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureReceipt {
    pub lead: CapturedLead,
    pub outcome: TriageOutcome,
    pub notification: NotificationStatus,
}

impl<S, N, P> LeadCaptureService<S, N, P>
where
    S: LeadStore + 'static,
    N: LeadNotifier + 'static,
    P: UnderwritingSummarizer + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        summarizer: Arc<P>,
        sender: NotificationSender,
    ) -> Self {
        Self {
            store,
            notifier,
            summarizer,
            sender,
        }
    }

    pub fn sender(&self) -> &NotificationSender {
        &self.sender
    }

    /// Score, summarize, and persist a submission, then notify the loan team.
    ///
    /// Only a storage failure is an error. Summary and notification problems are
    /// folded into the stored lead and the receipt.
    pub fn capture(&self, submission: LeadSubmission) -> Result<CaptureReceipt, CaptureError> {
        let submission = submission.sanitized();
        let record = submission.to_record();
        let outcome = score_lead(&record);

        let ai_summary = match self.summarizer.summarize(&record) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "underwriting summary unavailable");
                summary_placeholder(&err)
            }
        };

        let lead = CapturedLead {
            lead: submission,
            score: outcome.total,
            score_band: outcome.band,
            score_reasons: outcome.reasons(),
            ai_summary,
            created_at: Utc::now().naive_utc().trunc_subsecs(0),
        };

        self.store.append(&lead)?;

        let notification = compose_notification(&lead, &self.sender);
        let status = match self.notifier.publish(&notification) {
            Ok(()) => NotificationStatus::Sent,
            Err(err) => {
                warn!(error = %err, to = %notification.to, "lead notification failed");
                NotificationStatus::Failed {
                    message: err.to_string(),
                }
            }
        };

        info!(
            score = lead.score,
            band = lead.score_band.label(),
            "lead captured"
        );

        Ok(CaptureReceipt {
            lead,
            outcome,
            notification: status,
        })
    }

    /// Captured leads, newest first.
    pub fn captured(&self) -> Result<Vec<CapturedLead>, CaptureError> {
        Ok(self.store.list()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
