use crate::leads::domain::LeadRecord;

/// Produces a short underwriting narrative for a lead. Providers live outside this crate.
pub trait UnderwritingSummarizer: Send + Sync {
    fn summarize(&self, record: &LeadRecord) -> Result<String, SummaryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("no summary provider is configured")]
    NotConfigured,
    #[error("summary provider failed: {0}")]
    Provider(String),
}

/// Summarizer used when no provider is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSummarizer;

impl UnderwritingSummarizer for UnconfiguredSummarizer {
    fn summarize(&self, _record: &LeadRecord) -> Result<String, SummaryError> {
        Err(SummaryError::NotConfigured)
    }
}

/// Placeholder text stored in place of a summary that could not be produced.
pub fn summary_placeholder(error: &SummaryError) -> String {
    format!("AI summary error: {error}")
}
