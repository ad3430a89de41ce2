mod config;
mod policy;
mod rules;
pub mod triage;

pub use config::{ProductFocus, ScoringConfig, ScoringConfigError};
pub use policy::RejectionReason;
pub use triage::{score_lead, LeadBand, TriageOutcome};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::LeadRecord;

/// Input that produced a score contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Base,
    StateMatch,
    PropertyValue,
    CreditScore,
    CreditBand,
    LiquidAssets,
    Cltv,
    LoanPurpose,
    Source,
}

/// Discrete contribution to a score, kept for audit and display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i32,
    pub notes: String,
}

impl ScoreComponent {
    pub(crate) fn new(factor: ScoreFactor, points: i32, notes: impl Into<String>) -> Self {
        Self {
            factor,
            points,
            notes: notes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScore {
    pub total: i32,
    pub components: Vec<ScoreComponent>,
}

impl LeadScore {
    pub fn reasons(&self) -> String {
        self.components
            .iter()
            .map(|component| component.notes.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Outcome of the batch rubric for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScoreResult {
    Accepted(LeadScore),
    Rejected { reason: RejectionReason },
}

impl ScoreResult {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ScoreResult::Rejected { .. })
    }

    pub fn total(&self) -> Option<i32> {
        match self {
            ScoreResult::Accepted(score) => Some(score.total),
            ScoreResult::Rejected { .. } => None,
        }
    }
}

/// Stateless batch-filter scorer bound to one configuration.
#[derive(Debug, Clone)]
pub struct LeadScoringEngine {
    config: ScoringConfig,
}

impl LeadScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, record: &LeadRecord) -> ScoreResult {
        if let Some(reason) = policy::check_rejection(record, &self.config) {
            return ScoreResult::Rejected { reason };
        }

        let components = rules::score_components(record, &self.config);
        let total = components.iter().map(|component| component.points).sum();
        ScoreResult::Accepted(LeadScore { total, components })
    }
}

/// Rubric a caller picks for a scoring request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Hard filters followed by the additive batch rubric.
    #[default]
    BatchFilter,
    /// Banding rubric; never rejects.
    Triage,
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "batch" | "batch_filter" | "filter" => Ok(ScoringStrategy::BatchFilter),
            "triage" | "band" | "banding" => Ok(ScoringStrategy::Triage),
            other => Err(format!(
                "unknown scoring strategy '{other}' (expected batch or triage)"
            )),
        }
    }
}
