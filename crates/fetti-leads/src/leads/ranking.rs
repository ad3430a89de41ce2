use serde::Serialize;
use tracing::debug;

use super::domain::LeadRecord;
use super::normalizer::{normalize, AliasTable};
use super::scoring::{
    score_lead, LeadScore, LeadScoringEngine, RejectionReason, ScoreResult, TriageOutcome,
};

/// Accepted lead with its normalized record and batch score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLead {
    /// Zero-based position in the input sequence.
    pub row: usize,
    pub record: LeadRecord,
    pub score: LeadScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedLead {
    pub row: usize,
    pub reason: RejectionReason,
}

/// Input row that could not be turned into a record at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeadRanking {
    pub ranked: Vec<RankedLead>,
    pub rejected: Vec<RejectedLead>,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankingSummary {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl LeadRanking {
    pub fn summary(&self) -> RankingSummary {
        let accepted = self.ranked.len();
        let rejected = self.rejected.len();
        let failed = self.failures.len();
        RankingSummary {
            total: accepted + rejected + failed,
            accepted,
            rejected,
            failed,
        }
    }

    /// Attaches row failures collected upstream (e.g. during CSV parsing).
    pub fn with_failures(mut self, failures: Vec<RowFailure>) -> Self {
        self.failures.extend(failures);
        self.failures.sort_by_key(|failure| failure.row);
        self
    }
}

/// Normalizes and scores every record, dropping rejections and ordering the rest.
///
/// Ordering is by total descending; the sort is stable so equal totals keep input order.
pub fn rank_leads<I>(records: I, table: &AliasTable, engine: &LeadScoringEngine) -> LeadRanking
where
    I: IntoIterator<Item = (usize, LeadRecord)>,
{
    let mut ranking = LeadRanking::default();

    for (row, raw) in records {
        let record = normalize(&raw, table);
        match engine.score(&record) {
            ScoreResult::Accepted(score) => ranking.ranked.push(RankedLead { row, record, score }),
            ScoreResult::Rejected { reason } => {
                debug!(row, reason = %reason.summary(), "lead rejected");
                ranking.rejected.push(RejectedLead { row, reason });
            }
        }
    }

    ranking
        .ranked
        .sort_by(|left, right| right.score.total.cmp(&left.score.total));
    ranking
}

/// Lead scored with the single-lead banding rubric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriagedLead {
    pub row: usize,
    pub record: LeadRecord,
    pub outcome: TriageOutcome,
}

/// Normalizes and bands every record, keeping input order. Nothing is filtered.
pub fn triage_leads<I>(records: I, table: &AliasTable) -> Vec<TriagedLead>
where
    I: IntoIterator<Item = (usize, LeadRecord)>,
{
    records
        .into_iter()
        .map(|(row, raw)| {
            let record = normalize(&raw, table);
            let outcome = score_lead(&record);
            TriagedLead {
                row,
                record,
                outcome,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::scoring::{LeadBand, ProductFocus, ScoringConfig};

    fn numbered(records: Vec<LeadRecord>) -> impl Iterator<Item = (usize, LeadRecord)> {
        records.into_iter().enumerate()
    }

    #[test]
    fn ranks_by_score_and_keeps_ties_in_input_order() {
        let records = vec![
            LeadRecord::new().with("Lead Source", "google"),
            LeadRecord::new().with("FICO", "760"),
            LeadRecord::new().with("Lead Source", "google ads"),
            LeadRecord::new(),
        ];
        let engine = LeadScoringEngine::new(ScoringConfig::permissive());

        let ranking = rank_leads(numbered(records), &AliasTable::standard(), &engine);

        let order: Vec<_> = ranking.ranked.iter().map(|lead| lead.row).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        assert_eq!(ranking.ranked[0].score.total, 25);
        assert_eq!(ranking.ranked[0].record.get("credit_score"), Some("760"));
    }

    #[test]
    fn rejected_leads_are_excluded_from_ranked_output() {
        let records = vec![
            LeadRecord::new().with("Purpose", "Purchase"),
            LeadRecord::new().with("Purpose", "Cash-out refinance"),
        ];
        let config = ScoringConfig::new(ProductFocus::Refi, Vec::<String>::new(), 640, 0.0)
            .expect("config");
        let engine = LeadScoringEngine::new(config);

        let ranking = rank_leads(numbered(records), &AliasTable::standard(), &engine);

        assert_eq!(ranking.ranked.len(), 1);
        assert_eq!(ranking.ranked[0].row, 1);
        assert_eq!(ranking.rejected.len(), 1);
        assert_eq!(ranking.rejected[0].row, 0);
        assert_eq!(
            ranking.summary(),
            RankingSummary {
                total: 2,
                accepted: 1,
                rejected: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn raising_the_credit_minimum_only_adds_rejections() {
        let records: Vec<_> = [620, 660, 700, 740, 780]
            .iter()
            .map(|score| LeadRecord::new().with("credit_score", score.to_string()))
            .collect();
        let table = AliasTable::standard();

        let mut previous_accepted: Option<Vec<usize>> = None;
        for minimum in [300, 640, 680, 720, 760, 850] {
            let config = ScoringConfig::new(ProductFocus::Any, Vec::<String>::new(), minimum, 0.0)
                .expect("config");
            let ranking = rank_leads(
                numbered(records.clone()),
                &table,
                &LeadScoringEngine::new(config),
            );
            let mut accepted: Vec<_> = ranking.ranked.iter().map(|lead| lead.row).collect();
            accepted.sort_unstable();

            if let Some(previous) = &previous_accepted {
                assert!(accepted.iter().all(|row| previous.contains(row)));
            }
            previous_accepted = Some(accepted);
        }
    }

    #[test]
    fn triage_keeps_every_lead_in_input_order() {
        let records = vec![
            LeadRecord::new().with("Credit Range", "<620"),
            LeadRecord::new()
                .with("Credit Range", "720+")
                .with("Home Value", "650000")
                .with("Assets", "150000"),
        ];

        let triaged = triage_leads(numbered(records), &AliasTable::standard());

        assert_eq!(triaged.len(), 2);
        assert_eq!(triaged[0].row, 0);
        assert_eq!(triaged[0].outcome.band, LeadBand::Cold);
        assert_eq!(triaged[1].outcome.total, 70);
        assert_eq!(triaged[1].outcome.band, LeadBand::Hot);
    }
}
