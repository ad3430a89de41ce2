//! Lead records, column normalization, scoring rubrics, and the intake flows built on them.

pub mod capture;
pub mod domain;
pub mod import;
pub mod normalizer;
pub mod ranking;
pub mod scoring;

pub use domain::{parse_number, CanonicalField, LeadRecord};
pub use import::{
    import_csv, import_csv_path, write_ranked_csv, write_triaged_csv, CsvImport, LeadImportError,
};
pub use normalizer::{normalize, AliasTable, AliasTableError};
pub use ranking::{
    rank_leads, triage_leads, LeadRanking, RankedLead, RankingSummary, RejectedLead, RowFailure,
    TriagedLead,
};
pub use scoring::{
    score_lead, LeadBand, LeadScore, LeadScoringEngine, ProductFocus, RejectionReason,
    ScoreComponent, ScoreFactor, ScoreResult, ScoringConfig, ScoringConfigError, ScoringStrategy,
    TriageOutcome,
};
