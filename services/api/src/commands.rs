use crate::infra::load_alias_table;
use clap::Args;
use fetti_leads::config::AppConfig;
use fetti_leads::error::AppError;
use fetti_leads::leads::capture::{CapturedLead, CsvLeadStore, LeadStore, CREATED_AT_FORMAT};
use fetti_leads::leads::{
    import_csv_path, rank_leads, triage_leads, write_ranked_csv, write_triaged_csv,
    CanonicalField, LeadRanking, LeadRecord, LeadScoringEngine, ProductFocus, ScoringConfig,
    ScoringStrategy, TriagedLead,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Lead CSV export to score
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Rubric to apply: batch (hard filters + additive score) or triage (heat bands)
    #[arg(long, default_value = "batch")]
    pub(crate) strategy: ScoringStrategy,
    /// Product focus for the batch rubric (Any, Refi, Purchase, DSCR Investor, Bridge / Fix & Flip)
    #[arg(long)]
    pub(crate) product_focus: Option<ProductFocus>,
    /// Target state code; repeat for several states
    #[arg(long = "target-state")]
    pub(crate) target_states: Vec<String>,
    /// Minimum credit score for the batch rubric
    #[arg(long)]
    pub(crate) min_credit_score: Option<u16>,
    /// Minimum liquid assets for the batch rubric
    #[arg(long)]
    pub(crate) min_liquid_assets: Option<f64>,
    /// Write the scored rows to this CSV file
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CapturedArgs {
    /// Captured-lead CSV to read (defaults to LEADS_CAPTURED_CSV)
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let aliases = load_alias_table(&config.storage)?;
    let import = import_csv_path(&args.csv)?;

    println!("Scoring {} ({} rows)", args.csv.display(), import.rows.len() + import.failures.len());

    match args.strategy {
        ScoringStrategy::BatchFilter => {
            let scoring = scoring_overrides(&config.scoring, &args)?;
            let engine = LeadScoringEngine::new(scoring);
            let ranking =
                rank_leads(import.rows, &aliases, &engine).with_failures(import.failures);
            for line in ranking_lines(&ranking) {
                println!("{line}");
            }
            if let Some(path) = &args.output {
                write_ranked_csv(File::create(path)?, &ranking)?;
                println!("Wrote ranked leads to {}", path.display());
            }
        }
        ScoringStrategy::Triage => {
            let triaged = triage_leads(import.rows, &aliases);
            for line in triage_lines(&triaged) {
                println!("{line}");
            }
            for failure in &import.failures {
                println!("- row {} skipped: {}", failure.row, failure.message);
            }
            if let Some(path) = &args.output {
                write_triaged_csv(File::create(path)?, &triaged)?;
                println!("Wrote triaged leads to {}", path.display());
            }
        }
    }

    Ok(())
}

pub(crate) fn run_captured(args: CapturedArgs) -> Result<(), AppError> {
    let path = match args.path {
        Some(path) => path,
        None => AppConfig::load()?.storage.captured_csv,
    };
    let leads = CsvLeadStore::new(path.clone()).list()?;

    if leads.is_empty() {
        println!("No captured leads in {}", path.display());
        return Ok(());
    }

    println!("Captured leads in {} (newest first)", path.display());
    for line in captured_lines(&leads) {
        println!("{line}");
    }
    Ok(())
}

/// CLI flags layered over the configured batch defaults.
pub(crate) fn scoring_overrides(
    defaults: &ScoringConfig,
    args: &ScoreArgs,
) -> Result<ScoringConfig, AppError> {
    let target_states: Vec<String> = if args.target_states.is_empty() {
        defaults.target_states().iter().cloned().collect()
    } else {
        args.target_states.clone()
    };

    let config = ScoringConfig::new(
        args.product_focus.unwrap_or(defaults.product_focus()),
        target_states,
        args.min_credit_score.unwrap_or(defaults.min_credit_score()),
        args.min_liquid_assets
            .unwrap_or(defaults.min_liquid_assets()),
    )?;
    Ok(config)
}

fn display_name(record: &LeadRecord, row: usize) -> String {
    let name = [CanonicalField::FirstName, CanonicalField::LastName]
        .into_iter()
        .filter_map(|field| record.field(field))
        .collect::<Vec<_>>()
        .join(" ");
    if !name.is_empty() {
        return name;
    }
    record
        .field(CanonicalField::Email)
        .map(str::to_string)
        .unwrap_or_else(|| format!("row {row}"))
}

pub(crate) fn ranking_lines(ranking: &LeadRanking) -> Vec<String> {
    let summary = ranking.summary();
    let mut lines = vec![format!(
        "{} accepted | {} rejected | {} unreadable",
        summary.accepted, summary.rejected, summary.failed
    )];

    for (rank, lead) in ranking.ranked.iter().enumerate() {
        lines.push(format!(
            "{:>3}. {} | score {} | {}",
            rank + 1,
            display_name(&lead.record, lead.row),
            lead.score.total,
            lead.score.reasons()
        ));
    }
    for rejected in &ranking.rejected {
        lines.push(format!(
            "- row {} {}",
            rejected.row,
            rejected.reason.summary()
        ));
    }
    for failure in &ranking.failures {
        lines.push(format!("- row {} skipped: {}", failure.row, failure.message));
    }
    lines
}

pub(crate) fn triage_lines(leads: &[TriagedLead]) -> Vec<String> {
    leads
        .iter()
        .map(|lead| {
            format!(
                "- {} | {} ({}) | {}",
                display_name(&lead.record, lead.row),
                lead.outcome.band.label(),
                lead.outcome.total,
                lead.outcome.reasons()
            )
        })
        .collect()
}

pub(crate) fn captured_lines(leads: &[CapturedLead]) -> Vec<String> {
    leads
        .iter()
        .map(|captured| {
            format!(
                "- {} | {} | {} ({}) | {}",
                captured.created_at.format(CREATED_AT_FORMAT),
                captured.lead.full_name(),
                captured.score,
                captured.score_band.label(),
                captured.score_reasons
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetti_leads::leads::capture::LeadSubmission;
    use fetti_leads::leads::{AliasTable, LeadBand};

    fn score_args() -> ScoreArgs {
        ScoreArgs {
            csv: PathBuf::from("leads.csv"),
            strategy: ScoringStrategy::BatchFilter,
            product_focus: None,
            target_states: Vec::new(),
            min_credit_score: None,
            min_liquid_assets: None,
            output: None,
        }
    }

    #[test]
    fn overrides_replace_only_the_flags_given() {
        let defaults =
            ScoringConfig::new(ProductFocus::Refi, ["CA"], 640, 20_000.0).expect("defaults");
        let mut args = score_args();
        args.min_credit_score = Some(700);
        args.target_states = vec!["tx".to_string()];

        let config = scoring_overrides(&defaults, &args).expect("valid overrides");

        assert_eq!(config.product_focus(), ProductFocus::Refi);
        assert_eq!(config.min_credit_score(), 700);
        assert_eq!(config.min_liquid_assets(), 20_000.0);
        assert!(config.target_states().contains("TX"));
        assert!(!config.target_states().contains("CA"));
    }

    #[test]
    fn invalid_overrides_are_reported() {
        let mut args = score_args();
        args.target_states = vec!["ZZ".to_string()];

        let error = scoring_overrides(&ScoringConfig::permissive(), &args)
            .expect_err("unknown state rejected");
        assert!(matches!(error, AppError::Scoring(_)));
    }

    #[test]
    fn ranking_lines_name_leads_and_list_rejections() {
        let records = vec![
            LeadRecord::new()
                .with("First Name", "Dana")
                .with("Last Name", "Whitfield")
                .with("FICO", "760"),
            LeadRecord::new().with("Email", "lee@example.com").with("FICO", "500"),
        ];
        let config = ScoringConfig::new(ProductFocus::Any, Vec::<String>::new(), 640, 0.0)
            .expect("config");
        let ranking = rank_leads(
            records.into_iter().enumerate(),
            &AliasTable::standard(),
            &LeadScoringEngine::new(config),
        );

        let lines = ranking_lines(&ranking);

        assert_eq!(lines[0], "1 accepted | 1 rejected | 0 unreadable");
        assert!(lines[1].starts_with("  1. Dana Whitfield | score 25 |"));
        assert_eq!(
            lines[2],
            "- row 1 rejected: credit score 500 below minimum 640"
        );
    }

    #[test]
    fn captured_lines_show_timestamp_and_band() {
        let lead = CapturedLead {
            lead: LeadSubmission {
                first_name: "Dana".to_string(),
                last_name: "Whitfield".to_string(),
                ..LeadSubmission::default()
            },
            score: 45,
            score_band: LeadBand::Warm,
            score_reasons: "Medium credit profile.".to_string(),
            ai_summary: String::new(),
            created_at: chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
                .expect("valid date")
                .and_hms_opt(9, 30, 0)
                .expect("valid time"),
        };

        assert_eq!(
            captured_lines(&[lead]),
            vec!["- 2025-06-01 09:30:00 | Dana Whitfield | 45 (WARM) | Medium credit profile."]
        );
    }
}
