//! Single-lead banding rubric used when a lead is captured one at a time.
//!
//! Unlike [`LeadScoringEngine`](super::LeadScoringEngine) this rubric never rejects; every
//! record comes back with a total and a heat band so the loan officer can prioritise the call.

use serde::{Deserialize, Serialize};

use super::{ScoreComponent, ScoreFactor};
use crate::leads::domain::{CanonicalField, LeadRecord};

/// Heat band derived from a triage total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadBand {
    Hot,
    Warm,
    Cold,
}

impl LeadBand {
    pub fn from_total(total: i32) -> Self {
        if total >= 60 {
            LeadBand::Hot
        } else if total >= 40 {
            LeadBand::Warm
        } else {
            LeadBand::Cold
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LeadBand::Hot => "HOT",
            LeadBand::Warm => "WARM",
            LeadBand::Cold => "COLD / LONG-TERM NURTURE",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [LeadBand::Hot, LeadBand::Warm, LeadBand::Cold]
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(label))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub total: i32,
    pub band: LeadBand,
    pub components: Vec<ScoreComponent>,
}

impl TriageOutcome {
    /// Component notes joined the way they are stored alongside a captured lead.
    pub fn reasons(&self) -> String {
        self.components
            .iter()
            .map(|component| component.notes.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

const GOOD_CREDIT_BANDS: [&str; 4] = [">720", "720+", "680-720", "660-720"];
const MEDIUM_CREDIT_BANDS: [&str; 1] = ["620-660"];

pub fn score_lead(record: &LeadRecord) -> TriageOutcome {
    let mut components = Vec::new();

    let credit_band = record.field(CanonicalField::CreditBand).unwrap_or_default();
    components.push(if GOOD_CREDIT_BANDS.contains(&credit_band) {
        ScoreComponent::new(ScoreFactor::CreditBand, 30, "Good credit profile.")
    } else if MEDIUM_CREDIT_BANDS.contains(&credit_band) {
        ScoreComponent::new(ScoreFactor::CreditBand, 15, "Medium credit profile.")
    } else {
        ScoreComponent::new(ScoreFactor::CreditBand, 0, "Sub-620 credit \u{2013} higher risk.")
    });

    let property_value = record.number(CanonicalField::PropertyValue).unwrap_or(0.0);
    if property_value >= 500_000.0 {
        components.push(ScoreComponent::new(
            ScoreFactor::PropertyValue,
            20,
            "Strong property value.",
        ));
    } else if property_value >= 250_000.0 {
        components.push(ScoreComponent::new(
            ScoreFactor::PropertyValue,
            10,
            "Decent property value.",
        ));
    }

    let liquid_assets = record.number(CanonicalField::LiquidAssets).unwrap_or(0.0);
    if liquid_assets >= 100_000.0 {
        components.push(ScoreComponent::new(
            ScoreFactor::LiquidAssets,
            20,
            "High liquid assets.",
        ));
    } else if liquid_assets >= 25_000.0 {
        components.push(ScoreComponent::new(
            ScoreFactor::LiquidAssets,
            10,
            "Some liquidity.",
        ));
    }

    let loan_purpose = record.text_lower(CanonicalField::LoanPurpose);
    if loan_purpose.contains("refi") {
        components.push(ScoreComponent::new(
            ScoreFactor::LoanPurpose,
            10,
            "Refi opportunity.",
        ));
    }
    if loan_purpose.contains("dscr") {
        components.push(ScoreComponent::new(
            ScoreFactor::LoanPurpose,
            10,
            "Possible DSCR / investor loan.",
        ));
    }

    let total = components.iter().map(|component| component.points).sum();
    TriageOutcome {
        total,
        band: LeadBand::from_total(total),
        components,
    }
}
