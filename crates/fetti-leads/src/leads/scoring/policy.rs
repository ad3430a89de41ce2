use serde::{Deserialize, Serialize};

use super::config::{ProductFocus, ScoringConfig};
use crate::leads::domain::{CanonicalField, LeadRecord};

/// Why the batch rubric filtered a lead out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    ProductMismatch { focus: ProductFocus },
    CreditBelowMinimum { score: f64, minimum: u16 },
    AssetsBelowMinimum { assets: f64, minimum: f64 },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::ProductMismatch { focus } => {
                format!("rejected: does not match {} focus", focus.label())
            }
            RejectionReason::CreditBelowMinimum { score, minimum } => {
                format!("rejected: credit score {score:.0} below minimum {minimum}")
            }
            RejectionReason::AssetsBelowMinimum { assets, minimum } => format!(
                "rejected: liquid assets ${assets:.0} below minimum ${minimum:.0}"
            ),
        }
    }
}

/// Field and keyword set that qualify a lead for a product focus.
pub(crate) fn product_keywords(focus: ProductFocus) -> Option<(CanonicalField, &'static [&'static str])> {
    match focus {
        ProductFocus::Any => None,
        ProductFocus::Refi => Some((
            CanonicalField::LoanPurpose,
            &["refi", "refinance", "rate and term", "cash out", "cash-out"],
        )),
        ProductFocus::Purchase => Some((CanonicalField::LoanPurpose, &["purchase"])),
        ProductFocus::DscrInvestor => Some((
            CanonicalField::Occupancy,
            &["investor", "non-owner", "rental"],
        )),
        ProductFocus::BridgeFixFlip => Some((
            CanonicalField::LoanPurpose,
            &["bridge", "fix and flip", "flip", "rehab"],
        )),
    }
}

/// Hard filters, checked in order: product fit, credit floor, asset floor.
pub(crate) fn check_rejection(
    record: &LeadRecord,
    config: &ScoringConfig,
) -> Option<RejectionReason> {
    if let Some((field, keywords)) = product_keywords(config.product_focus()) {
        let text = record.text_lower(field);
        if !keywords.iter().any(|keyword| text.contains(keyword)) {
            return Some(RejectionReason::ProductMismatch {
                focus: config.product_focus(),
            });
        }
    }

    if let Some(score) = record.number(CanonicalField::CreditScore) {
        if score < f64::from(config.min_credit_score()) {
            return Some(RejectionReason::CreditBelowMinimum {
                score,
                minimum: config.min_credit_score(),
            });
        }
    }

    if let Some(assets) = record.number(CanonicalField::LiquidAssets) {
        if assets < config.min_liquid_assets() {
            return Some(RejectionReason::AssetsBelowMinimum {
                assets,
                minimum: config.min_liquid_assets(),
            });
        }
    }

    None
}
