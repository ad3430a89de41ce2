use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Loan product a scoring run is focused on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProductFocus {
    #[default]
    Any,
    Refi,
    Purchase,
    DscrInvestor,
    BridgeFixFlip,
}

impl ProductFocus {
    pub const ALL: [ProductFocus; 5] = [
        ProductFocus::Any,
        ProductFocus::Refi,
        ProductFocus::Purchase,
        ProductFocus::DscrInvestor,
        ProductFocus::BridgeFixFlip,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProductFocus::Any => "Any",
            ProductFocus::Refi => "Refi",
            ProductFocus::Purchase => "Purchase",
            ProductFocus::DscrInvestor => "DSCR Investor",
            ProductFocus::BridgeFixFlip => "Bridge / Fix & Flip",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            ProductFocus::Any => "any",
            ProductFocus::Refi => "refi",
            ProductFocus::Purchase => "purchase",
            ProductFocus::DscrInvestor => "dscr_investor",
            ProductFocus::BridgeFixFlip => "bridge_fix_flip",
        }
    }
}

impl fmt::Display for ProductFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductFocus {
    type Err = ScoringConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|focus| {
                focus.label().eq_ignore_ascii_case(trimmed)
                    || focus.slug().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ScoringConfigError::UnknownProductFocus(trimmed.to_string()))
    }
}

impl TryFrom<String> for ProductFocus {
    type Error = ScoringConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductFocus> for String {
    fn from(value: ProductFocus) -> Self {
        value.label().to_string()
    }
}

pub const MIN_CREDIT_SCORE_FLOOR: u16 = 300;
pub const MIN_CREDIT_SCORE_CEILING: u16 = 850;

const US_POSTAL_CODES: [&str; 56] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "PR", "GU", "VI", "AS", "MP",
];

/// Thresholds and preferences for one batch scoring run.
///
/// Only constructible through [`ScoringConfig::new`] (or deserialization, which routes
/// through it), so an engine never sees an out-of-range configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoringConfigInput")]
pub struct ScoringConfig {
    product_focus: ProductFocus,
    target_states: BTreeSet<String>,
    min_credit_score: u16,
    min_liquid_assets: f64,
}

#[derive(Debug, Deserialize)]
struct ScoringConfigInput {
    #[serde(default)]
    product_focus: ProductFocus,
    #[serde(default)]
    target_states: Vec<String>,
    #[serde(default = "default_min_credit_score")]
    min_credit_score: u16,
    #[serde(default)]
    min_liquid_assets: f64,
}

fn default_min_credit_score() -> u16 {
    MIN_CREDIT_SCORE_FLOOR
}

impl TryFrom<ScoringConfigInput> for ScoringConfig {
    type Error = ScoringConfigError;

    fn try_from(input: ScoringConfigInput) -> Result<Self, Self::Error> {
        ScoringConfig::new(
            input.product_focus,
            input.target_states,
            input.min_credit_score,
            input.min_liquid_assets,
        )
    }
}

impl ScoringConfig {
    pub fn new<I, S>(
        product_focus: ProductFocus,
        target_states: I,
        min_credit_score: u16,
        min_liquid_assets: f64,
    ) -> Result<Self, ScoringConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !(MIN_CREDIT_SCORE_FLOOR..=MIN_CREDIT_SCORE_CEILING).contains(&min_credit_score) {
            return Err(ScoringConfigError::CreditScoreOutOfRange(min_credit_score));
        }

        if !min_liquid_assets.is_finite() || min_liquid_assets < 0.0 {
            return Err(ScoringConfigError::InvalidLiquidAssets(min_liquid_assets));
        }

        let mut states = BTreeSet::new();
        for state in target_states {
            let code = state.as_ref().trim().to_ascii_uppercase();
            if !US_POSTAL_CODES.contains(&code.as_str()) {
                return Err(ScoringConfigError::UnknownState(state.as_ref().to_string()));
            }
            states.insert(code);
        }

        Ok(Self {
            product_focus,
            target_states: states,
            min_credit_score,
            min_liquid_assets,
        })
    }

    /// No product filter, no state preference, and the loosest thresholds.
    pub fn permissive() -> Self {
        Self {
            product_focus: ProductFocus::Any,
            target_states: BTreeSet::new(),
            min_credit_score: MIN_CREDIT_SCORE_FLOOR,
            min_liquid_assets: 0.0,
        }
    }

    pub fn product_focus(&self) -> ProductFocus {
        self.product_focus
    }

    pub fn target_states(&self) -> &BTreeSet<String> {
        &self.target_states
    }

    pub fn min_credit_score(&self) -> u16 {
        self.min_credit_score
    }

    pub fn min_liquid_assets(&self) -> f64 {
        self.min_liquid_assets
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::permissive()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("unknown product focus '{0}' (expected Any, Refi, Purchase, DSCR Investor, or Bridge / Fix & Flip)")]
    UnknownProductFocus(String),
    #[error("minimum credit score {0} is outside 300-850")]
    CreditScoreOutOfRange(u16),
    #[error("minimum liquid assets must be a non-negative amount (got {0})")]
    InvalidLiquidAssets(f64),
    #[error("'{0}' is not a two-letter US state code")]
    UnknownState(String),
}
