use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::leads::domain::{CanonicalField, LeadRecord};
use crate::leads::scoring::LeadBand;

/// Web-form or phone-intake payload for a single lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub occupancy: String,
    #[serde(default)]
    pub loan_purpose: String,
    #[serde(default)]
    pub credit_band: String,
    #[serde(default)]
    pub property_value: f64,
    #[serde(default)]
    pub liquid_assets: f64,
    #[serde(default)]
    pub notes: String,
}

impl LeadSubmission {
    /// Trims free-text fields and upper-cases the state code.
    pub fn sanitized(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            state: self.state.trim().to_ascii_uppercase(),
            occupancy: self.occupancy.trim().to_string(),
            loan_purpose: self.loan_purpose.trim().to_string(),
            credit_band: self.credit_band.trim().to_string(),
            property_value: self.property_value,
            liquid_assets: self.liquid_assets,
            notes: self.notes.trim().to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn to_record(&self) -> LeadRecord {
        LeadRecord::from_pairs([
            (CanonicalField::FirstName, self.first_name.clone()),
            (CanonicalField::LastName, self.last_name.clone()),
            (CanonicalField::Email, self.email.clone()),
            (CanonicalField::Phone, self.phone.clone()),
            (CanonicalField::State, self.state.clone()),
            (CanonicalField::Occupancy, self.occupancy.clone()),
            (CanonicalField::LoanPurpose, self.loan_purpose.clone()),
            (CanonicalField::PropertyValue, amount_text(self.property_value)),
            (CanonicalField::CreditBand, self.credit_band.clone()),
            (CanonicalField::LiquidAssets, amount_text(self.liquid_assets)),
            (CanonicalField::Notes, self.notes.clone()),
        ]
        .map(|(field, value)| (field.as_str(), value)))
    }
}

fn amount_text(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        String::new()
    }
}

/// Submission as persisted, with its triage score and summary attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedLead {
    pub lead: LeadSubmission,
    pub score: i32,
    pub score_band: LeadBand,
    pub score_reasons: String,
    pub ai_summary: String,
    pub created_at: NaiveDateTime,
}

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_trims_and_uppercases_state() {
        let submission = LeadSubmission {
            first_name: "  Dana ".to_string(),
            state: " ca".to_string(),
            notes: " 4 units, rents $9k ".to_string(),
            ..LeadSubmission::default()
        }
        .sanitized();

        assert_eq!(submission.first_name, "Dana");
        assert_eq!(submission.state, "CA");
        assert_eq!(submission.notes, "4 units, rents $9k");
        assert_eq!(submission.full_name(), "Dana");
    }

    #[test]
    fn to_record_uses_canonical_columns() {
        let submission = LeadSubmission {
            loan_purpose: "DSCR Refi".to_string(),
            property_value: 500_000.0,
            liquid_assets: 50_000.0,
            ..LeadSubmission::default()
        };

        let record = submission.to_record();

        assert_eq!(record.get("property_value"), Some("500000"));
        assert_eq!(record.number(CanonicalField::LiquidAssets), Some(50_000.0));
        assert_eq!(record.field(CanonicalField::LoanPurpose), Some("DSCR Refi"));
        assert_eq!(record.field(CanonicalField::Email), None);
    }
}
