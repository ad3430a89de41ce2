use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{CapturedLead, LeadSubmission, CREATED_AT_FORMAT};
use crate::leads::scoring::LeadBand;

/// Append-only storage for captured leads.
pub trait LeadStore: Send + Sync {
    fn append(&self, lead: &CapturedLead) -> Result<(), StoreError>;
    /// Every stored lead, most recent `created_at` first.
    fn list(&self) -> Result<Vec<CapturedLead>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("lead store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("lead store CSV failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}

/// Stores captured leads as rows of a single CSV file, writing the header once.
#[derive(Debug)]
pub struct CsvLeadStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvLeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> Result<bool, StoreError> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(true),
            Err(err) => Err(err.into()),
        }
    }
}

impl LeadStore for CsvLeadStore {
    fn append(&self, lead: &CapturedLead) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("write lock poisoned".to_string()))?;

        let write_header = self.needs_header()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(CapturedLeadRow::from(lead))?;
        writer.flush()?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<CapturedLead>, StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut reader = csv::Reader::from_reader(file);
        let mut leads = Vec::new();
        for (row, result) in reader.deserialize::<CapturedLeadRow>().enumerate() {
            let parsed = result
                .map_err(|err| err.to_string())
                .and_then(CapturedLead::try_from);
            match parsed {
                Ok(lead) => leads.push(lead),
                Err(message) => warn!(row, error = %message, "skipping unreadable captured lead"),
            }
        }

        sort_newest_first(&mut leads);
        Ok(leads)
    }
}

/// Orders by `created_at` descending; equal timestamps list the later append first.
pub fn sort_newest_first(leads: &mut [CapturedLead]) {
    leads.reverse();
    leads.sort_by(|left, right| right.created_at.cmp(&left.created_at));
}

/// Flat CSV shape of a captured lead.
#[derive(Debug, Serialize, Deserialize)]
struct CapturedLeadRow {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    state: String,
    occupancy: String,
    loan_purpose: String,
    property_value: f64,
    credit_band: String,
    liquid_assets: f64,
    notes: String,
    score: i32,
    score_band: String,
    score_reasons: String,
    ai_summary: String,
    created_at: String,
}

impl From<&CapturedLead> for CapturedLeadRow {
    fn from(captured: &CapturedLead) -> Self {
        let lead = &captured.lead;
        Self {
            first_name: lead.first_name.clone(),
            last_name: lead.last_name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            state: lead.state.clone(),
            occupancy: lead.occupancy.clone(),
            loan_purpose: lead.loan_purpose.clone(),
            property_value: lead.property_value,
            credit_band: lead.credit_band.clone(),
            liquid_assets: lead.liquid_assets,
            notes: lead.notes.clone(),
            score: captured.score,
            score_band: captured.score_band.label().to_string(),
            score_reasons: captured.score_reasons.clone(),
            ai_summary: captured.ai_summary.clone(),
            created_at: captured.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

impl TryFrom<CapturedLeadRow> for CapturedLead {
    type Error = String;

    fn try_from(row: CapturedLeadRow) -> Result<Self, Self::Error> {
        let created_at = NaiveDateTime::parse_from_str(row.created_at.trim(), CREATED_AT_FORMAT)
            .map_err(|err| format!("invalid created_at '{}': {err}", row.created_at))?;
        let score_band =
            LeadBand::from_label(&row.score_band).unwrap_or_else(|| LeadBand::from_total(row.score));

        Ok(CapturedLead {
            lead: LeadSubmission {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                state: row.state,
                occupancy: row.occupancy,
                loan_purpose: row.loan_purpose,
                credit_band: row.credit_band,
                property_value: row.property_value,
                liquid_assets: row.liquid_assets,
                notes: row.notes,
            },
            score: row.score,
            score_band,
            score_reasons: row.score_reasons,
            ai_summary: row.ai_summary,
            created_at,
        })
    }
}
