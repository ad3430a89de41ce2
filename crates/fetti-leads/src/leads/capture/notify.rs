use serde::{Deserialize, Serialize};

use super::domain::CapturedLead;

/// Outbound hook that delivers a composed lead notification (e-mail, chat, etc.).
pub trait LeadNotifier: Send + Sync {
    fn publish(&self, notification: &LeadNotification) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNotification {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport not configured")]
    NotConfigured,
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sender and recipient addresses for lead notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSender {
    pub from: String,
    pub to: String,
}

pub const DEFAULT_FROM_ADDRESS: &str = "info@fettifi.com";

impl Default for NotificationSender {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM_ADDRESS.to_string(),
            to: DEFAULT_FROM_ADDRESS.to_string(),
        }
    }
}

/// Delivery result reported back to the caller; a failed delivery never fails the capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Failed { message: String },
}

impl NotificationStatus {
    pub fn message(&self) -> String {
        match self {
            NotificationStatus::Sent => "Email sent successfully.".to_string(),
            NotificationStatus::Failed { message } => format!("Email not sent: {message}"),
        }
    }
}

pub fn compose_notification(lead: &CapturedLead, sender: &NotificationSender) -> LeadNotification {
    let submission = &lead.lead;
    let subject = format!(
        "New Fetti Lead: {} {}",
        submission.first_name, submission.last_name
    );

    let body = format!(
        "New lead submitted:\n\n\
         Name: {first} {last}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         State: {state}\n\
         Occupancy: {occupancy}\n\
         Loan Purpose: {purpose}\n\
         Property Value: {value}\n\
         Credit Band: {credit}\n\
         Liquid Assets: {assets}\n\n\
         Notes:\n{notes}\n\n\
         --- Lead Score ---\n\
         Score: {score} ({band})\n\
         Reasons: {reasons}\n\n\
         --- AI Loan Summary ---\n\
         {summary}\n\n\
         Captured at {created_at} UTC.\n",
        first = submission.first_name,
        last = submission.last_name,
        email = submission.email,
        phone = submission.phone,
        state = submission.state,
        occupancy = submission.occupancy,
        purpose = submission.loan_purpose,
        value = format_amount(submission.property_value),
        credit = submission.credit_band,
        assets = format_amount(submission.liquid_assets),
        notes = submission.notes,
        score = lead.score,
        band = lead.score_band.label(),
        reasons = lead.score_reasons,
        summary = lead.ai_summary,
        created_at = lead.created_at.format(super::domain::CREATED_AT_FORMAT),
    );

    LeadNotification {
        from: sender.from.clone(),
        to: sender.to.clone(),
        subject,
        body,
    }
}

/// Whole-dollar amount with thousands separators, e.g. `$1,250,000`.
fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let rounded = value.round().abs() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{sign}${grouped}")
}
