use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fields of the canonical lead schema that scoring and export understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    FirstName,
    LastName,
    Email,
    Phone,
    State,
    Occupancy,
    LoanPurpose,
    PropertyValue,
    CreditBand,
    CreditScore,
    LiquidAssets,
    Cltv,
    Source,
    Notes,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 14] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::State,
        CanonicalField::Occupancy,
        CanonicalField::LoanPurpose,
        CanonicalField::PropertyValue,
        CanonicalField::CreditBand,
        CanonicalField::CreditScore,
        CanonicalField::LiquidAssets,
        CanonicalField::Cltv,
        CanonicalField::Source,
        CanonicalField::Notes,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CanonicalField::FirstName => "first_name",
            CanonicalField::LastName => "last_name",
            CanonicalField::Email => "email",
            CanonicalField::Phone => "phone",
            CanonicalField::State => "state",
            CanonicalField::Occupancy => "occupancy",
            CanonicalField::LoanPurpose => "loan_purpose",
            CanonicalField::PropertyValue => "property_value",
            CanonicalField::CreditBand => "credit_band",
            CanonicalField::CreditScore => "credit_score",
            CanonicalField::LiquidAssets => "liquid_assets",
            CanonicalField::Cltv => "cltv",
            CanonicalField::Source => "source",
            CanonicalField::Notes => "notes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lead as an ordered list of column/value pairs.
///
/// Column order is kept so that exports line up with the source file. Values are
/// stored as text; numeric interpretation happens on read through [`LeadRecord::number`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadRecord {
    columns: Vec<(String, String)>,
}

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new();
        for (column, value) in pairs {
            record.set(column, value);
        }
        record
    }

    /// Builder-style setter used when assembling a record.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Replaces the value of an existing column or appends a new one.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed value of a canonical field; empty values read as absent.
    pub fn field(&self, field: CanonicalField) -> Option<&str> {
        self.get(field.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Numeric value of a canonical field. Malformed text reads as absent.
    pub fn number(&self, field: CanonicalField) -> Option<f64> {
        self.field(field).and_then(parse_number)
    }

    /// Lower-cased text of a canonical field, empty when absent.
    pub fn text_lower(&self, field: CanonicalField) -> String {
        self.field(field).unwrap_or_default().to_lowercase()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn from_columns(columns: Vec<(String, String)>) -> Self {
        Self { columns }
    }
}

/// Parses currency, percent, and plain numeric text.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | '_') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl Serialize for LeadRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LeadRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LeadRecordVisitor)
    }
}

struct LeadRecordVisitor;

impl<'de> Visitor<'de> for LeadRecordVisitor {
    type Value = LeadRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping column names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((column, value)) = access.next_entry::<String, serde_json::Value>()? {
            columns.push((column, value_as_text(value)));
        }
        Ok(LeadRecord { columns })
    }
}

fn value_as_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}
