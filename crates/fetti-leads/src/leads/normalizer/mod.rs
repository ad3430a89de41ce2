//! Column normalization onto the canonical lead schema.

mod standard;
mod table;

pub use table::{AliasTable, AliasTableError};

use std::collections::HashMap;

use super::domain::LeadRecord;
use table::fold_column;

/// Renames source columns to canonical field names using `table`.
///
/// Columns that fold to the same key collapse into one (the later value wins).
/// Each canonical field claims at most one column, picked by alias priority, and a
/// claimed column is never offered to another field. Everything else passes through.
pub fn normalize(record: &LeadRecord, table: &AliasTable) -> LeadRecord {
    let mut columns: Vec<(String, String)> = Vec::with_capacity(record.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(record.len());

    for (name, value) in record.iter() {
        let key = fold_column(name);
        match positions.get(&key) {
            Some(&position) => columns[position] = (name.to_string(), value.to_string()),
            None => {
                positions.insert(key, columns.len());
                columns.push((name.to_string(), value.to_string()));
            }
        }
    }

    let mut claimed = vec![false; columns.len()];
    for (field, aliases) in table.entries() {
        let matched = aliases.iter().find_map(|alias| {
            positions
                .get(alias)
                .copied()
                .filter(|position| !claimed[*position])
        });

        if let Some(position) = matched {
            claimed[position] = true;
            columns[position].0 = field.as_str().to_string();
        }
    }

    LeadRecord::from_columns(columns)
}
