use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::standard::{STANDARD_ALIASES, STANDARD_TABLE_VERSION};
use crate::leads::domain::CanonicalField;

/// Versioned mapping from canonical fields to the column spellings that feed them.
///
/// Aliases are stored folded (see [`fold_column`]) and in priority order. The
/// canonical name of each field is always its first alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    version: u32,
    entries: Vec<(CanonicalField, Vec<String>)>,
}

#[derive(Debug, thiserror::Error)]
pub enum AliasTableError {
    #[error("alias '{alias}' is claimed by both {first} and {second}")]
    DuplicateAlias {
        alias: String,
        first: CanonicalField,
        second: CanonicalField,
    },
    #[error("alias table contains an empty alias for {0}")]
    EmptyAlias(CanonicalField),
    #[error("alias table names unknown field '{0}'")]
    UnknownField(String),
    #[error("failed to read alias table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid alias table document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct AliasTableDocument {
    version: u32,
    #[serde(default)]
    aliases: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    /// Builds a table, rejecting aliases that would map one column onto two fields.
    pub fn new<I, S>(version: u32, entries: I) -> Result<Self, AliasTableError>
    where
        I: IntoIterator<Item = (CanonicalField, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut supplied: HashMap<CanonicalField, Vec<String>> = HashMap::new();
        for (field, aliases) in entries {
            let slot = supplied.entry(field).or_default();
            for alias in aliases {
                let folded = fold_column(alias.as_ref());
                if folded.is_empty() {
                    return Err(AliasTableError::EmptyAlias(field));
                }
                slot.push(folded);
            }
        }

        let mut owners: HashMap<String, CanonicalField> = HashMap::new();
        let mut table = Vec::with_capacity(CanonicalField::ALL.len());

        for field in CanonicalField::ALL {
            let mut aliases = vec![field.as_str().to_string()];
            aliases.extend(supplied.remove(&field).unwrap_or_default());

            let mut unique = Vec::with_capacity(aliases.len());
            for alias in aliases {
                match owners.get(&alias) {
                    Some(owner) if *owner == field => continue,
                    Some(owner) => {
                        return Err(AliasTableError::DuplicateAlias {
                            alias,
                            first: *owner,
                            second: field,
                        })
                    }
                    None => {
                        owners.insert(alias.clone(), field);
                        unique.push(alias);
                    }
                }
            }
            table.push((field, unique));
        }

        Ok(Self {
            version,
            entries: table,
        })
    }

    /// Built-in table shipped with the engine.
    pub fn standard() -> Self {
        Self::new(
            STANDARD_TABLE_VERSION,
            STANDARD_ALIASES
                .iter()
                .map(|(field, aliases)| (*field, aliases.to_vec())),
        )
        .unwrap_or_else(|err| unreachable!("standard alias table is disjoint: {err}"))
    }

    /// Loads a table from `{ "version": N, "aliases": { "<field>": ["alias", ...] } }`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, AliasTableError> {
        let document: AliasTableDocument = serde_json::from_reader(reader)?;
        let mut entries = Vec::with_capacity(document.aliases.len());
        for (name, aliases) in document.aliases {
            let field =
                CanonicalField::from_name(&name).ok_or(AliasTableError::UnknownField(name))?;
            entries.push((field, aliases));
        }
        Self::new(document.version, entries)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AliasTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> impl Iterator<Item = (CanonicalField, &[String])> {
        self.entries
            .iter()
            .map(|(field, aliases)| (*field, aliases.as_slice()))
    }

    /// Canonical field a source column would map to, if any.
    pub fn resolve(&self, column: &str) -> Option<CanonicalField> {
        let folded = fold_column(column);
        self.entries
            .iter()
            .find(|(_, aliases)| aliases.contains(&folded))
            .map(|(field, _)| *field)
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Case-insensitive column key: separators collapse to `_`, invisible marks are dropped.
pub(crate) fn fold_column(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let mut folded = String::with_capacity(cleaned.len());
    let mut pending_separator = false;

    for ch in cleaned.trim().chars() {
        if ch.is_whitespace() || matches!(ch, '-' | '_' | '.') {
            pending_separator = true;
            continue;
        }
        if pending_separator && !folded.is_empty() {
            folded.push('_');
        }
        pending_separator = false;
        folded.extend(ch.to_lowercase());
    }

    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_column_collapses_separators_and_case() {
        assert_eq!(fold_column("\u{feff} First  Name "), "first_name");
        assert_eq!(fold_column("E-Mail"), "e_mail");
        assert_eq!(fold_column("loan__purpose"), "loan_purpose");
        assert_eq!(fold_column("Est. Value"), "est_value");
    }

    #[test]
    fn standard_table_is_disjoint_and_versioned() {
        let table = AliasTable::standard();
        assert_eq!(table.version(), 1);

        let mut seen = HashMap::new();
        for (field, aliases) in table.entries() {
            assert_eq!(aliases[0], field.as_str());
            for alias in aliases {
                assert!(
                    seen.insert(alias.clone(), field).is_none(),
                    "alias {alias} listed twice"
                );
            }
        }
        assert_eq!(seen.len(), table.entries().map(|(_, a)| a.len()).sum::<usize>());
    }

    #[test]
    fn new_rejects_alias_claimed_by_two_fields() {
        let error = AliasTable::new(
            2,
            vec![
                (CanonicalField::Email, vec!["contact"]),
                (CanonicalField::Phone, vec!["Contact"]),
            ],
        )
        .expect_err("duplicate alias rejected");

        match error {
            AliasTableError::DuplicateAlias {
                alias,
                first,
                second,
            } => {
                assert_eq!(alias, "contact");
                assert_eq!(first, CanonicalField::Email);
                assert_eq!(second, CanonicalField::Phone);
            }
            other => panic!("expected duplicate alias, got {other:?}"),
        }
    }

    #[test]
    fn new_rejects_canonical_name_used_by_another_field() {
        let error = AliasTable::new(2, vec![(CanonicalField::Notes, vec!["email"])])
            .expect_err("canonical name is reserved");
        assert!(matches!(error, AliasTableError::DuplicateAlias { .. }));
    }

    #[test]
    fn json_document_loads_and_resolves() {
        let table = AliasTable::from_json_reader(
            r#"{"version": 7, "aliases": {"email": ["Work Email"], "cltv": ["Combined LTV"]}}"#
                .as_bytes(),
        )
        .expect("table loads");

        assert_eq!(table.version(), 7);
        assert_eq!(table.resolve("work email"), Some(CanonicalField::Email));
        assert_eq!(table.resolve("COMBINED-LTV"), Some(CanonicalField::Cltv));
        assert_eq!(table.resolve("state"), Some(CanonicalField::State));
        assert_eq!(table.resolve("home value"), None);
    }

    #[test]
    fn json_document_rejects_unknown_fields() {
        let error = AliasTable::from_json_reader(
            r#"{"version": 2, "aliases": {"zip": ["postal"]}}"#.as_bytes(),
        )
        .expect_err("unknown field rejected");
        assert!(matches!(error, AliasTableError::UnknownField(name) if name == "zip"));
    }
}
