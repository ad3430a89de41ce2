//! CSV intake and export for lead batches.

use std::io::{Read, Write};
use std::path::Path;

use tracing::warn;

use super::domain::LeadRecord;
use super::ranking::{LeadRanking, RowFailure, TriagedLead};

#[derive(Debug, thiserror::Error)]
pub enum LeadImportError {
    #[error("failed to read lead file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Parsed CSV batch. Rows are numbered from zero, excluding the header.
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub headers: Vec<String>,
    pub rows: Vec<(usize, LeadRecord)>,
    pub failures: Vec<RowFailure>,
}

pub fn import_csv_path<P: AsRef<Path>>(path: P) -> Result<CsvImport, LeadImportError> {
    let file = std::fs::File::open(path)?;
    import_csv(file)
}

/// Reads a header row and data rows. A malformed data row is recorded as a failure
/// and skipped; only an unreadable header aborts the import.
pub fn import_csv<R: Read>(reader: R) -> Result<CsvImport, LeadImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let mut import = CsvImport {
        headers,
        ..CsvImport::default()
    };

    for (row, result) in csv_reader.records().enumerate() {
        match result {
            Ok(record) => {
                let columns = import
                    .headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                import.rows.push((row, LeadRecord::from_columns(columns)));
            }
            Err(err) => {
                warn!(row, error = %err, "skipping malformed lead row");
                import.failures.push(RowFailure {
                    row,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(import)
}

/// Writes ranked leads with `score` and `score_reasons` columns appended.
pub fn write_ranked_csv<W: Write>(writer: W, ranking: &LeadRanking) -> Result<(), csv::Error> {
    let rows = ranking.ranked.iter().map(|lead| {
        (
            &lead.record,
            vec![lead.score.total.to_string(), lead.score.reasons()],
        )
    });
    write_scored(writer, rows, &["score", "score_reasons"])
}

/// Writes triaged leads with `score`, `score_band` and `score_reasons` columns appended.
pub fn write_triaged_csv<W: Write>(writer: W, leads: &[TriagedLead]) -> Result<(), csv::Error> {
    let rows = leads.iter().map(|lead| {
        (
            &lead.record,
            vec![
                lead.outcome.total.to_string(),
                lead.outcome.band.label().to_string(),
                lead.outcome.reasons(),
            ],
        )
    });
    write_scored(writer, rows, &["score", "score_band", "score_reasons"])
}

fn write_scored<'a, W, I>(writer: W, rows: I, extra_headers: &[&str]) -> Result<(), csv::Error>
where
    W: Write,
    I: Iterator<Item = (&'a LeadRecord, Vec<String>)> + Clone,
{
    let mut columns: Vec<&str> = Vec::new();
    for (record, _) in rows.clone() {
        for column in record.columns() {
            if !columns.contains(&column) && !extra_headers.contains(&column) {
                columns.push(column);
            }
        }
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns.iter().copied().chain(extra_headers.iter().copied()))?;

    for (record, extras) in rows {
        let values = columns
            .iter()
            .map(|column| record.get(column).unwrap_or_default())
            .chain(extras.iter().map(String::as_str));
        csv_writer.write_record(values)?;
    }

    csv_writer.flush()?;
    Ok(())
}
