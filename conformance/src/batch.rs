//! Batch input and report output.
//!
//! Input is a TSV with a header row naming at least `Cell Population
//! Name` and `Gating Definition`; extra columns pass through untouched.
//! Output preserves the row count: one report line per input line, in
//! input order, whatever was found on the row.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use cellgate_ontology::BuildError;
use tracing::debug;

use crate::report::{BatchReport, RowReport};

const NAME_COLUMN: &str = "Cell Population Name";
const GATING_COLUMN: &str = "Gating Definition";

/// One row of validator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// 1-based source line (the header is line 1, the first data row 2).
    pub line: usize,
    /// The cell-population name column, verbatim.
    pub name: String,
    /// The gating-definition column, verbatim.
    pub gating: String,
}

/// Reads validator input rows from a TSV file.
///
/// # Errors
///
/// Returns a [`BuildError`] if the file cannot be opened or does not
/// have the required columns.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<InputRow>, BuildError> {
    let file = File::open(path).map_err(|source| BuildError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_rows(file, &path.display().to_string())
}

/// Reads validator input rows from any reader.
///
/// `source_name` is used in error messages only. Rows shorter than the
/// required columns are kept with empty fields; the validator reports
/// them as unresolved rather than aborting the batch.
///
/// # Errors
///
/// Returns a [`BuildError`] if the content is not valid TSV or the
/// header lacks a required column.
pub fn read_rows<R: Read>(reader: R, source_name: &str) -> Result<Vec<InputRow>, BuildError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|source| BuildError::Tsv {
            source_name: source_name.to_string(),
            source,
        })?
        .clone();
    let name_col = required_column(&headers, NAME_COLUMN, source_name)?;
    let gating_col = required_column(&headers, GATING_COLUMN, source_name)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|source| BuildError::Tsv {
            source_name: source_name.to_string(),
            source,
        })?;
        rows.push(InputRow {
            line: i + 2,
            name: record.get(name_col).unwrap_or_default().trim().to_string(),
            gating: record.get(gating_col).unwrap_or_default().trim().to_string(),
        });
    }
    debug!(source = source_name, rows = rows.len(), "input batch read");
    Ok(rows)
}

fn required_column(
    headers: &csv::StringRecord,
    column: &'static str,
    source_name: &str,
) -> Result<usize, BuildError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or(BuildError::MissingColumn {
            column,
            source_name: source_name.to_string(),
        })
}

/// Writes a batch report as TSV, one line per input row.
///
/// # Errors
///
/// Returns the underlying error if the writer fails.
pub fn write_tsv<W: Write>(report: &BatchReport, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    wtr.write_record([
        "Row",
        NAME_COLUMN,
        "Cell ID",
        GATING_COLUMN,
        "Resolved Gating",
        "Diagnostics",
        "Verdict",
    ])?;
    for row in &report.rows {
        let line = row.row.to_string();
        let resolved = resolved_gating(row);
        let diagnostics = row.issues().join("; ");
        wtr.write_record([
            line.as_str(),
            row.name.as_str(),
            row.cell.id().map(|id| id.as_str()).unwrap_or_default(),
            row.gating.as_str(),
            resolved.as_str(),
            diagnostics.as_str(),
            row.verdict.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Canonical rendering of the gating after resolution: display labels
/// where they exist, raw tokens where they do not.
fn resolved_gating(row: &RowReport) -> String {
    row.findings
        .iter()
        .map(|f| {
            let shown = f.label.as_deref().unwrap_or(&f.raw);
            match f.marker {
                Some(_) => format!("{shown}{}", f.polarity.symbol()),
                None => f.raw.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
