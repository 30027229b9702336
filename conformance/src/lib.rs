//! Gate/cell-type consistency validation.
//!
//! This crate checks reported immunophenotypes for internal consistency:
//! each input row carries a free-text cell-population name and a gating
//! definition, and the validator resolves both against ontology
//! vocabularies, then compares the asserted marker polarities with the
//! membrane-marker profile the named cell class inherits through the
//! ontology.
//!
//! # Entry Point
//!
//! ```no_run
//! use cellgate_conformance::{batch, Validator};
//! use cellgate_conformance::gating::ValueScale;
//! use cellgate_ontology::{HierarchyBuilder, TableBuilder};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cells = TableBuilder::new();
//! cells.add_tsv(cellgate_ontology::MatchTier::Label, Path::new("cl-labels.tsv"))?;
//! let cells = cells.build();
//! let markers = TableBuilder::new().build();
//! let mut hierarchy = HierarchyBuilder::new();
//! hierarchy.add_tsv(Path::new("cl-levels.tsv"))?;
//! let index = hierarchy.build();
//!
//! let validator = Validator::new(&cells, &markers, &index, ValueScale::builtin());
//! let rows = batch::read_rows_from_path(Path::new("input.tsv"))?;
//! let report = validator.validate_rows(&rows);
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use cellgate_ontology::{LabelTable, MarkerIndex, MarkerProfile};

pub mod batch;
pub mod engine;
pub mod gating;
pub mod report;
pub mod resolver;
pub mod tests;

pub use report::{BatchReport, Finding, GateStatus, MissingMarker, RowReport, Verdict};
pub use resolver::{LabelResolver, Resolution};

use engine::ResolvedGate;
use gating::ValueScale;

/// Validates input rows against a pair of label tables and a marker
/// inheritance index.
///
/// All lookup structures are built once per ontology snapshot and shared
/// read-only; validating a row allocates nothing global and rows may be
/// processed in any order.
#[derive(Debug)]
pub struct Validator<'a> {
    cell_table: &'a LabelTable,
    marker_table: &'a LabelTable,
    cells: LabelResolver<'a>,
    markers: LabelResolver<'a>,
    index: &'a MarkerIndex,
    scale: ValueScale,
}

impl<'a> Validator<'a> {
    /// Creates a validator over cell and marker vocabularies, a marker
    /// index, and a suffix scale, with the default tier precedence.
    #[must_use]
    pub fn new(
        cell_table: &'a LabelTable,
        marker_table: &'a LabelTable,
        index: &'a MarkerIndex,
        scale: ValueScale,
    ) -> Self {
        Validator {
            cell_table,
            marker_table,
            cells: LabelResolver::new(cell_table),
            markers: LabelResolver::new(marker_table),
            index,
            scale,
        }
    }

    /// Validates one input row.
    #[must_use]
    pub fn validate_row(&self, row: &batch::InputRow) -> RowReport {
        let cleaned = clean_population_name(&row.name);
        let cell = self.cells.resolve(&cleaned);
        let cell_label = cell
            .id()
            .and_then(|id| self.cell_table.display_label(id))
            .map(str::to_string);

        let (tokens, warnings) = gating::parse_gating(&row.gating, &self.scale);
        let gates: Vec<ResolvedGate> = tokens
            .into_iter()
            .map(|t| ResolvedGate {
                resolution: self.markers.resolve(&t.marker),
                raw: t.raw,
                polarity: t.polarity,
            })
            .collect();

        // A cell class the index has never seen compares against an
        // empty profile; its gating still parses and resolves.
        let empty = MarkerProfile::default();
        let profile = cell
            .id()
            .and_then(|id| self.index.profile(id))
            .unwrap_or(&empty);
        let mut comparison = engine::compare(profile, &gates);

        for finding in &mut comparison.findings {
            finding.label = finding
                .marker
                .as_ref()
                .and_then(|id| self.marker_table.display_label(id))
                .map(str::to_string);
        }
        for missing in &mut comparison.missing {
            missing.label = self
                .marker_table
                .display_label(&missing.marker)
                .map(str::to_string);
        }

        RowReport::new(
            row.line,
            row.name.clone(),
            row.gating.clone(),
            cell,
            cell_label,
            comparison.findings,
            comparison.missing,
            warnings,
        )
    }

    /// Validates a whole batch, preserving input order and row count.
    #[must_use]
    pub fn validate_rows(&self, rows: &[batch::InputRow]) -> BatchReport {
        let mut report = BatchReport::new();
        for row in rows {
            report.push(self.validate_row(row));
        }
        info!(
            rows = report.rows.len(),
            failures = report.failure_count(),
            "batch validated"
        );
        report
    }
}

/// Strips reporting decorations from a population name before lookup:
/// a panel prefix (`T: `, `B: `, `NK: `, `DC: `, `M: `) and anything
/// after an ` & ` conjunction.
#[must_use]
pub fn clean_population_name(raw: &str) -> String {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = PREFIX.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // the pattern is a literal
        Regex::new(r"^(?:DC|NK|B|M|T):\s*").unwrap()
    });
    let head = raw.split(" & ").next().unwrap_or(raw).trim();
    re.replace(head, "").trim().to_string()
}
