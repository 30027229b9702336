//! End-to-end validation scenarios over the fixture ontology slice.

use cellgate_conformance::gating::ValueScale;
use cellgate_conformance::tests::fixtures;
use cellgate_conformance::{batch, GateStatus, Validator, Verdict};
use cellgate_ontology::{HierarchyBuilder, LabelTable, MarkerIndex, MatchTier, TableBuilder};

fn cell_table() -> LabelTable {
    let mut builder = TableBuilder::new();
    builder
        .add_tsv_reader(MatchTier::Label, fixtures::CELL_LABELS.as_bytes(), "cl-labels.tsv")
        .unwrap();
    builder
        .add_tsv_reader(
            MatchTier::Synonym,
            fixtures::CELL_SYNONYMS.as_bytes(),
            "cl-synonyms.tsv",
        )
        .unwrap();
    builder.build()
}

fn marker_table() -> LabelTable {
    let mut builder = TableBuilder::new();
    builder
        .add_special_reader(fixtures::SPECIAL_GATES.as_bytes(), "special-gates.tsv")
        .unwrap();
    builder
        .add_tsv_reader(MatchTier::Short, fixtures::MARKER_SHORTS.as_bytes(), "pro-short.tsv")
        .unwrap();
    builder
        .add_tsv_reader(MatchTier::Label, fixtures::MARKER_LABELS.as_bytes(), "pro-labels.tsv")
        .unwrap();
    builder
        .add_tsv_reader(
            MatchTier::Synonym,
            fixtures::MARKER_SYNONYMS.as_bytes(),
            "pro-synonyms.tsv",
        )
        .unwrap();
    builder.build()
}

fn marker_index() -> MarkerIndex {
    let mut builder = HierarchyBuilder::new();
    builder
        .add_tsv_reader(fixtures::CL_LEVELS.as_bytes(), "cl-levels.tsv")
        .unwrap();
    builder.build()
}

fn scale() -> ValueScale {
    ValueScale::from_reader(fixtures::VALUE_SCALE.as_bytes(), "value-scale.tsv").unwrap()
}

fn run_batch() -> cellgate_conformance::BatchReport {
    let cells = cell_table();
    let markers = marker_table();
    let index = marker_index();
    let validator = Validator::new(&cells, &markers, &index, scale());
    let rows = batch::read_rows(fixtures::INPUT_BATCH.as_bytes(), "input.tsv").unwrap();
    validator.validate_rows(&rows)
}

#[test]
fn one_report_per_input_row_in_order() {
    let report = run_batch();
    assert_eq!(report.rows.len(), 6);
    let lines: Vec<usize> = report.rows.iter().map(|r| r.row).collect();
    assert_eq!(lines, vec![2, 3, 4, 5, 6, 7]);
}

#[test]
fn verdicts_across_the_batch() {
    let report = run_batch();
    let verdicts: Vec<Verdict> = report.rows.iter().map(|r| r.verdict).collect();
    assert_eq!(
        verdicts,
        vec![
            Verdict::Pass, // CD8+ T cell, full matching gating
            Verdict::Fail, // CD8 asserted negative
            Verdict::Pass, // CD4 T cell behind a panel prefix
            Verdict::Fail, // unresolvable gating token
            Verdict::Fail, // unresolvable population name
            Verdict::Pass, // NK cell with a level note
        ]
    );
    assert_eq!(report.failure_count(), 3);
    assert!(!report.all_passed());
}

#[test]
fn sign_flip_reports_missing_required_marker() {
    let report = run_batch();
    let row = &report.rows[1];
    assert_eq!(row.verdict, Verdict::Fail);
    let issues = row.issues();
    assert!(issues
        .iter()
        .any(|i| i == "missing required marker CD8: expected positive, got negative"));
    // The lacks-part requirement on CD4 has no assertion at all.
    assert!(issues
        .iter()
        .any(|i| i == "missing required marker CD4: expected negative"));
}

#[test]
fn unknown_gating_token_blocks_the_row() {
    let report = run_batch();
    let row = &report.rows[3];
    assert_eq!(row.verdict, Verdict::Fail);
    assert!(row
        .issues()
        .iter()
        .any(|i| i == "'XYZ123' must be a name or synonym from the Protein Ontology"));
    // The resolvable CD19 token is still fully evaluated.
    assert_eq!(row.findings[0].status, GateStatus::Matched);
}

#[test]
fn unknown_population_name_blocks_the_row() {
    let report = run_batch();
    let row = &report.rows[4];
    assert_eq!(row.verdict, Verdict::Fail);
    assert!(row
        .issues()
        .iter()
        .any(|i| i == "'mystery population' must be a name or synonym from the Cell Ontology"));
}

#[test]
fn level_difference_is_a_note_not_a_failure() {
    let report = run_batch();
    let row = &report.rows[5];
    assert_eq!(row.verdict, Verdict::Pass);
    assert!(row
        .issues()
        .iter()
        .any(|i| i.contains("has low expression")));
}

#[test]
fn special_override_wins_marker_resolution() {
    let report = run_batch();
    // "CD3" maps through the curated override, not the PRO synonyms.
    let finding = &report.rows[0].findings[0];
    assert_eq!(
        finding.marker.as_ref().map(|id| id.as_str()),
        Some("PR:000001889")
    );
    assert_eq!(finding.label.as_deref(), Some("CD3"));
}

#[test]
fn panel_prefix_and_conjunction_resolve_to_the_same_class() {
    let report = run_batch();
    let row = &report.rows[2];
    assert_eq!(
        row.cell.id().map(|id| id.as_str()),
        Some("CL:0000624")
    );
    assert_eq!(row.verdict, Verdict::Pass);
}

#[test]
fn tsv_report_round_trips_the_batch() {
    let report = run_batch();
    let mut out = Vec::new();
    batch::write_tsv(&report, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[1].ends_with("PASS"));
    assert!(lines[2].ends_with("FAIL"));
}

#[test]
fn report_serializes_to_json() {
    let report = run_batch();
    let value = serde_json::to_value(&report).unwrap();
    let rows = value.get("rows").and_then(|r| r.as_array()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["verdict"], "pass");
    assert_eq!(rows[0]["cell"]["id"], "CL:0000625");
}
