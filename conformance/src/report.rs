//! Validation report types: per-token findings, missing-marker records,
//! per-row reports, and batch aggregation.
//!
//! A report is created once per input row and never mutated afterwards;
//! ownership passes to the caller (printer, JSON writer). Every
//! recovered condition — unresolved labels, ambiguities, parse warnings,
//! validation findings — is data here, preserving the one-output-row-
//! per-input-row guarantee.

use serde::Serialize;

use cellgate_ontology::{Curie, Polarity};

use crate::gating::ParseWarning;
use crate::resolver::Resolution;

/// Overall verdict for one input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Cell resolved unambiguously and every check passed.
    Pass,
    /// At least one blocking condition was found.
    Fail,
}

impl Verdict {
    /// Uppercase form used in the TSV report column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

/// Status of a single gating token after comparison with the cell's
/// marker profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum GateStatus {
    /// The asserted polarity is compatible with the profile.
    Matched,
    /// Present in the profile at a finer level than asserted (or the
    /// converse): informational, does not fail the row.
    LevelNote {
        /// The polarity the profile expects.
        expected: Polarity,
    },
    /// Present in the profile with an incompatible polarity; also
    /// surfaces as a missing-required-marker record.
    Mismatched {
        /// The polarity the profile expects.
        expected: Polarity,
    },
    /// Asserted but absent from the (known-incomplete) profile;
    /// informational.
    UnexpectedMarker,
    /// The same marker is asserted elsewhere with a contradictory
    /// polarity; never silently resolved.
    ConflictingAssertion,
    /// The token matched no label in any tier.
    Unresolved,
    /// The token matched more than one id at its winning tier.
    Ambiguous {
        /// All equally-ranked candidate ids, verbatim.
        candidates: Vec<Curie>,
    },
}

impl GateStatus {
    /// True if this status blocks a `pass` verdict.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            GateStatus::Mismatched { .. }
                | GateStatus::ConflictingAssertion
                | GateStatus::Unresolved
                | GateStatus::Ambiguous { .. }
        )
    }
}

/// The evaluation of one gating token.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// The token as it appeared in the gating string.
    pub raw: String,
    /// Resolved marker id, when resolution succeeded.
    pub marker: Option<Curie>,
    /// Display label for the resolved marker.
    pub label: Option<String>,
    /// The polarity asserted by the token.
    pub polarity: Polarity,
    /// Comparison outcome.
    pub status: GateStatus,
}

/// A profile requirement with no compatible assertion in the gating.
#[derive(Debug, Clone, Serialize)]
pub struct MissingMarker {
    /// The required marker.
    pub marker: Curie,
    /// Display label for the marker.
    pub label: Option<String>,
    /// The polarity the profile expects.
    pub expected: Polarity,
    /// The polarity actually asserted, if the marker appeared with an
    /// incompatible one.
    pub observed: Option<Polarity>,
}

/// The complete validation result for one input row.
#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    /// 1-based source line of the input row (the header is line 1).
    pub row: usize,
    /// The "Cell Population Name" column, verbatim.
    pub name: String,
    /// The "Gating Definition" column, verbatim.
    pub gating: String,
    /// Resolution of the cell-population name.
    pub cell: Resolution,
    /// Display label for the resolved cell id.
    pub cell_label: Option<String>,
    /// Per-token findings, in gating order.
    pub findings: Vec<Finding>,
    /// Profile requirements not satisfied by the gating.
    pub missing: Vec<MissingMarker>,
    /// Warnings from gating-string parsing.
    pub warnings: Vec<ParseWarning>,
    /// Overall verdict.
    pub verdict: Verdict,
}

impl RowReport {
    /// Assembles a row report, computing the verdict from its parts.
    ///
    /// `pass` requires an unambiguous cell resolution, no blocking
    /// token status, and no missing required marker. Parse warnings and
    /// informational statuses never fail a row.
    #[must_use]
    pub fn new(
        row: usize,
        name: String,
        gating: String,
        cell: Resolution,
        cell_label: Option<String>,
        findings: Vec<Finding>,
        missing: Vec<MissingMarker>,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        let cell_ok = matches!(cell, Resolution::Resolved { .. });
        let blocking = findings.iter().any(|f| f.status.is_blocking());
        let verdict = if cell_ok && !blocking && missing.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        RowReport {
            row,
            name,
            gating,
            cell,
            cell_label,
            findings,
            missing,
            warnings,
            verdict,
        }
    }

    /// True if the row passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Human-readable diagnostics for every non-`Matched` condition on
    /// this row, in a stable order: cell issues, token issues, missing
    /// markers, parse warnings.
    #[must_use]
    pub fn issues(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.cell {
            Resolution::Resolved { .. } => {}
            Resolution::Ambiguous { candidates } => out.push(format!(
                "'{}' is ambiguous: {}",
                self.name,
                join_ids(candidates)
            )),
            Resolution::Unresolved => out.push(format!(
                "'{}' must be a name or synonym from the Cell Ontology",
                self.name
            )),
        }
        for finding in &self.findings {
            let shown = finding.label.as_deref().unwrap_or(&finding.raw);
            match &finding.status {
                GateStatus::Matched | GateStatus::UnexpectedMarker => {}
                GateStatus::LevelNote { expected } => {
                    if matches!(expected, Polarity::High | Polarity::Low) {
                        out.push(format!(
                            "for this cell population, {shown} has {expected} expression"
                        ));
                    } else {
                        out.push(format!(
                            "for this cell population, {shown} is positive, but not {}",
                            finding.polarity
                        ));
                    }
                }
                GateStatus::Mismatched { expected } => out.push(format!(
                    "for this cell population, {shown} must be {expected}"
                )),
                GateStatus::ConflictingAssertion => out.push(format!(
                    "'{}' is asserted with conflicting polarities",
                    shown
                )),
                GateStatus::Unresolved => out.push(format!(
                    "'{}' must be a name or synonym from the Protein Ontology",
                    finding.raw
                )),
                GateStatus::Ambiguous { candidates } => out.push(format!(
                    "'{}' is ambiguous: {}",
                    finding.raw,
                    join_ids(candidates)
                )),
            }
        }
        for missing in &self.missing {
            let shown = missing.label.as_deref().unwrap_or(missing.marker.as_str());
            match missing.observed {
                Some(observed) => out.push(format!(
                    "missing required marker {shown}: expected {}, got {observed}",
                    missing.expected
                )),
                None => out.push(format!(
                    "missing required marker {shown}: expected {}",
                    missing.expected
                )),
            }
        }
        for warning in &self.warnings {
            out.push(format!(
                "could not parse gating token '{}': {}",
                warning.token, warning.message
            ));
        }
        out
    }
}

/// Aggregated report over one batch of input rows.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    /// One report per input row, in input order.
    pub rows: Vec<RowReport>,
}

impl BatchReport {
    /// Creates an empty batch report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row report.
    pub fn push(&mut self, row: RowReport) {
        self.rows.push(row);
    }

    /// Number of failed rows.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.passed()).count()
    }

    /// True if every row passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

fn join_ids(ids: &[Curie]) -> String {
    ids.iter()
        .map(Curie::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curie(s: &str) -> Curie {
        Curie::parse(s).unwrap()
    }

    #[test]
    fn ambiguous_cell_cannot_pass() {
        let report = RowReport::new(
            2,
            "lymphocyte".into(),
            "CD3+".into(),
            Resolution::Ambiguous {
                candidates: vec![curie("CL:0000542"), curie("CL:0000945")],
            },
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(report.verdict, Verdict::Fail);
        assert!(report.issues()[0].contains("CL:0000542"));
        assert!(report.issues()[0].contains("CL:0000945"));
    }

    #[test]
    fn informational_statuses_do_not_fail() {
        let report = RowReport::new(
            2,
            "T cell".into(),
            "CD3+,CD99+".into(),
            Resolution::Resolved {
                id: curie("CL:0000084"),
                tier: cellgate_ontology::MatchTier::Label,
                normalized: false,
            },
            Some("T cell".into()),
            vec![
                Finding {
                    raw: "CD3+".into(),
                    marker: Some(curie("PR:000001889")),
                    label: Some("CD3e".into()),
                    polarity: Polarity::Positive,
                    status: GateStatus::Matched,
                },
                Finding {
                    raw: "CD99+".into(),
                    marker: Some(curie("PR:000001999")),
                    label: None,
                    polarity: Polarity::Positive,
                    status: GateStatus::UnexpectedMarker,
                },
            ],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn missing_marker_fails_and_is_itemized() {
        let report = RowReport::new(
            3,
            "CD8-positive T cell".into(),
            "CD3+,CD8-".into(),
            Resolution::Resolved {
                id: curie("CL:0000625"),
                tier: cellgate_ontology::MatchTier::Label,
                normalized: false,
            },
            None,
            Vec::new(),
            vec![MissingMarker {
                marker: curie("PR:000025402"),
                label: Some("CD8".into()),
                expected: Polarity::Positive,
                observed: Some(Polarity::Negative),
            }],
            Vec::new(),
        );
        assert_eq!(report.verdict, Verdict::Fail);
        let issues = report.issues();
        assert_eq!(
            issues,
            vec!["missing required marker CD8: expected positive, got negative".to_string()]
        );
    }
}
