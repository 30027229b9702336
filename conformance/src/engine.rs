//! Consistency engine.
//!
//! Pure comparison of a cell class's inherited marker profile against
//! the resolved assertions of one gating string. No I/O, no shared
//! state: given the same profile and gates, the output is always the
//! same, which makes this the natural unit for isolated testing.

use cellgate_ontology::{Curie, MarkerProfile, Polarity};

use crate::report::{Finding, GateStatus, MissingMarker};
use crate::resolver::Resolution;

/// One gating token after parsing and marker resolution.
#[derive(Debug, Clone)]
pub struct ResolvedGate {
    /// The token as written.
    pub raw: String,
    /// The asserted polarity.
    pub polarity: Polarity,
    /// Resolution of the marker text.
    pub resolution: Resolution,
}

/// Output of one profile/gating comparison.
#[derive(Debug, Default)]
pub struct Comparison {
    /// Per-token findings, in gating order. Labels are left for the
    /// caller to decorate.
    pub findings: Vec<Finding>,
    /// Profile requirements with no compatible assertion.
    pub missing: Vec<MissingMarker>,
}

/// Compares resolved gating assertions against a marker profile.
///
/// Every token yields exactly one finding; unresolved and ambiguous
/// tokens are carried through verbatim. Every profile entry with no
/// compatibly-polarized assertion yields a [`MissingMarker`], recording
/// the observed polarity when the marker was asserted with the wrong
/// one. Contradictory polarities for one resolved marker mark every
/// occurrence as conflicting rather than keeping a last-seen value.
#[must_use]
pub fn compare(profile: &MarkerProfile, gates: &[ResolvedGate]) -> Comparison {
    let mut comparison = Comparison::default();

    for gate in gates {
        let finding = match &gate.resolution {
            Resolution::Unresolved => Finding {
                raw: gate.raw.clone(),
                marker: None,
                label: None,
                polarity: gate.polarity,
                status: GateStatus::Unresolved,
            },
            Resolution::Ambiguous { candidates } => Finding {
                raw: gate.raw.clone(),
                marker: None,
                label: None,
                polarity: gate.polarity,
                status: GateStatus::Ambiguous {
                    candidates: candidates.clone(),
                },
            },
            Resolution::Resolved { id, .. } => Finding {
                raw: gate.raw.clone(),
                marker: Some(id.clone()),
                label: None,
                polarity: gate.polarity,
                status: status_for(id, gate.polarity, profile, gates),
            },
        };
        comparison.findings.push(finding);
    }

    for entry in profile.iter() {
        let expected = entry.predicate.polarity();
        let asserted: Vec<Polarity> = gates
            .iter()
            .filter(|g| g.resolution.id() == Some(&entry.filler))
            .map(|g| g.polarity)
            .collect();
        let satisfied = asserted
            .iter()
            .any(|&got| got == expected || is_level_note(expected, got));
        if !satisfied {
            comparison.missing.push(MissingMarker {
                marker: entry.filler.clone(),
                label: None,
                expected,
                observed: asserted.first().copied(),
            });
        }
    }

    comparison
}

fn status_for(
    id: &Curie,
    polarity: Polarity,
    profile: &MarkerProfile,
    gates: &[ResolvedGate],
) -> GateStatus {
    let conflicting = gates.iter().any(|g| {
        g.resolution.id() == Some(id) && g.polarity != polarity
    });
    if conflicting {
        return GateStatus::ConflictingAssertion;
    }
    match profile.expected_polarity(id) {
        None => GateStatus::UnexpectedMarker,
        Some(expected) if expected == polarity => GateStatus::Matched,
        Some(expected) if is_level_note(expected, polarity) => {
            GateStatus::LevelNote { expected }
        }
        Some(expected) => GateStatus::Mismatched { expected },
    }
}

/// Positive and high/low disagree only in degree, not in sign; the
/// ontology profiles are coarser than reported gating, so this is a
/// note rather than a failure.
fn is_level_note(expected: Polarity, got: Polarity) -> bool {
    matches!(
        (expected, got),
        (Polarity::High | Polarity::Low, Polarity::Positive)
            | (Polarity::Positive, Polarity::High | Polarity::Low)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgate_ontology::{MatchTier, ProfileEntry, RestrictionPredicate};
    use std::collections::BTreeSet;

    fn curie(s: &str) -> Curie {
        Curie::parse(s).unwrap()
    }

    fn profile(entries: &[(RestrictionPredicate, &str)]) -> MarkerProfile {
        MarkerProfile::new(
            entries
                .iter()
                .map(|&(predicate, filler)| ProfileEntry {
                    predicate,
                    filler: curie(filler),
                })
                .collect::<BTreeSet<_>>(),
        )
    }

    fn resolved(raw: &str, id: &str, polarity: Polarity) -> ResolvedGate {
        ResolvedGate {
            raw: raw.to_string(),
            polarity,
            resolution: Resolution::Resolved {
                id: curie(id),
                tier: MatchTier::Label,
                normalized: false,
            },
        }
    }

    #[test]
    fn compatible_assertions_match() {
        let profile = profile(&[(RestrictionPredicate::HasPart, "PR:000025402")]);
        let gates = vec![
            resolved("CD3+", "PR:000001889", Polarity::Positive),
            resolved("CD8+", "PR:000025402", Polarity::Positive),
        ];
        let comparison = compare(&profile, &gates);
        assert!(comparison.missing.is_empty());
        assert_eq!(comparison.findings[0].status, GateStatus::UnexpectedMarker);
        assert_eq!(comparison.findings[1].status, GateStatus::Matched);
    }

    #[test]
    fn wrong_sign_is_mismatch_and_missing() {
        let profile = profile(&[(RestrictionPredicate::HasPart, "PR:000025402")]);
        let gates = vec![resolved("CD8-", "PR:000025402", Polarity::Negative)];
        let comparison = compare(&profile, &gates);
        assert_eq!(
            comparison.findings[0].status,
            GateStatus::Mismatched {
                expected: Polarity::Positive
            }
        );
        assert_eq!(comparison.missing.len(), 1);
        let missing = &comparison.missing[0];
        assert_eq!(missing.expected, Polarity::Positive);
        assert_eq!(missing.observed, Some(Polarity::Negative));
    }

    #[test]
    fn absent_required_marker_is_missing_without_observation() {
        let profile = profile(&[(RestrictionPredicate::LacksPart, "PR:000001002")]);
        let comparison = compare(&profile, &[]);
        assert_eq!(comparison.missing.len(), 1);
        assert_eq!(comparison.missing[0].observed, None);
        assert_eq!(comparison.missing[0].expected, Polarity::Negative);
    }

    #[test]
    fn degree_difference_is_a_note_and_satisfies() {
        let profile = profile(&[(RestrictionPredicate::HighAmount, "PR:000001963")]);
        let gates = vec![resolved("CD27+", "PR:000001963", Polarity::Positive)];
        let comparison = compare(&profile, &gates);
        assert_eq!(
            comparison.findings[0].status,
            GateStatus::LevelNote {
                expected: Polarity::High
            }
        );
        assert!(comparison.missing.is_empty());
    }

    #[test]
    fn conflicting_polarities_mark_every_occurrence() {
        let profile = MarkerProfile::default();
        let gates = vec![
            resolved("CD3+", "PR:000001889", Polarity::Positive),
            resolved("CD3-", "PR:000001889", Polarity::Negative),
        ];
        let comparison = compare(&profile, &gates);
        assert_eq!(
            comparison.findings[0].status,
            GateStatus::ConflictingAssertion
        );
        assert_eq!(
            comparison.findings[1].status,
            GateStatus::ConflictingAssertion
        );
    }

    #[test]
    fn unresolved_tokens_carry_through() {
        let profile = MarkerProfile::default();
        let gates = vec![ResolvedGate {
            raw: "XYZ123".to_string(),
            polarity: Polarity::Positive,
            resolution: Resolution::Unresolved,
        }];
        let comparison = compare(&profile, &gates);
        assert_eq!(comparison.findings[0].status, GateStatus::Unresolved);
        assert_eq!(comparison.findings[0].marker, None);
    }

    #[test]
    fn deterministic_given_same_inputs() {
        let profile = profile(&[
            (RestrictionPredicate::HasPart, "PR:000025402"),
            (RestrictionPredicate::LacksPart, "PR:000001002"),
        ]);
        let gates = vec![resolved("CD8+", "PR:000025402", Polarity::Positive)];
        let first = compare(&profile, &gates);
        let second = compare(&profile, &gates);
        assert_eq!(first.findings.len(), second.findings.len());
        assert_eq!(first.missing.len(), second.missing.len());
        assert_eq!(first.missing[0].marker, second.missing[0].marker);
    }
}
