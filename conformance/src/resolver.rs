//! Tiered label resolution.
//!
//! Maps raw text to a canonical ontology id through an ordered list of
//! source tiers: curated overrides first, then preferred/short labels,
//! primary labels, and synonyms — each pass exact first, then with
//! normalized comparison. The tier order is configuration, not control
//! flow, because override lists are revised independently of the
//! ontology release cycle.

use serde::Serialize;

use cellgate_ontology::{Curie, LabelEntry, LabelTable, MatchTier};

/// Outcome of resolving one raw label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Resolution {
    /// Exactly one id won at some tier.
    Resolved {
        /// The winning identifier.
        id: Curie,
        /// The tier that produced the match.
        tier: MatchTier,
        /// True if the match required normalized comparison.
        normalized: bool,
    },
    /// More than one distinct id at the winning tier; all candidates are
    /// listed and no automatic pick is ever made.
    Ambiguous {
        /// The equally-ranked candidates, in source order.
        candidates: Vec<Curie>,
    },
    /// No tier produced a candidate.
    Unresolved,
}

impl Resolution {
    /// The resolved id, if resolution succeeded.
    #[must_use]
    pub fn id(&self) -> Option<&Curie> {
        match self {
            Resolution::Resolved { id, .. } => Some(id),
            _ => None,
        }
    }

    /// True if exactly one id was found.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// Resolves raw text against one [`LabelTable`] under a tier policy.
#[derive(Debug)]
pub struct LabelResolver<'a> {
    table: &'a LabelTable,
    tiers: Vec<MatchTier>,
}

impl<'a> LabelResolver<'a> {
    /// Default tier precedence, highest first.
    pub const DEFAULT_TIERS: [MatchTier; 4] = [
        MatchTier::Special,
        MatchTier::Short,
        MatchTier::Label,
        MatchTier::Synonym,
    ];

    /// Creates a resolver with the default tier order.
    #[must_use]
    pub fn new(table: &'a LabelTable) -> Self {
        Self::with_tiers(table, Self::DEFAULT_TIERS)
    }

    /// Creates a resolver with an explicit tier order.
    #[must_use]
    pub fn with_tiers<I>(table: &'a LabelTable, tiers: I) -> Self
    where
        I: IntoIterator<Item = MatchTier>,
    {
        LabelResolver {
            table,
            tiers: tiers.into_iter().collect(),
        }
    }

    /// Resolves raw text to a canonical id.
    ///
    /// Walks the configured tiers over the exact index, then the same
    /// tiers over the normalized index. The first tier yielding exactly
    /// one distinct id wins; a tier yielding several distinct ids is an
    /// ambiguity and stops the walk.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Resolution {
        let raw = raw.trim();
        if raw.is_empty() {
            return Resolution::Unresolved;
        }
        let passes = [
            (false, self.table.exact_candidates(raw)),
            (true, self.table.normalized_candidates(raw)),
        ];
        for (normalized, candidates) in passes {
            for &tier in &self.tiers {
                match distinct_ids(candidates, tier).as_slice() {
                    [] => {}
                    [id] => {
                        return Resolution::Resolved {
                            id: (*id).clone(),
                            tier,
                            normalized,
                        }
                    }
                    many => {
                        return Resolution::Ambiguous {
                            candidates: many.iter().map(|&id| id.clone()).collect(),
                        }
                    }
                }
            }
        }
        Resolution::Unresolved
    }
}

/// Distinct candidate ids at one tier, preserving source order.
fn distinct_ids(candidates: &[LabelEntry], tier: MatchTier) -> Vec<&Curie> {
    let mut out: Vec<&Curie> = Vec::new();
    for entry in candidates.iter().filter(|e| e.tier == tier) {
        if !out.contains(&&entry.id) {
            out.push(&entry.id);
        }
    }
    out
}
