//! Core vocabulary types.
//!
//! These types represent the controlled vocabulary the validator works
//! over: CURIE identifiers, marker polarities, the four membrane-part
//! restriction predicates, and the per-class marker profiles derived
//! from them.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::BuildError;

/// A compact ontology identifier, e.g. `CL:0000624` or `PR:000001004`.
///
/// The string is validated on construction: exactly one colon, a
/// nonempty alphabetic prefix, and a nonempty local part. Whether the
/// prefix belongs to a *recognized* namespace is checked separately by
/// the table and hierarchy builders, which know which ontologies a run
/// draws from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Curie(String);

impl Curie {
    /// Parses a CURIE from its compact string form.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidId`] if the string does not have
    /// `PREFIX:LOCAL` shape.
    pub fn parse(s: &str) -> Result<Self, BuildError> {
        let s = s.trim();
        let Some((prefix, local)) = s.split_once(':') else {
            return Err(BuildError::InvalidId {
                id: s.to_string(),
                reason: "expected PREFIX:LOCAL",
            });
        };
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(BuildError::InvalidId {
                id: s.to_string(),
                reason: "namespace prefix must be nonempty and alphabetic",
            });
        }
        if local.is_empty() || local.contains(':') {
            return Err(BuildError::InvalidId {
                id: s.to_string(),
                reason: "local part must be nonempty and contain no colon",
            });
        }
        Ok(Curie(s.to_string()))
    }

    /// Returns the full compact form, e.g. `"CL:0000624"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespace prefix, e.g. `"CL"`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    /// Returns the local part after the colon, e.g. `"0000624"`.
    #[must_use]
    pub fn local(&self) -> &str {
        self.0.split_once(':').map(|(_, l)| l).unwrap_or_default()
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asserted expression level of a marker in a gating definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Marker present (`+`).
    Positive,
    /// Marker absent (`-`).
    Negative,
    /// Marker present at high amount (`++`).
    High,
    /// Marker present at low amount (`+-`).
    Low,
}

impl Polarity {
    /// Returns the lowercase name used in diagnostics (`"positive"` etc.).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::High => "high",
            Polarity::Low => "low",
        }
    }

    /// Returns the suffix symbol used in gating strings.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Polarity::Positive => "+",
            Polarity::Negative => "-",
            Polarity::High => "++",
            Polarity::Low => "+-",
        }
    }

    /// Parses a polarity from its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "positive" => Some(Polarity::Positive),
            "negative" => Some(Polarity::Negative),
            "high" => Some(Polarity::High),
            "low" => Some(Polarity::Low),
            _ => None,
        }
    }

    /// Returns the restriction predicate this polarity corresponds to.
    #[must_use]
    pub fn predicate(self) -> RestrictionPredicate {
        match self {
            Polarity::Positive => RestrictionPredicate::HasPart,
            Polarity::Negative => RestrictionPredicate::LacksPart,
            Polarity::High => RestrictionPredicate::HighAmount,
            Polarity::Low => RestrictionPredicate::LowAmount,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four membrane-part restriction predicates the index closes
/// over. Plain subclass edges carry none of these; only existential
/// restrictions on an actual class filler are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestrictionPredicate {
    /// `has plasma membrane part` — the marker is present.
    HasPart,
    /// `lacks plasma membrane part` — the marker is absent.
    LacksPart,
    /// `has high plasma membrane amount`.
    HighAmount,
    /// `has low plasma membrane amount`.
    LowAmount,
}

impl RestrictionPredicate {
    /// All four predicates, in the column order of the levels table.
    pub const ALL: [RestrictionPredicate; 4] = [
        RestrictionPredicate::HasPart,
        RestrictionPredicate::LacksPart,
        RestrictionPredicate::HighAmount,
        RestrictionPredicate::LowAmount,
    ];

    /// Returns the kebab-case column name (`"has-part"` etc.).
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            RestrictionPredicate::HasPart => "has-part",
            RestrictionPredicate::LacksPart => "lacks-part",
            RestrictionPredicate::HighAmount => "high-amount",
            RestrictionPredicate::LowAmount => "low-amount",
        }
    }

    /// Returns the gating polarity compatible with this predicate.
    #[must_use]
    pub fn polarity(self) -> Polarity {
        match self {
            RestrictionPredicate::HasPart => Polarity::Positive,
            RestrictionPredicate::LacksPart => Polarity::Negative,
            RestrictionPredicate::HighAmount => Polarity::High,
            RestrictionPredicate::LowAmount => Polarity::Low,
        }
    }
}

impl fmt::Display for RestrictionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A single marker/polarity assertion, as parsed from a gating string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerAssertion {
    /// Resolved marker identifier.
    pub marker: Curie,
    /// Asserted expression level.
    pub polarity: Polarity,
}

/// One inherited restriction in a class's marker profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ProfileEntry {
    /// The restriction predicate.
    pub predicate: RestrictionPredicate,
    /// The marker class the restriction points at.
    pub filler: Curie,
}

/// The complete membrane-marker profile of one cell class: the union of
/// its own and all its ancestors' direct restrictions, deduplicated by
/// `(predicate, filler)`. Immutable once the index is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkerProfile {
    entries: BTreeSet<ProfileEntry>,
}

impl MarkerProfile {
    /// Builds a profile from a set of entries.
    #[must_use]
    pub fn new(entries: BTreeSet<ProfileEntry>) -> Self {
        MarkerProfile { entries }
    }

    /// Iterates the entries in deterministic (predicate, filler) order.
    pub fn iter(&self) -> impl Iterator<Item = &ProfileEntry> {
        self.entries.iter()
    }

    /// Returns the expected polarity for a marker, if the profile
    /// mentions it.
    #[must_use]
    pub fn expected_polarity(&self, marker: &Curie) -> Option<Polarity> {
        self.entries
            .iter()
            .find(|e| &e.filler == marker)
            .map(|e| e.predicate.polarity())
    }

    /// Number of entries in the profile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the profile carries no restrictions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
