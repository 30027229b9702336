//! Inherited membrane-marker index.
//!
//! Builds, once per ontology snapshot, the closure of membrane-part
//! restriction assertions over the subclass hierarchy: every class ends
//! up with the union of its own and all its ancestors' direct
//! restrictions. The hierarchy is held as an arena of indexed class
//! nodes and closed by an iterative worklist propagation, so deep
//! hierarchies neither recurse nor re-traverse converged regions.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::BuildError;
use crate::model::{Curie, MarkerProfile, ProfileEntry, RestrictionPredicate};

/// Direct subclass/restriction data for one class, before closure.
#[derive(Debug, Clone)]
pub struct ClassRecord {
    /// The class identifier.
    pub id: Curie,
    /// Direct superclasses.
    pub parents: Vec<Curie>,
    /// Direct existential restrictions asserted on this class.
    pub restrictions: Vec<(RestrictionPredicate, Curie)>,
}

/// Arena-based builder for the [`MarkerIndex`].
///
/// Classes referenced only as parents are materialized as empty nodes;
/// ontology extracts routinely trim the upper hierarchy away and an
/// absent ancestor simply contributes nothing.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    ids: Vec<Curie>,
    index_of: HashMap<Curie, usize>,
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
    sets: Vec<BTreeSet<ProfileEntry>>,
}

impl HierarchyBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one class record, merging with any node already created for
    /// the same id.
    pub fn add_class(&mut self, record: ClassRecord) {
        let node = self.intern(record.id);
        for parent in record.parents {
            let p = self.intern(parent);
            if !self.parents[node].contains(&p) {
                self.parents[node].push(p);
                self.children[p].push(node);
            }
        }
        for (predicate, filler) in record.restrictions {
            self.sets[node].insert(ProfileEntry { predicate, filler });
        }
    }

    /// Loads class records from a levels table at `path`.
    ///
    /// Expected header columns: `ID`, `Parents`, then one column per
    /// predicate (`has-part`, `lacks-part`, `high-amount`, `low-amount`),
    /// each cell a `|`-separated list of CURIEs.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the file cannot be read, a required
    /// column is missing, or any identifier is malformed.
    pub fn add_tsv(&mut self, path: &Path) -> Result<(), BuildError> {
        let file = File::open(path).map_err(|source| BuildError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.add_tsv_reader(file, &path.display().to_string())
    }

    /// Loads class records from any reader; see [`HierarchyBuilder::add_tsv`].
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the content is not valid TSV, a
    /// required column is missing, or any identifier is malformed.
    pub fn add_tsv_reader<R: Read>(
        &mut self,
        reader: R,
        source_name: &str,
    ) -> Result<(), BuildError> {
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

        let id_col = require_column(&headers, "ID", source_name)?;
        let parents_col = headers.iter().position(|h| h == "Parents");
        let mut predicate_cols = Vec::with_capacity(RestrictionPredicate::ALL.len());
        for predicate in RestrictionPredicate::ALL {
            predicate_cols.push((
                predicate,
                require_column(&headers, predicate.column_name(), source_name)?,
            ));
        }

        let mut classes = 0usize;
        for record in rdr.records() {
            let record = record.map_err(|source| BuildError::Tsv {
                source_name: source_name.to_string(),
                source,
            })?;
            let Some(id) = record.get(id_col).map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            let id = Curie::parse(id)?;

            let mut parents = Vec::new();
            if let Some(cell) = parents_col.and_then(|c| record.get(c)) {
                for part in split_list(cell) {
                    parents.push(Curie::parse(part)?);
                }
            }

            let mut restrictions = Vec::new();
            for &(predicate, col) in &predicate_cols {
                if let Some(cell) = record.get(col) {
                    for part in split_list(cell) {
                        restrictions.push((predicate, Curie::parse(part)?));
                    }
                }
            }

            self.add_class(ClassRecord {
                id,
                parents,
                restrictions,
            });
            classes += 1;
        }
        debug!(source = source_name, classes, "loaded hierarchy source");
        Ok(())
    }

    /// Propagates inherited restrictions down the hierarchy until no
    /// profile changes, returning the number of entries added.
    ///
    /// Propagation is monotone over finite sets, so it converges even on
    /// a malformed cyclic input; after convergence a second call returns
    /// zero.
    pub fn propagate(&mut self) -> usize {
        let n = self.ids.len();
        let mut queued = vec![true; n];
        let mut work: VecDeque<usize> = (0..n).collect();
        let mut added = 0usize;

        while let Some(node) = work.pop_front() {
            queued[node] = false;
            let inherited: Vec<ProfileEntry> = self.parents[node]
                .iter()
                .flat_map(|&p| self.sets[p].iter().cloned())
                .collect();
            let mut changed = false;
            for entry in inherited {
                if self.sets[node].insert(entry) {
                    added += 1;
                    changed = true;
                }
            }
            if changed {
                for &child in &self.children[node] {
                    if !queued[child] {
                        queued[child] = true;
                        work.push_back(child);
                    }
                }
            }
        }
        added
    }

    /// Closes the hierarchy and produces the immutable index.
    #[must_use]
    pub fn build(mut self) -> MarkerIndex {
        let added = self.propagate();
        info!(
            classes = self.ids.len(),
            inherited_entries = added,
            "marker inheritance index built"
        );
        let profiles = self
            .ids
            .into_iter()
            .zip(self.sets)
            .map(|(id, set)| (id, MarkerProfile::new(set)))
            .collect();
        MarkerIndex { profiles }
    }

    fn intern(&mut self, id: Curie) -> usize {
        if let Some(&i) = self.index_of.get(&id) {
            return i;
        }
        let i = self.ids.len();
        self.index_of.insert(id.clone(), i);
        self.ids.push(id);
        self.parents.push(Vec::new());
        self.children.push(Vec::new());
        self.sets.push(BTreeSet::new());
        i
    }
}

/// Splits a `|`-separated cell into trimmed, nonempty parts.
fn split_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split('|').map(str::trim).filter(|s| !s.is_empty())
}

fn require_column(
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

/// Immutable per-class marker profiles with O(1) lookup.
///
/// Constructed once per ontology snapshot and shared read-only across
/// every row validation in a run.
#[derive(Debug, Default)]
pub struct MarkerIndex {
    profiles: HashMap<Curie, MarkerProfile>,
}

impl MarkerIndex {
    /// The closed profile for a class, if the class is known.
    #[must_use]
    pub fn profile(&self, id: &Curie) -> Option<&MarkerProfile> {
        self.profiles.get(id)
    }

    /// Number of classes in the index.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.profiles.len()
    }
}
