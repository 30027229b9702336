//! Label→identifier lookup tables.
//!
//! The table builder merges N ordered synonym sources — curated override
//! lists, preferred/short labels, primary ontology labels, and synonym
//! exports — into one [`LabelTable`]. Each entry remembers which tier it
//! came from so the resolver can apply its precedence policy; candidates
//! that collide at the same tier are all retained, never dropped.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::BuildError;
use crate::model::Curie;

/// The source tier a label entry came from, in default precedence order
/// (highest first). The resolver treats the ordering as policy data, so
/// a run may rearrange tiers without touching lookup code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Curated override/special list correcting known ontology gaps.
    Special,
    /// Preferred/short label (e.g. `PRO-short-label` exports).
    Short,
    /// Primary ontology label (`rdfs:label`).
    Label,
    /// Any listed synonym (e.g. exact-synonym exports).
    Synonym,
}

impl MatchTier {
    /// Human-readable tier name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Special => "special",
            MatchTier::Short => "short label",
            MatchTier::Label => "label",
            MatchTier::Synonym => "synonym",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate identifier for a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    /// The candidate identifier.
    pub id: Curie,
    /// The tier of the source that contributed it.
    pub tier: MatchTier,
}

/// Case-folds a label and collapses runs of whitespace to single spaces.
///
/// This is the only normalization the validator performs; anything
/// beyond exact/normalized string matching is out of scope.
#[must_use]
pub fn normalize_label(raw: &str) -> String {
    let folded = raw.trim().to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut in_space = false;
    for c in folded.chars() {
        if c.is_whitespace() {
            if !in_space && !out.is_empty() {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Immutable label→id lookup built by [`TableBuilder`].
///
/// Holds two indexes over the same entries: one keyed by the raw label
/// and one keyed by its normalized form. Candidate lists preserve source
/// order within each key.
#[derive(Debug, Default)]
pub struct LabelTable {
    exact: HashMap<String, Vec<LabelEntry>>,
    normalized: HashMap<String, Vec<LabelEntry>>,
    display: HashMap<Curie, String>,
}

impl LabelTable {
    /// Candidates whose source label matches `label` exactly.
    #[must_use]
    pub fn exact_candidates(&self, label: &str) -> &[LabelEntry] {
        self.exact.get(label).map_or(&[], Vec::as_slice)
    }

    /// Candidates whose normalized source label matches the normalized
    /// form of `label`.
    #[must_use]
    pub fn normalized_candidates(&self, label: &str) -> &[LabelEntry] {
        self.normalized
            .get(&normalize_label(label))
            .map_or(&[], Vec::as_slice)
    }

    /// The first-seen label for an identifier, for diagnostics.
    #[must_use]
    pub fn display_label(&self, id: &Curie) -> Option<&str> {
        self.display.get(id).map(String::as_str)
    }

    /// Number of distinct exact-label keys in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// True if no source contributed any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

/// Builder merging ordered synonym sources into a [`LabelTable`].
///
/// Sources are added in priority order; the tier tag on each source is
/// what the resolver's precedence policy consumes. Identifier syntax is
/// checked on every entry — an id whose prefix is outside the recognized
/// namespace set fails the whole build.
#[derive(Debug)]
pub struct TableBuilder {
    prefixes: Vec<String>,
    table: LabelTable,
    entries: usize,
}

impl TableBuilder {
    /// Default recognized namespace prefixes: Cell Ontology, Protein
    /// Ontology, Gene Ontology.
    pub const DEFAULT_PREFIXES: [&'static str; 3] = ["CL", "PR", "GO"];

    /// Creates a builder with the default recognized prefixes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefixes(Self::DEFAULT_PREFIXES)
    }

    /// Creates a builder recognizing exactly the given namespace prefixes.
    #[must_use]
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableBuilder {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            table: LabelTable::default(),
            entries: 0,
        }
    }

    /// Adds one `(id, label)` pair at the given tier.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the id is malformed or uses an
    /// unrecognized namespace prefix.
    pub fn add_entry(&mut self, tier: MatchTier, id: &str, label: &str) -> Result<(), BuildError> {
        let id = self.check_id(id)?;
        let label = label.trim();
        if label.is_empty() {
            return Ok(());
        }
        let entry = LabelEntry {
            id: id.clone(),
            tier,
        };
        push_unique(self.table.exact.entry(label.to_string()).or_default(), &entry);
        push_unique(
            self.table
                .normalized
                .entry(normalize_label(label))
                .or_default(),
            &entry,
        );
        self.table
            .display
            .entry(id)
            .or_insert_with(|| label.to_string());
        self.entries += 1;
        Ok(())
    }

    /// Adds a whole in-memory source of `(id, label)` pairs at one tier.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] on the first malformed id.
    pub fn add_source<'a, I>(&mut self, tier: MatchTier, pairs: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (id, label) in pairs {
            self.add_entry(tier, id, label)?;
        }
        Ok(())
    }

    /// Loads a two-column `ID<TAB>Label` file (with header row) at one tier.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the file cannot be read or any row is
    /// malformed.
    pub fn add_tsv(&mut self, tier: MatchTier, path: &Path) -> Result<(), BuildError> {
        let file = File::open(path).map_err(|source| BuildError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.add_tsv_reader(tier, file, &path.display().to_string())
    }

    /// Loads a two-column `ID<TAB>Label` source from any reader.
    ///
    /// `source_name` is used in error messages only.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the content is not valid TSV or any
    /// row is malformed.
    pub fn add_tsv_reader<R: Read>(
        &mut self,
        tier: MatchTier,
        reader: R,
        source_name: &str,
    ) -> Result<(), BuildError> {
        let mut rdr = tsv_reader(reader);
        let before = self.entries;
        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(|source| BuildError::Tsv {
                source_name: source_name.to_string(),
                source,
            })?;
            let line = i as u64 + 2;
            let (id, label) = two_columns(&record, source_name, line)?;
            self.add_entry(tier, id, label)?;
        }
        debug!(
            source = source_name,
            tier = %tier,
            entries = self.entries - before,
            "loaded synonym source"
        );
        Ok(())
    }

    /// Loads a curated override list with columns `Ontology ID`, `Label`,
    /// and `Synonyms` (comma-separated). Labels and all synonyms map at
    /// the [`MatchTier::Special`] tier.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if a required column is missing or any
    /// row is malformed.
    pub fn add_special_tsv(&mut self, path: &Path) -> Result<(), BuildError> {
        let file = File::open(path).map_err(|source| BuildError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.add_special_reader(file, &path.display().to_string())
    }

    /// Loads a curated override list from any reader; see
    /// [`TableBuilder::add_special_tsv`].
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if a required column is missing or any
    /// row is malformed.
    pub fn add_special_reader<R: Read>(
        &mut self,
        reader: R,
        source_name: &str,
    ) -> Result<(), BuildError> {
        let mut rdr = tsv_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|source| BuildError::Tsv {
                source_name: source_name.to_string(),
                source,
            })?
            .clone();
        let id_col = column_index(&headers, "Ontology ID", source_name)?;
        let label_col = column_index(&headers, "Label", source_name)?;
        let syn_col = headers.iter().position(|h| h == "Synonyms");

        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(|source| BuildError::Tsv {
                source_name: source_name.to_string(),
                source,
            })?;
            let line = i as u64 + 2;
            let id = field(&record, id_col, source_name, line)?;
            let label = field(&record, label_col, source_name, line)?;
            self.add_entry(MatchTier::Special, id, label)?;
            if let Some(col) = syn_col {
                if let Some(synonyms) = record.get(col) {
                    for synonym in synonyms.split(',') {
                        self.add_entry(MatchTier::Special, id, synonym)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Finalizes the table.
    #[must_use]
    pub fn build(self) -> LabelTable {
        debug!(
            labels = self.table.exact.len(),
            ids = self.table.display.len(),
            "label table built"
        );
        self.table
    }

    fn check_id(&self, id: &str) -> Result<Curie, BuildError> {
        let curie = Curie::parse(id)?;
        if !self.prefixes.iter().any(|p| p == curie.prefix()) {
            return Err(BuildError::UnknownPrefix {
                id: curie.as_str().to_string(),
                prefix: curie.prefix().to_string(),
            });
        }
        Ok(curie)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends `entry` unless an identical (id, tier) pair is already listed.
fn push_unique(list: &mut Vec<LabelEntry>, entry: &LabelEntry) {
    if !list.contains(entry) {
        list.push(entry.clone());
    }
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn two_columns<'r>(
    record: &'r csv::StringRecord,
    source_name: &str,
    line: u64,
) -> Result<(&'r str, &'r str), BuildError> {
    match (record.get(0), record.get(1)) {
        (Some(id), Some(label)) => Ok((id, label)),
        _ => Err(BuildError::MalformedRow {
            source_name: source_name.to_string(),
            line,
            reason: format!("expected 2 columns, found {}", record.len()),
        }),
    }
}

fn field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    source_name: &str,
    line: u64,
) -> Result<&'r str, BuildError> {
    record.get(index).ok_or_else(|| BuildError::MalformedRow {
        source_name: source_name.to_string(),
        line,
        reason: format!("expected at least {} columns, found {}", index + 1, record.len()),
    })
}

fn column_index(
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
