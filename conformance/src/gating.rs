//! Gating-string parser.
//!
//! Splits a comma-separated gating definition into ordered
//! marker/polarity tokens. Suffix handling goes through a [`ValueScale`]
//! — the table of suffix symbols (`++`, `+-`, `+`, `-`) and their word
//! synonyms (`hi`, `bright`, `dim`, …) — so the vocabulary of reported
//! levels is data, not code. Parsing is fail-soft: one bad token
//! produces a warning and the rest of the string still parses.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use cellgate_ontology::{BuildError, Polarity};

/// One parsed gating token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateToken {
    /// The token as written, trimmed.
    pub raw: String,
    /// The marker text with the polarity suffix removed.
    pub marker: String,
    /// The asserted polarity. A token with no suffix reads as positive.
    pub polarity: Polarity,
}

/// A recovered problem with one gating token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// The offending token, verbatim.
    pub token: String,
    /// What was wrong with it.
    pub message: String,
}

/// Suffix vocabulary for gating tokens.
///
/// Symbols are matched first (longest first), then word synonyms,
/// case-insensitively and possibly attached directly to the marker name
/// (`CD27hi`). The default scale carries the conventional flow-cytometry
/// vocabulary; a run may replace it from a value-scale table.
#[derive(Debug, Clone)]
pub struct ValueScale {
    symbols: Vec<(String, Polarity)>,
    synonyms: Vec<(String, Polarity)>,
}

impl ValueScale {
    /// The built-in scale: `++`/`+-`/`+`/`-` symbols plus the usual
    /// reported-level synonyms.
    #[must_use]
    pub fn builtin() -> Self {
        let synonyms = [
            ("high", Polarity::High),
            ("hi", Polarity::High),
            ("bright", Polarity::High),
            ("bri", Polarity::High),
            ("br", Polarity::High),
            ("(high)", Polarity::High),
            ("low", Polarity::Low),
            ("lo", Polarity::Low),
            ("dim", Polarity::Low),
            ("di", Polarity::Low),
            ("(low)", Polarity::Low),
            ("positive", Polarity::Positive),
            ("negative", Polarity::Negative),
        ];
        let mut scale = ValueScale {
            symbols: Vec::new(),
            synonyms: synonyms
                .into_iter()
                .map(|(s, p)| (s.to_string(), p))
                .collect(),
        };
        scale.reset_symbols();
        scale
    }

    /// Loads a scale from a value-scale table with columns `Name`,
    /// `Symbol`, and `Synonyms` (comma-separated). Rows whose `Name` is
    /// not one of the four polarities are ignored — the data model has
    /// no room for intermediate levels.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the file cannot be read or a required
    /// column is missing.
    pub fn from_tsv(path: &Path) -> Result<Self, BuildError> {
        let file = File::open(path).map_err(|source| BuildError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Loads a scale from any reader; see [`ValueScale::from_tsv`].
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the content is not valid TSV or a
    /// required column is missing.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, BuildError> {
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
        let name_col = position(&headers, "Name", source_name)?;
        let syn_col = headers.iter().position(|h| h == "Synonyms");

        let mut scale = ValueScale {
            symbols: Vec::new(),
            synonyms: Vec::new(),
        };
        scale.reset_symbols();
        for record in rdr.records() {
            let record = record.map_err(|source| BuildError::Tsv {
                source_name: source_name.to_string(),
                source,
            })?;
            let Some(name) = record.get(name_col).map(str::trim) else {
                continue;
            };
            let Some(polarity) = Polarity::from_name(name) else {
                debug!(level = name, "value-scale level outside the polarity set; ignored");
                continue;
            };
            scale.synonyms.push((name.to_string(), polarity));
            if let Some(synonyms) = syn_col.and_then(|c| record.get(c)) {
                for synonym in synonyms.split(',') {
                    let synonym = synonym.trim();
                    if !synonym.is_empty() {
                        scale.synonyms.push((synonym.to_string(), polarity));
                    }
                }
            }
        }
        // Longer synonyms must win over their own prefixes ("bright" over "br").
        scale.synonyms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(scale)
    }

    /// Splits a token into marker text and polarity, trying symbol
    /// suffixes, then word synonyms, then a leading `+`/`-`.
    fn split(&self, token: &str) -> (String, Option<Polarity>) {
        for (symbol, polarity) in &self.symbols {
            if let Some(stem) = token.strip_suffix(symbol.as_str()) {
                return (stem.trim_end().to_string(), Some(*polarity));
            }
        }
        let folded = token.to_lowercase();
        for (synonym, polarity) in &self.synonyms {
            if let Some(stem_len) = folded
                .strip_suffix(&synonym.to_lowercase())
                .map(str::len)
            {
                // Byte offsets line up as long as case folding kept the
                // length; non-ASCII oddities just fall through.
                if let Some(stem) = token.get(..stem_len).map(str::trim_end) {
                    if !stem.is_empty() {
                        return (stem.to_string(), Some(*polarity));
                    }
                }
            }
        }
        if let Some(stem) = token.strip_prefix(['+', '-']) {
            let polarity = if token.starts_with('+') {
                Polarity::Positive
            } else {
                Polarity::Negative
            };
            return (stem.trim_start().to_string(), Some(polarity));
        }
        (token.to_string(), None)
    }

    fn reset_symbols(&mut self) {
        self.symbols = [
            ("++", Polarity::High),
            ("+-", Polarity::Low),
            ("+", Polarity::Positive),
            ("-", Polarity::Negative),
        ]
        .into_iter()
        .map(|(s, p)| (s.to_string(), p))
        .collect();
    }
}

impl Default for ValueScale {
    fn default() -> Self {
        Self::builtin()
    }
}

fn position(
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

/// Anything in square brackets is a comment, not part of the marker
/// (`CD56[glycosylated]+`).
fn strip_comments(token: &str) -> String {
    static BRACKETS: OnceLock<Regex> = OnceLock::new();
    let re = BRACKETS.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // the pattern is a literal
        Regex::new(r"\s*\[[^\]]*\]\s*").unwrap()
    });
    re.replace_all(token, "").to_string()
}

/// Parses a comma-separated gating definition into ordered tokens.
///
/// A token that cannot be parsed (empty, or a bare suffix with no
/// marker name) produces a warning and is skipped; the remaining tokens
/// still parse. Both the partial token list and the warnings are
/// returned.
#[must_use]
pub fn parse_gating(input: &str, scale: &ValueScale) -> (Vec<GateToken>, Vec<ParseWarning>) {
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();
    if input.trim().is_empty() {
        return (tokens, warnings);
    }

    for piece in input.split(',') {
        let raw = piece.trim();
        if raw.is_empty() {
            warnings.push(ParseWarning {
                token: raw.to_string(),
                message: "empty gating token".to_string(),
            });
            continue;
        }
        let cleaned = strip_comments(raw);
        let (marker, polarity) = scale.split(cleaned.trim());
        if marker.is_empty() {
            warnings.push(ParseWarning {
                token: raw.to_string(),
                message: "token has no marker name".to_string(),
            });
            continue;
        }
        tokens.push(GateToken {
            raw: raw.to_string(),
            marker,
            // No suffix reads as positive, matching reported gating
            // conventions.
            polarity: polarity.unwrap_or(Polarity::Positive),
        });
    }
    (tokens, warnings)
}
