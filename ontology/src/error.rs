//! Construction-time errors.
//!
//! Everything in this crate is built once at startup from ontology
//! snapshot tables. Any malformed input at that stage is fatal; all
//! downstream conditions (unresolved labels, ambiguities, validation
//! findings) are data, never errors.

use thiserror::Error;

/// Fatal error raised while building lookup tables or the marker index.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An identifier does not have `PREFIX:LOCAL` shape.
    #[error("invalid ontology identifier {id:?}: {reason}")]
    InvalidId {
        /// The offending identifier as it appeared in the source.
        id: String,
        /// Why the identifier was rejected.
        reason: &'static str,
    },

    /// An identifier uses a namespace prefix outside the recognized set.
    #[error("unrecognized ontology prefix {prefix:?} in identifier {id:?}")]
    UnknownPrefix {
        /// The offending identifier.
        id: String,
        /// The prefix that was not recognized.
        prefix: String,
    },

    /// A required column is absent from a table header.
    #[error("missing required column {column:?} in {source_name}")]
    MissingColumn {
        /// The column that was expected.
        column: &'static str,
        /// The table (path or fixture name) being read.
        source_name: String,
    },

    /// A data row does not have the expected shape.
    #[error("malformed row {line} in {source_name}: {reason}")]
    MalformedRow {
        /// The table being read.
        source_name: String,
        /// 1-based line number of the offending row.
        line: u64,
        /// Why the row was rejected.
        reason: String,
    },

    /// The underlying file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// Path of the file that could not be read.
        path: String,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The underlying file could not be parsed as TSV.
    #[error("failed to parse {source_name} as TSV")]
    Tsv {
        /// The table being read.
        source_name: String,
        /// The TSV parsing error.
        #[source]
        source: csv::Error,
    },
}
