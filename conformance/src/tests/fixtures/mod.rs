//! Ontology snapshot fixtures for validator tests.
//!
//! Each constant holds one TSV table, a miniature but internally
//! consistent slice of the Cell Ontology and Protein Ontology covering
//! the lymphocyte subtree the scenario tests exercise.

mod input_batch;
mod marker_levels;
mod vocabulary;

pub use input_batch::INPUT_BATCH;
pub use marker_levels::CL_LEVELS;
pub use vocabulary::{
    CELL_LABELS, CELL_SYNONYMS, MARKER_LABELS, MARKER_SHORTS, MARKER_SYNONYMS, SPECIAL_GATES,
    VALUE_SCALE,
};
