//! Ontology vocabulary tables for the cellgate validator.
//!
//! The `cellgate-ontology` crate holds everything that is fixed for the
//! lifetime of one ontology snapshot: validated CURIE identifiers, the
//! label→id lookup tables merged from ordered synonym sources, and the
//! membrane-marker profile index computed by closing restriction
//! assertions over the subclass hierarchy.
//!
//! # Entry Points
//!
//! ```
//! use cellgate_ontology::{MatchTier, TableBuilder};
//!
//! let mut builder = TableBuilder::new();
//! builder
//!     .add_source(MatchTier::Label, [("CL:0000084", "T cell")])
//!     .unwrap();
//! let table = builder.build();
//! assert_eq!(table.exact_candidates("T cell").len(), 1);
//! ```
//!
//! Both [`LabelTable`] and [`MarkerIndex`] are immutable after
//! construction and are shared by reference across all row validations.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod hierarchy;
pub mod model;
pub mod table;

pub use error::BuildError;
pub use hierarchy::{ClassRecord, HierarchyBuilder, MarkerIndex};
pub use model::{Curie, MarkerAssertion, MarkerProfile, Polarity, ProfileEntry, RestrictionPredicate};
pub use table::{LabelEntry, LabelTable, MatchTier, TableBuilder};
