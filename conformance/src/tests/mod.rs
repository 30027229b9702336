//! Shared test data for the validator.

pub mod fixtures;
