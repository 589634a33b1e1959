//! Foundation types for Tally.
//!
//! Every other Tally crate depends on `tally-types`.
//!
//! # Key Types
//!
//! - [`KeyTuple`] Ordered string key columns of a table row, with prefix matching

pub mod key;

pub use key::KeyTuple;
