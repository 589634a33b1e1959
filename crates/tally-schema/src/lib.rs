//! Schema registry for Tally.
//!
//! A [`SchemaRegistry`] maps table names to their [`TableDescriptor`]: the
//! number of leading string key columns before the single value column.
//! It is built once, validated, and read-only afterwards. Every record
//! store operation consults it to size key tuples.
//!
//! # Design Rules
//!
//! 1. Descriptors are immutable once registered.
//! 2. Key arity is bounded to `1..=MAX_KEY_ARITY`.
//! 3. Table names are unique within a registry.
//! 4. Lookups are pure; an unknown name is an error, never a zero arity.

pub mod auction;
pub mod descriptor;
pub mod error;
pub mod registry;

pub use descriptor::{TableDescriptor, MAX_KEY_ARITY};
pub use error::{SchemaError, SchemaResult};
pub use registry::{SchemaBuilder, SchemaRegistry};
