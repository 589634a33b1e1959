//! Schema-driven record store for Tally.
//!
//! [`RecordStore`] turns a [`SchemaRegistry`](tally_schema::SchemaRegistry)
//! and any [`TableLedger`](tally_ledger::TableLedger) into keyed tables:
//!
//! - `create_table` / `drop_table` size tables from the registry
//! - `insert`, `replace`, `delete` demand the exact key arity
//! - `get` is an exact lookup; `scan` matches leading key columns
//! - `get_record` / `scan_records` run values through the type dispatcher
//!
//! Failures name the table and key tuple involved and leave the table as
//! it was.

pub mod error;
pub mod scan;
pub mod store;

pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use scan::{RecordScan, Scan, TypedValue};
pub use store::{RecordStore, KEY_COLUMN_PREFIX, VALUE_COLUMN};
