//! Append-only table ledger for Tally.
//!
//! This crate is the storage substrate every record lives on. It provides:
//! - Keyed tables of string key columns plus one value column
//! - The `TableLedger` trait boundary used by the record store
//! - `Invocation` transaction contexts that commit or abort atomically
//! - `Commit`s, the numbered write set of each committed invocation
//! - An optional CRC-framed `Journal` that keeps commits across restarts
//! - `InMemoryLedger`, which replays the journal on open

pub mod commit;
pub mod error;
pub mod invocation;
pub mod journal;
pub mod memory;
pub mod row;
pub mod table;
pub mod traits;

pub use commit::{Commit, Mutation};
pub use error::{LedgerError, LedgerResult};
pub use invocation::Invocation;
pub use journal::{Journal, JournalConfig, Recovery, SyncMode};
pub use memory::InMemoryLedger;
pub use row::{Column, ColumnDefinition, ColumnType, Row};
pub use table::Table;
pub use traits::{RowIter, TableLedger};
