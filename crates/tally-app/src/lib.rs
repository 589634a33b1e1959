//! Application layer for Tally.
//!
//! Wires a [`SchemaRegistry`](tally_schema::SchemaRegistry), the
//! [`RecordStore`](tally_store::RecordStore) and an
//! [`InMemoryLedger`](tally_ledger::InMemoryLedger) into a [`Router`] that
//! runs named auction operations:
//!
//! - `bootstrap` drops and recreates every registered table
//! - `Operation` is parsed once from the operation name and carries its mode
//! - handlers build key tuples and records, then call the store
//! - `Router` commits an invoke on success and aborts it on failure
//! - `AppConfig` is read from TOML

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod operation;
pub mod router;

pub use bootstrap::{bootstrap, SCHEMA_VERSION, VERSION_KEY};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::Handlers;
pub use operation::{Mode, Operation};
pub use router::Router;
