use tally_ledger::LedgerError;
use tally_records::{RecordError, RecordKind};
use tally_schema::SchemaError;
use tally_store::StoreError;

use crate::operation::Mode;

/// Errors surfaced to callers of the router.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A query operation was invoked, or the reverse.
    #[error("{operation} is a {expected} operation")]
    WrongMode { operation: String, expected: Mode },

    /// No argument names a record kind.
    #[error("no valid record type in arguments {0:?}")]
    NoRecordKind(Vec<String>),

    #[error("{operation}: {reason}")]
    BadArguments { operation: String, reason: String },

    /// A typed read found a record of another kind.
    #[error("expected a {expected} record, found {found}")]
    UnexpectedKind {
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// A list result could not be assembled.
    #[error("result encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AppError {
    pub(crate) fn bad_arguments(operation: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::BadArguments {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
