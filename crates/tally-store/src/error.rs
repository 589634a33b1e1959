use tally_ledger::LedgerError;
use tally_records::RecordError;
use tally_types::KeyTuple;

/// Errors from record store operations.
///
/// Every variant that concerns a row carries the table and key tuple.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The table has no descriptor in the schema registry.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// The key tuple is the wrong length for the table.
    #[error("{table}: expected {expected} key columns, got {actual} in {keys}")]
    KeyArity {
        table: String,
        keys: KeyTuple,
        expected: usize,
        actual: usize,
    },

    /// Insert collided with an existing row.
    #[error("{table}: row {keys} already exists")]
    DuplicateKey { table: String, keys: KeyTuple },

    /// No row with this exact key.
    #[error("{table}: row {keys} not found")]
    NotFound { table: String, keys: KeyTuple },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A stored value failed type dispatch.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Discriminant of a [`StoreError`], for callers that only need the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreErrorKind {
    UnknownTable,
    KeyArity,
    DuplicateKey,
    NotFound,
    Ledger,
    Record,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::UnknownTable(_) => StoreErrorKind::UnknownTable,
            Self::KeyArity { .. } => StoreErrorKind::KeyArity,
            Self::DuplicateKey { .. } => StoreErrorKind::DuplicateKey,
            Self::NotFound { .. } => StoreErrorKind::NotFound,
            Self::Ledger(_) => StoreErrorKind::Ledger,
            Self::Record(_) => StoreErrorKind::Record,
        }
    }

    /// The table the failure concerns, when there is one.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::UnknownTable(table)
            | Self::KeyArity { table, .. }
            | Self::DuplicateKey { table, .. }
            | Self::NotFound { table, .. } => Some(table),
            Self::Ledger(_) | Self::Record(_) => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
