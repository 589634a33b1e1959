use std::io;

/// Errors produced by the table ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// `create_table` was called for a table that already exists.
    #[error("table already exists: {0}")]
    TableExists(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A row or key list does not fit the table's column layout.
    #[error("column mismatch in table {table}: {reason}")]
    ColumnMismatch { table: String, reason: String },

    /// A column layout cannot back a keyed table.
    #[error("invalid definition for table {table}: {reason}")]
    InvalidTableDefinition { table: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// A journal frame passed its length check but is unreadable.
    #[error("corrupt journal entry at offset {offset}: {reason}")]
    CorruptJournal { offset: u64, reason: String },

    /// An earlier append failed and its partial frame could not be removed.
    #[error("journal unusable after a failed append at offset {offset}")]
    JournalFailed { offset: u64 },

    /// A recovered commit does not apply cleanly on top of the replayed state.
    #[error("journal replay failed at commit {seq}: {reason}")]
    ReplayMismatch { seq: u64, reason: String },

    /// Another invocation panicked while holding the ledger.
    #[error("ledger lock poisoned")]
    Poisoned,
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
