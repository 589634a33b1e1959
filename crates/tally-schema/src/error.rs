/// Errors from schema registration and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No descriptor is registered under this name.
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// A table was declared twice.
    #[error("table declared more than once: {0}")]
    DuplicateTable(String),

    /// Key arity outside the supported range.
    #[error("invalid key arity {arity} for table {table}: must be between 1 and {max}")]
    InvalidArity {
        table: String,
        arity: usize,
        max: usize,
    },

    #[error("table name must not be empty")]
    EmptyName,

    /// The schema document could not be parsed.
    #[error("schema parse error: {0}")]
    Parse(String),
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
