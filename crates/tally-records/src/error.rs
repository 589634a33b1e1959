use crate::kind::RecordKind;

/// Errors raised while interpreting a stored record payload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The payload is not valid JSON or not a JSON object.
    #[error("record payload cannot be decoded: {0}")]
    Decode(String),

    /// The `RecType` discriminator is missing or names no known kind.
    #[error("unknown record kind: {}", .0.as_deref().unwrap_or("<missing RecType>"))]
    UnknownRecordKind(Option<String>),

    /// The discriminator is known but the payload does not fit its shape.
    #[error("{kind} record does not match its shape: {reason}")]
    ShapeMismatch { kind: RecordKind, reason: String },

    /// A record could not be serialized.
    #[error("record encoding failed: {0}")]
    Encode(String),
}

/// Result alias for record operations.
pub type RecordResult<T> = Result<T, RecordError>;
