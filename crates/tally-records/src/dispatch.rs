use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{RecordError, RecordResult};
use crate::kind::RecordKind;
use crate::record::{
    AuctionRequest, BidRecord, ItemRecord, ItemTransaction, Record, TransferRecord, UserRecord,
    VerifyRecord,
};

/// Discriminator field carried by every record.
pub const REC_TYPE_FIELD: &str = "RecType";

/// Validates and decodes stored payloads by their `RecType`.
///
/// Decoding runs in two phases. Phase one reads only the discriminator and
/// picks a [`RecordKind`]; phase two decodes the payload into that kind's
/// shape. Every kind has a decoder and nothing falls through silently.
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeDispatcher;

impl TypeDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Check that `bytes` is a well-formed record and return its kind.
    pub fn validate(&self, bytes: &[u8]) -> RecordResult<RecordKind> {
        self.decode(bytes).map(|record| record.kind())
    }

    /// Decode `bytes` into a typed record.
    pub fn decode(&self, bytes: &[u8]) -> RecordResult<Record> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| RecordError::Decode(format!("invalid JSON: {e}")))?;
        let kind = Self::discriminator(&value)?;

        let record = match kind {
            RecordKind::User => Record::User(shape(kind, value)?),
            RecordKind::ArtInv => Record::Item(shape::<ItemRecord>(kind, value)?),
            RecordKind::AucReq | RecordKind::OpenAuc | RecordKind::ClAuc => {
                Record::Auction(shape::<AuctionRequest>(kind, value)?)
            }
            RecordKind::Bid => Record::Bid(shape::<BidRecord>(kind, value)?),
            RecordKind::PostTran => Record::Transaction(shape::<ItemTransaction>(kind, value)?),
            RecordKind::Xfer => Record::Transfer(shape::<TransferRecord>(kind, value)?),
            RecordKind::Verify => Record::Verify(shape::<VerifyRecord>(kind, value)?),
        };
        Ok(record)
    }

    fn discriminator(value: &Value) -> RecordResult<RecordKind> {
        let object = value.as_object().ok_or_else(|| {
            RecordError::Decode(format!("expected a JSON object, found {}", json_type(value)))
        })?;
        match object.get(REC_TYPE_FIELD) {
            None => {
                debug!("record has no RecType");
                Err(RecordError::UnknownRecordKind(None))
            }
            Some(Value::String(tag)) => tag.parse(),
            Some(other) => Err(RecordError::UnknownRecordKind(Some(other.to_string()))),
        }
    }
}

fn shape<T: DeserializeOwned>(kind: RecordKind, value: Value) -> RecordResult<T> {
    serde_json::from_value(value).map_err(|e| {
        debug!(%kind, error = %e, "record shape mismatch");
        RecordError::ShapeMismatch {
            kind,
            reason: e.to_string(),
        }
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
