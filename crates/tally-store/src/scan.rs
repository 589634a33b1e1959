use tally_ledger::{Row, RowIter};
use tally_records::{Record, RecordKind, TypeDispatcher};

use crate::error::StoreResult;

/// A stored value that passed type dispatch.
///
/// `bytes` is exactly what the table holds; `record` is its decoded form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedValue {
    pub kind: RecordKind,
    pub record: Record,
    pub bytes: Vec<u8>,
}

impl TypedValue {
    pub(crate) fn dispatch(dispatcher: &TypeDispatcher, bytes: &[u8]) -> StoreResult<Self> {
        let record = dispatcher.decode(bytes)?;
        Ok(Self {
            kind: record.kind(),
            record,
            bytes: bytes.to_vec(),
        })
    }
}

/// Value columns of the rows matching a prefix, in insertion order.
///
/// Lazy and one-shot; it borrows the ledger it was opened on.
pub struct Scan<'a> {
    rows: RowIter<'a>,
}

impl<'a> Scan<'a> {
    pub(crate) fn new(rows: RowIter<'a>) -> Self {
        Self { rows }
    }
}

impl<'a> Iterator for Scan<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        // Store tables always end in a bytes column.
        self.rows.by_ref().find_map(Row::value)
    }
}

/// A [`Scan`] whose values are each run through the type dispatcher.
pub struct RecordScan<'a> {
    values: Scan<'a>,
    dispatcher: TypeDispatcher,
}

impl<'a> RecordScan<'a> {
    pub(crate) fn new(values: Scan<'a>, dispatcher: TypeDispatcher) -> Self {
        Self { values, dispatcher }
    }
}

impl Iterator for RecordScan<'_> {
    type Item = StoreResult<TypedValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.values
            .next()
            .map(|bytes| TypedValue::dispatch(&self.dispatcher, bytes))
    }
}
