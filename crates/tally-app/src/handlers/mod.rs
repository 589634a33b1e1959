//! Auction operation handlers.
//!
//! Each handler validates its arguments, then works through the
//! [`RecordStore`] on the ledger it is handed. Handlers never commit; the
//! router does that once the handler returns.

mod item;
mod user;

use serde_json::value::RawValue;
use tally_ledger::TableLedger;
use tally_records::RecordKind;
use tally_store::{RecordStore, TypedValue};

use crate::error::{AppError, AppResult};
use crate::operation::{Mode, Operation};

pub struct Handlers {
    store: RecordStore,
    category_epoch: String,
}

impl Handlers {
    pub fn new(store: RecordStore, category_epoch: impl Into<String>) -> Self {
        Self {
            store,
            category_epoch: category_epoch.into(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn category_epoch(&self) -> &str {
        &self.category_epoch
    }

    /// Run a writing operation.
    pub fn invoke(
        &self,
        operation: Operation,
        ledger: &mut dyn TableLedger,
        args: &[String],
    ) -> AppResult<Vec<u8>> {
        match operation {
            Operation::PostUser => self.post_user(ledger, args),
            Operation::UpdateUser => self.update_user(ledger, args),
            Operation::DeleteUser => self.delete_user(ledger, args),
            Operation::PostItem => self.post_item(ledger, args),
            Operation::GetUser
            | Operation::GetItem
            | Operation::GetUserListByCat
            | Operation::GetItemListByCat => Err(wrong_mode(operation)),
        }
    }

    /// Run a read-only operation.
    pub fn query(
        &self,
        operation: Operation,
        ledger: &dyn TableLedger,
        args: &[String],
    ) -> AppResult<Vec<u8>> {
        match operation {
            Operation::GetUser => self.get_user(ledger, args),
            Operation::GetItem => self.get_item(ledger, args),
            Operation::GetUserListByCat => self.get_user_list_by_cat(ledger, args),
            Operation::GetItemListByCat => self.get_item_list_by_cat(ledger, args),
            Operation::PostUser
            | Operation::UpdateUser
            | Operation::DeleteUser
            | Operation::PostItem => Err(wrong_mode(operation)),
        }
    }
}

fn wrong_mode(operation: Operation) -> AppError {
    AppError::WrongMode {
        operation: operation.name().to_string(),
        expected: operation.mode(),
    }
}

/// Exactly `expected` arguments.
fn require_len(operation: Operation, args: &[String], expected: usize) -> AppResult<()> {
    if args.len() != expected {
        return Err(AppError::bad_arguments(
            operation,
            format!("expected {expected} arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

/// The first argument, which must be present.
fn first_arg(operation: Operation, args: &[String]) -> AppResult<&str> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| AppError::bad_arguments(operation, "missing key argument"))
}

fn require_integer(operation: Operation, what: &str, value: &str) -> AppResult<()> {
    value
        .parse::<i64>()
        .map(|_| ())
        .map_err(|_| AppError::bad_arguments(operation, format!("{what} should be an integer, got {value:?}")))
}

fn require_kind(operation: Operation, value: &str, expected: RecordKind) -> AppResult<RecordKind> {
    match value.parse::<RecordKind>() {
        Ok(kind) if kind == expected => Ok(kind),
        _ => Err(AppError::bad_arguments(
            operation,
            format!("record type must be {expected}, got {value:?}"),
        )),
    }
}

/// A JSON array of stored payloads, each embedded as written.
fn json_array(values: &[TypedValue]) -> AppResult<Vec<u8>> {
    let raw = values
        .iter()
        .map(|v| serde_json::from_slice::<&RawValue>(&v.bytes))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_vec(&raw)?)
}
