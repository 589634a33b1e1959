use std::sync::Arc;

use tally_ledger::{ColumnDefinition, ColumnType, LedgerError, Row, TableLedger};
use tally_records::TypeDispatcher;
use tally_schema::SchemaRegistry;
use tally_types::KeyTuple;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::scan::{RecordScan, Scan, TypedValue};

/// Name prefix of generated key columns (`keyName0`, `keyName1`, ...).
pub const KEY_COLUMN_PREFIX: &str = "keyName";

/// Name of the single value column.
pub const VALUE_COLUMN: &str = "Details";

/// Keyed CRUD and prefix scans over ledger tables.
///
/// Every call is sized by the registry: a key tuple must have exactly the
/// table's arity (a scan prefix at most that many columns). The store holds
/// no state of its own beyond the registry; each call runs against the
/// [`TableLedger`] it is given, normally the current invocation, so all of
/// an invocation's writes commit or abort together.
#[derive(Clone, Debug)]
pub struct RecordStore {
    registry: Arc<SchemaRegistry>,
    dispatcher: TypeDispatcher,
}

impl RecordStore {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            dispatcher: TypeDispatcher::new(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn key_arity(&self, table: &str) -> StoreResult<usize> {
        self.registry
            .key_arity(table)
            .map_err(|_| StoreError::UnknownTable(table.to_string()))
    }

    // -----------------------------------------------------------------------
    // Tables
    // -----------------------------------------------------------------------

    /// Allocate `key_arity` string key columns plus one bytes value column.
    ///
    /// Fails if the table already exists in the ledger.
    pub fn create_table<L>(&self, ledger: &mut L, table: &str) -> StoreResult<()>
    where
        L: TableLedger + ?Sized,
    {
        let arity = self.key_arity(table)?;
        let mut columns: Vec<ColumnDefinition> = (0..arity)
            .map(|i| ColumnDefinition::key(format!("{KEY_COLUMN_PREFIX}{i}")))
            .collect();
        columns.push(ColumnDefinition::value(VALUE_COLUMN, ColumnType::Bytes));

        ledger.create_table(table, columns)?;
        debug!(table, arity, "table created");
        Ok(())
    }

    /// Remove a table and its rows. Returns `false` if it did not exist.
    pub fn drop_table<L>(&self, ledger: &mut L, table: &str) -> StoreResult<bool>
    where
        L: TableLedger + ?Sized,
    {
        self.key_arity(table)?;
        let existed = ledger.delete_table(table)?;
        debug!(table, existed, "table dropped");
        Ok(existed)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub fn insert<L, K>(&self, ledger: &mut L, table: &str, keys: &[K], value: Vec<u8>) -> StoreResult<()>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let key = self.full_key(table, keys)?;
        if !ledger.insert_row(table, Row::keyed(key.as_slice(), value))? {
            return Err(StoreError::DuplicateKey {
                table: table.to_string(),
                keys: key,
            });
        }
        debug!(table, keys = %key, "row inserted");
        Ok(())
    }

    /// Overwrite the value of an existing row.
    pub fn replace<L, K>(&self, ledger: &mut L, table: &str, keys: &[K], value: Vec<u8>) -> StoreResult<()>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let key = self.full_key(table, keys)?;
        if !ledger.replace_row(table, Row::keyed(key.as_slice(), value))? {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                keys: key,
            });
        }
        debug!(table, keys = %key, "row replaced");
        Ok(())
    }

    pub fn delete<L, K>(&self, ledger: &mut L, table: &str, keys: &[K]) -> StoreResult<()>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let key = self.full_key(table, keys)?;
        if !ledger.delete_row(table, key.as_slice())? {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                keys: key,
            });
        }
        debug!(table, keys = %key, "row deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The value column of the row with this exact key.
    pub fn get<'l, L, K>(&self, ledger: &'l L, table: &str, keys: &[K]) -> StoreResult<&'l [u8]>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let key = self.full_key(table, keys)?;
        debug!(table, keys = %key, "get");
        match ledger.get_row(table, key.as_slice())? {
            Some(row) => value_of(table, row),
            None => Err(StoreError::NotFound {
                table: table.to_string(),
                keys: key,
            }),
        }
    }

    pub fn exists<L, K>(&self, ledger: &L, table: &str, keys: &[K]) -> StoreResult<bool>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let key = self.full_key(table, keys)?;
        let found = ledger.get_row(table, key.as_slice())?.is_some();
        debug!(table, keys = %key, found, "exists");
        Ok(found)
    }

    /// Values of every row whose leading keys equal `prefix`.
    ///
    /// An empty prefix matches every row; no match is an empty scan.
    pub fn scan<'l, L, K>(&self, ledger: &'l L, table: &str, prefix: &[K]) -> StoreResult<Scan<'l>>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let prefix = self.prefix_key(table, prefix)?;
        debug!(table, prefix = %prefix, "scan");
        let rows = ledger.scan_rows(table, prefix.as_slice())?;
        Ok(Scan::new(rows))
    }

    /// [`get`](Self::get), with the value run through the type dispatcher.
    pub fn get_record<L, K>(&self, ledger: &L, table: &str, keys: &[K]) -> StoreResult<TypedValue>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let bytes = self.get(ledger, table, keys)?;
        TypedValue::dispatch(&self.dispatcher, bytes)
    }

    /// [`scan`](Self::scan), with each value run through the type dispatcher.
    pub fn scan_records<'l, L, K>(
        &self,
        ledger: &'l L,
        table: &str,
        prefix: &[K],
    ) -> StoreResult<RecordScan<'l>>
    where
        L: TableLedger + ?Sized,
        K: AsRef<str>,
    {
        let values = self.scan(ledger, table, prefix)?;
        Ok(RecordScan::new(values, self.dispatcher))
    }

    // -----------------------------------------------------------------------
    // Key sizing
    // -----------------------------------------------------------------------

    fn full_key<K: AsRef<str>>(&self, table: &str, keys: &[K]) -> StoreResult<KeyTuple> {
        let expected = self.key_arity(table)?;
        let tuple: KeyTuple = keys.iter().map(|k| AsRef::<str>::as_ref(k)).collect();
        if tuple.len() != expected {
            return Err(StoreError::KeyArity {
                table: table.to_string(),
                actual: tuple.len(),
                keys: tuple,
                expected,
            });
        }
        Ok(tuple)
    }

    fn prefix_key<K: AsRef<str>>(&self, table: &str, prefix: &[K]) -> StoreResult<KeyTuple> {
        let expected = self.key_arity(table)?;
        let tuple: KeyTuple = prefix.iter().map(|k| AsRef::<str>::as_ref(k)).collect();
        if tuple.len() > expected {
            return Err(StoreError::KeyArity {
                table: table.to_string(),
                actual: tuple.len(),
                keys: tuple,
                expected,
            });
        }
        Ok(tuple)
    }
}

fn value_of<'r>(table: &str, row: &'r Row) -> StoreResult<&'r [u8]> {
    row.value().ok_or_else(|| {
        StoreError::Ledger(LedgerError::ColumnMismatch {
            table: table.to_string(),
            reason: "row has no bytes value column".into(),
        })
    })
}
