use crate::error::LedgerResult;
use crate::row::{ColumnDefinition, Row};

/// Iterator over the rows of a scan.
pub type RowIter<'a> = Box<dyn Iterator<Item = &'a Row> + 'a>;

/// Table interface a transaction context exposes to its callers.
///
/// Every mutation made through one context is applied atomically when the
/// context commits, and discarded when it aborts. Reads observe the
/// context's own pending writes.
pub trait TableLedger {
    /// Allocate a table. Fails with `TableExists` if the name is taken.
    fn create_table(&mut self, table: &str, columns: Vec<ColumnDefinition>) -> LedgerResult<()>;

    /// Remove a table and all its rows. Returns `true` if it existed.
    fn delete_table(&mut self, table: &str) -> LedgerResult<bool>;

    fn has_table(&self, table: &str) -> bool;

    /// Add a row. Returns `Ok(false)` if a row with the same key exists.
    fn insert_row(&mut self, table: &str, row: Row) -> LedgerResult<bool>;

    /// Overwrite a row. Returns `Ok(false)` if no row has the same key.
    fn replace_row(&mut self, table: &str, row: Row) -> LedgerResult<bool>;

    /// Remove the row with this exact key. Returns `true` if it existed.
    fn delete_row(&mut self, table: &str, keys: &[String]) -> LedgerResult<bool>;

    /// Exact-key lookup.
    fn get_row(&self, table: &str, keys: &[String]) -> LedgerResult<Option<&Row>>;

    /// Rows whose leading key columns equal `prefix`, in insertion order.
    fn scan_rows(&self, table: &str, prefix: &[String]) -> LedgerResult<RowIter<'_>>;

    /// Write a world-state value outside any table.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()>;

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;
}
