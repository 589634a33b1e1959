use std::collections::{BTreeMap, HashMap};
use std::sync::MutexGuard;

use tracing::{debug, info};

use crate::commit::{Commit, Mutation};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::Journal;
use crate::memory::LedgerState;
use crate::row::{ColumnDefinition, Row};
use crate::table::Table;
use crate::traits::{RowIter, TableLedger};

/// Transaction context for one external invocation.
///
/// Tables are copied on first write into a private working set; untouched
/// tables are read straight from committed state. Every successful
/// mutation is also recorded, in order, in the write set that becomes the
/// [`Commit`]. Nothing reaches committed state until [`commit`];
/// dropping the invocation (or calling [`abort`]) discards everything.
///
/// [`commit`]: Invocation::commit
/// [`abort`]: Invocation::abort
pub struct Invocation<'a> {
    base: MutexGuard<'a, LedgerState>,
    journal: Option<&'a Journal>,
    /// Working copies; `None` marks a table deleted in this invocation.
    tables: HashMap<String, Option<Table>>,
    /// Pending world-state writes.
    state: BTreeMap<String, Vec<u8>>,
    write_set: Vec<Mutation>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(base: MutexGuard<'a, LedgerState>, journal: Option<&'a Journal>) -> Self {
        Self {
            base,
            journal,
            tables: HashMap::new(),
            state: BTreeMap::new(),
            write_set: Vec::new(),
        }
    }

    /// Mutations proposed so far, in order.
    pub fn write_set(&self) -> &[Mutation] {
        &self.write_set
    }

    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty()
    }

    /// Journal the write set, then publish the state.
    ///
    /// Returns `None` for a read-only invocation, which writes nothing. If
    /// the journal append fails, nothing is published.
    pub fn commit(self) -> LedgerResult<Option<Commit>> {
        let Invocation {
            mut base,
            journal,
            tables,
            state,
            write_set,
        } = self;

        if write_set.is_empty() {
            debug!("read-only invocation finished");
            return Ok(None);
        }

        let commit = Commit {
            seq: base.height + 1,
            mutations: write_set,
        };
        if let Some(journal) = journal {
            journal.append(&commit)?;
        }

        for (name, table) in tables {
            match table {
                Some(table) => {
                    base.tables.insert(name, table);
                }
                None => {
                    base.tables.remove(&name);
                }
            }
        }
        base.state.extend(state);

        base.height = commit.seq;
        info!(seq = commit.seq, mutations = commit.mutations.len(), "invocation committed");
        Ok(Some(commit))
    }

    /// Discard every pending mutation.
    pub fn abort(self) {
        debug!(discarded = self.write_set.len(), "invocation aborted");
    }

    fn table(&self, name: &str) -> Option<&Table> {
        match self.tables.get(name) {
            Some(working) => working.as_ref(),
            None => self.base.tables.get(name),
        }
    }

    fn table_mut(&mut self, name: &str) -> LedgerResult<&mut Table> {
        if !self.tables.contains_key(name) {
            let copy = self
                .base
                .tables
                .get(name)
                .cloned()
                .ok_or_else(|| LedgerError::TableNotFound(name.to_string()))?;
            self.tables.insert(name.to_string(), Some(copy));
        }
        match self.tables.get_mut(name) {
            Some(Some(table)) => Ok(table),
            _ => Err(LedgerError::TableNotFound(name.to_string())),
        }
    }
}

impl TableLedger for Invocation<'_> {
    fn create_table(&mut self, table: &str, columns: Vec<ColumnDefinition>) -> LedgerResult<()> {
        if self.table(table).is_some() {
            return Err(LedgerError::TableExists(table.to_string()));
        }
        let created = Table::new(table, columns.clone())?;
        self.tables.insert(table.to_string(), Some(created));
        self.write_set.push(Mutation::CreateTable {
            table: table.to_string(),
            columns,
        });
        Ok(())
    }

    fn delete_table(&mut self, table: &str) -> LedgerResult<bool> {
        if self.table(table).is_none() {
            return Ok(false);
        }
        self.tables.insert(table.to_string(), None);
        self.write_set.push(Mutation::DeleteTable {
            table: table.to_string(),
        });
        Ok(true)
    }

    fn has_table(&self, table: &str) -> bool {
        self.table(table).is_some()
    }

    fn insert_row(&mut self, table: &str, row: Row) -> LedgerResult<bool> {
        let inserted = self.table_mut(table)?.insert(row.clone())?;
        if inserted {
            self.write_set.push(Mutation::InsertRow {
                table: table.to_string(),
                row,
            });
        }
        Ok(inserted)
    }

    fn replace_row(&mut self, table: &str, row: Row) -> LedgerResult<bool> {
        let replaced = self.table_mut(table)?.replace(row.clone())?;
        if replaced {
            self.write_set.push(Mutation::ReplaceRow {
                table: table.to_string(),
                row,
            });
        }
        Ok(replaced)
    }

    fn delete_row(&mut self, table: &str, keys: &[String]) -> LedgerResult<bool> {
        let deleted = self.table_mut(table)?.delete(keys)?;
        if deleted {
            self.write_set.push(Mutation::DeleteRow {
                table: table.to_string(),
                keys: keys.to_vec(),
            });
        }
        Ok(deleted)
    }

    fn get_row(&self, table: &str, keys: &[String]) -> LedgerResult<Option<&Row>> {
        self.table(table)
            .ok_or_else(|| LedgerError::TableNotFound(table.to_string()))?
            .get(keys)
    }

    fn scan_rows(&self, table: &str, prefix: &[String]) -> LedgerResult<RowIter<'_>> {
        let rows = self
            .table(table)
            .ok_or_else(|| LedgerError::TableNotFound(table.to_string()))?
            .scan(prefix)?;
        Ok(Box::new(rows))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        self.state.insert(key.to_string(), value.clone());
        self.write_set.push(Mutation::PutState {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self
            .state
            .get(key)
            .or_else(|| self.base.state.get(key))
            .cloned())
    }
}
