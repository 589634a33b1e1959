use std::collections::{BTreeMap, HashMap};

use tally_types::KeyTuple;

use crate::error::{LedgerError, LedgerResult};
use crate::row::{Column, ColumnDefinition, ColumnType, Row};

/// A row together with its extracted key.
#[derive(Clone, Debug)]
struct Entry {
    key: KeyTuple,
    row: Row,
}

/// Row storage for one table.
///
/// Rows live in insertion order under a per-table sequence number; an
/// exact-key index maps each key tuple to its slot. Replacing a row keeps
/// its slot, so scans stay insertion-ordered across updates.
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDefinition>,
    key_count: usize,
    rows: BTreeMap<u64, Entry>,
    index: HashMap<KeyTuple, u64>,
    next_slot: u64,
}

impl Table {
    /// Create an empty table.
    ///
    /// Key columns must be string typed, must come first, and there must be
    /// at least one of them.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> LedgerResult<Self> {
        let name = name.into();
        let key_count = columns.iter().take_while(|c| c.key).count();
        let invalid = |reason: &str| LedgerError::InvalidTableDefinition {
            table: name.clone(),
            reason: reason.into(),
        };

        if key_count == 0 {
            return Err(invalid("at least one leading key column is required"));
        }
        if columns[key_count..].iter().any(|c| c.key) {
            return Err(invalid("key columns must precede all value columns"));
        }
        if columns[..key_count]
            .iter()
            .any(|c| c.column_type != ColumnType::String)
        {
            return Err(invalid("key columns must be string typed"));
        }

        Ok(Self {
            name,
            columns,
            key_count,
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_slot: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Number of leading key columns.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add a row. Returns `false` (and changes nothing) if the key exists.
    pub fn insert(&mut self, row: Row) -> LedgerResult<bool> {
        let key = self.key_of(&row)?;
        if self.index.contains_key(&key) {
            return Ok(false);
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        self.index.insert(key.clone(), slot);
        self.rows.insert(slot, Entry { key, row });
        Ok(true)
    }

    /// Overwrite an existing row. Returns `false` if the key is absent.
    pub fn replace(&mut self, row: Row) -> LedgerResult<bool> {
        let key = self.key_of(&row)?;
        match self.index.get(&key) {
            Some(slot) => {
                if let Some(entry) = self.rows.get_mut(slot) {
                    entry.row = row;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the row with this exact key. Returns `true` if it existed.
    pub fn delete(&mut self, keys: &[String]) -> LedgerResult<bool> {
        let key = self.full_key(keys)?;
        match self.index.remove(&key) {
            Some(slot) => {
                self.rows.remove(&slot);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn get(&self, keys: &[String]) -> LedgerResult<Option<&Row>> {
        let key = self.full_key(keys)?;
        Ok(self
            .index
            .get(&key)
            .and_then(|slot| self.rows.get(slot))
            .map(|entry| &entry.row))
    }

    /// Rows whose leading key columns equal `prefix`, in insertion order.
    pub fn scan(&self, prefix: &[String]) -> LedgerResult<impl Iterator<Item = &Row> + '_> {
        if prefix.len() > self.key_count {
            return Err(self.mismatch(format!(
                "scan prefix has {} columns, table has {} key columns",
                prefix.len(),
                self.key_count
            )));
        }
        let prefix = prefix.to_vec();
        Ok(self
            .rows
            .values()
            .filter(move |entry| entry.key.has_prefix(prefix.as_slice()))
            .map(|entry| &entry.row))
    }

    /// Check a row against the layout and extract its key tuple.
    fn key_of(&self, row: &Row) -> LedgerResult<KeyTuple> {
        if row.columns.len() != self.columns.len() {
            return Err(self.mismatch(format!(
                "row has {} columns, table has {}",
                row.columns.len(),
                self.columns.len()
            )));
        }
        for (i, (cell, def)) in row.columns.iter().zip(&self.columns).enumerate() {
            if cell.column_type() != def.column_type {
                return Err(self.mismatch(format!(
                    "column {i} ({}) expects {}, got {}",
                    def.name,
                    def.column_type,
                    cell.column_type()
                )));
            }
        }
        Ok(row.columns[..self.key_count]
            .iter()
            .filter_map(Column::as_str)
            .collect())
    }

    fn full_key(&self, keys: &[String]) -> LedgerResult<KeyTuple> {
        if keys.len() != self.key_count {
            return Err(self.mismatch(format!(
                "expected {} key columns, got {}",
                self.key_count,
                keys.len()
            )));
        }
        Ok(KeyTuple::from(keys))
    }

    fn mismatch(&self, reason: String) -> LedgerError {
        LedgerError::ColumnMismatch {
            table: self.name.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(keys: usize) -> Vec<ColumnDefinition> {
        let mut columns: Vec<ColumnDefinition> = (0..keys)
            .map(|i| ColumnDefinition::key(format!("keyName{i}")))
            .collect();
        columns.push(ColumnDefinition::value("Details", ColumnType::Bytes));
        columns
    }

    fn keys(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn values<'a>(rows: impl Iterator<Item = &'a Row>) -> Vec<Vec<u8>> {
        rows.map(|r| r.value().unwrap().to_vec()).collect()
    }

    // -----------------------------------------------------------------------
    // Layout validation
    // -----------------------------------------------------------------------

    #[test]
    fn table_requires_a_key() {
        let err = Table::new("T", layout(0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTableDefinition { .. }));
    }

    #[test]
    fn keys_must_lead() {
        let columns = vec![
            ColumnDefinition::key("k0"),
            ColumnDefinition::value("v", ColumnType::Bytes),
            ColumnDefinition::key("k1"),
        ];
        assert!(Table::new("T", columns).is_err());
    }

    #[test]
    fn keys_must_be_strings() {
        let columns = vec![ColumnDefinition {
            name: "k".into(),
            column_type: ColumnType::Bytes,
            key: true,
        }];
        assert!(Table::new("T", columns).is_err());
    }

    // -----------------------------------------------------------------------
    // Row operations
    // -----------------------------------------------------------------------

    #[test]
    fn insert_rejects_duplicates_without_change() {
        let mut t = Table::new("T", layout(1)).unwrap();
        assert!(t.insert(Row::keyed(&["1"], b"v1".to_vec())).unwrap());
        assert!(!t.insert(Row::keyed(&["1"], b"v2".to_vec())).unwrap());
        assert_eq!(t.get(&keys(&["1"])).unwrap().unwrap().value(), Some(&b"v1"[..]));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn replace_requires_existing_row() {
        let mut t = Table::new("T", layout(1)).unwrap();
        assert!(!t.replace(Row::keyed(&["1"], b"v".to_vec())).unwrap());
        assert!(t.is_empty());
        t.insert(Row::keyed(&["1"], b"old".to_vec())).unwrap();
        assert!(t.replace(Row::keyed(&["1"], b"new".to_vec())).unwrap());
        assert_eq!(t.get(&keys(&["1"])).unwrap().unwrap().value(), Some(&b"new"[..]));
    }

    #[test]
    fn delete_reports_presence() {
        let mut t = Table::new("T", layout(2)).unwrap();
        t.insert(Row::keyed(&["a", "1"], b"v".to_vec())).unwrap();
        assert!(t.delete(&keys(&["a", "1"])).unwrap());
        assert!(!t.delete(&keys(&["a", "1"])).unwrap());
        assert!(t.get(&keys(&["a", "1"])).unwrap().is_none());
    }

    #[test]
    fn row_shape_is_checked() {
        let mut t = Table::new("T", layout(2)).unwrap();
        let short = Row::keyed(&["a"], b"v".to_vec());
        assert!(matches!(
            t.insert(short),
            Err(LedgerError::ColumnMismatch { .. })
        ));
        let wrong_type = Row::new(vec![
            Column::String("a".into()),
            Column::String("b".into()),
            Column::String("not bytes".into()),
        ]);
        assert!(t.insert(wrong_type).is_err());
        assert!(t.get(&keys(&["a"])).is_err());
    }

    // -----------------------------------------------------------------------
    // Scans
    // -----------------------------------------------------------------------

    #[test]
    fn scan_by_prefix_in_insertion_order() {
        let mut t = Table::new("T", layout(3)).unwrap();
        t.insert(Row::keyed(&["2017", "TR", "3"], b"c".to_vec())).unwrap();
        t.insert(Row::keyed(&["2017", "AH", "1"], b"a".to_vec())).unwrap();
        t.insert(Row::keyed(&["2017", "TR", "2"], b"b".to_vec())).unwrap();
        t.insert(Row::keyed(&["2016", "TR", "9"], b"z".to_vec())).unwrap();

        assert_eq!(values(t.scan(&keys(&["2017", "TR"])).unwrap()), vec![b"c".to_vec(), b"b".to_vec()]);
        assert_eq!(t.scan(&keys(&["2017"])).unwrap().count(), 3);
        assert_eq!(t.scan(&[]).unwrap().count(), 4);
        assert_eq!(t.scan(&keys(&["2018"])).unwrap().count(), 0);
    }

    #[test]
    fn replace_keeps_scan_position() {
        let mut t = Table::new("T", layout(1)).unwrap();
        t.insert(Row::keyed(&["1"], b"a".to_vec())).unwrap();
        t.insert(Row::keyed(&["2"], b"b".to_vec())).unwrap();
        t.replace(Row::keyed(&["1"], b"a2".to_vec())).unwrap();
        assert_eq!(values(t.scan(&[]).unwrap()), vec![b"a2".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn scan_prefix_longer_than_key_fails() {
        let t = Table::new("T", layout(1)).unwrap();
        assert!(t.scan(&keys(&["a", "b"])).is_err());
    }
}
