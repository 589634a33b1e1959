use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use tracing::{info, warn};

use crate::commit::{Commit, Mutation};
use crate::error::{LedgerError, LedgerResult};
use crate::invocation::Invocation;
use crate::journal::{Journal, JournalConfig};
use crate::table::Table;

/// Committed world state.
#[derive(Default)]
pub(crate) struct LedgerState {
    pub(crate) tables: HashMap<String, Table>,
    pub(crate) state: BTreeMap<String, Vec<u8>>,
    /// Sequence number of the latest commit.
    pub(crate) height: u64,
}

impl LedgerState {
    /// Re-apply a recovered commit on top of the current state.
    fn replay(&mut self, commit: Commit) -> LedgerResult<()> {
        if commit.seq != self.height + 1 {
            return Err(LedgerError::ReplayMismatch {
                seq: commit.seq,
                reason: format!("expected commit {}", self.height + 1),
            });
        }
        for mutation in &commit.mutations {
            self.apply(commit.seq, mutation)?;
        }
        self.height = commit.seq;
        Ok(())
    }

    /// Only effective mutations are journaled, so each one must take effect
    /// again here.
    fn apply(&mut self, seq: u64, mutation: &Mutation) -> LedgerResult<()> {
        let mismatch = |reason: String| LedgerError::ReplayMismatch { seq, reason };
        match mutation {
            Mutation::CreateTable { table, columns } => {
                if self.tables.contains_key(table) {
                    return Err(mismatch(format!("table {table} created twice")));
                }
                self.tables
                    .insert(table.clone(), Table::new(table.clone(), columns.clone())?);
            }
            Mutation::DeleteTable { table } => {
                if self.tables.remove(table).is_none() {
                    return Err(mismatch(format!("delete of missing table {table}")));
                }
            }
            Mutation::InsertRow { table, row } => {
                if !self.table_mut(table)?.insert(row.clone())? {
                    return Err(mismatch(format!("duplicate row replayed into {table}")));
                }
            }
            Mutation::ReplaceRow { table, row } => {
                if !self.table_mut(table)?.replace(row.clone())? {
                    return Err(mismatch(format!("replace of missing row in {table}")));
                }
            }
            Mutation::DeleteRow { table, keys } => {
                if !self.table_mut(table)?.delete(keys)? {
                    return Err(mismatch(format!("delete of missing row in {table}")));
                }
            }
            Mutation::PutState { key, value } => {
                self.state.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    fn table_mut(&mut self, table: &str) -> LedgerResult<&mut Table> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| LedgerError::TableNotFound(table.to_string()))
    }
}

/// Single-node table ledger.
///
/// World state lives in memory. Invocations are serialized: [`begin`]
/// holds the ledger for the lifetime of the returned [`Invocation`]. When a
/// [`Journal`] is attached, every commit is appended to it before the state
/// is published, and [`open`] rebuilds the state by replaying the journal.
///
/// [`begin`]: InMemoryLedger::begin
/// [`open`]: InMemoryLedger::open
pub struct InMemoryLedger {
    pub(crate) inner: Mutex<LedgerState>,
    pub(crate) journal: Option<Journal>,
}

impl InMemoryLedger {
    /// A volatile ledger with no journal.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerState::default()),
            journal: None,
        }
    }

    /// Open a journal-backed ledger, replaying every commit.
    ///
    /// A torn final frame is discarded; any other damage is an error.
    pub fn open(path: &Path, config: JournalConfig) -> LedgerResult<Self> {
        let journal = Journal::open(path, config)?;
        let recovery = journal.recover()?;
        if recovery.torn_tail {
            warn!(
                path = %path.display(),
                valid_len = recovery.valid_len,
                "discarding torn journal tail"
            );
            journal.truncate_to(recovery.valid_len)?;
        }

        let mut state = LedgerState::default();
        for commit in recovery.commits {
            state.replay(commit)?;
        }
        info!(
            path = %path.display(),
            height = state.height,
            tables = state.tables.len(),
            "ledger opened"
        );

        Ok(Self {
            inner: Mutex::new(state),
            journal: Some(journal),
        })
    }

    /// Start an invocation. Blocks until any other invocation finishes.
    pub fn begin(&self) -> LedgerResult<Invocation<'_>> {
        Ok(Invocation::new(self.lock()?, self.journal.as_ref()))
    }

    /// Number of commits so far.
    pub fn height(&self) -> LedgerResult<u64> {
        Ok(self.lock()?.height)
    }

    /// Names and row counts of all tables, sorted by name.
    pub fn table_stats(&self) -> LedgerResult<Vec<(String, usize)>> {
        let state = self.lock()?;
        let mut stats: Vec<(String, usize)> = state
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table.len()))
            .collect();
        stats.sort();
        Ok(stats)
    }

    pub fn journal_path(&self) -> Option<&Path> {
        self.journal.as_ref().map(Journal::path)
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, LedgerState>> {
        self.inner.lock().map_err(|_| LedgerError::Poisoned)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLedger")
            .field("journal", &self.journal_path())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{ColumnDefinition, ColumnType, Row};
    use crate::traits::TableLedger;

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

    fn seed(ledger: &InMemoryLedger) {
        let mut inv = ledger.begin().unwrap();
        inv.create_table("Users", layout(1)).unwrap();
        inv.insert_row("Users", Row::keyed(&["42"], b"ada".to_vec())).unwrap();
        inv.put_state("version", b"1".to_vec()).unwrap();
        inv.commit().unwrap();
    }

    // -----------------------------------------------------------------------
    // Commit / abort
    // -----------------------------------------------------------------------

    #[test]
    fn committed_writes_are_visible() {
        let ledger = InMemoryLedger::new();
        seed(&ledger);

        let inv = ledger.begin().unwrap();
        let row = inv.get_row("Users", &keys(&["42"])).unwrap().unwrap();
        assert_eq!(row.value(), Some(&b"ada"[..]));
        assert_eq!(inv.get_state("version").unwrap(), Some(b"1".to_vec()));
        drop(inv);

        assert_eq!(ledger.height().unwrap(), 1);
        assert_eq!(ledger.table_stats().unwrap(), vec![("Users".to_string(), 1)]);
    }

    #[test]
    fn aborted_invocation_leaves_no_trace() {
        let ledger = InMemoryLedger::new();
        seed(&ledger);

        let mut inv = ledger.begin().unwrap();
        inv.insert_row("Users", Row::keyed(&["43"], b"bob".to_vec())).unwrap();
        inv.create_table("Items", layout(1)).unwrap();
        assert!(inv.get_row("Users", &keys(&["43"])).unwrap().is_some());
        inv.abort();

        let inv = ledger.begin().unwrap();
        assert!(inv.get_row("Users", &keys(&["43"])).unwrap().is_none());
        assert!(!inv.has_table("Items"));
        drop(inv);
        assert_eq!(ledger.height().unwrap(), 1);
    }

    #[test]
    fn read_only_invocation_produces_no_commit() {
        let ledger = InMemoryLedger::new();
        seed(&ledger);
        let inv = ledger.begin().unwrap();
        assert!(inv.commit().unwrap().is_none());
        assert_eq!(ledger.height().unwrap(), 1);
    }

    #[test]
    fn commits_are_numbered_from_one() {
        let ledger = InMemoryLedger::new();
        seed(&ledger);
        let mut inv = ledger.begin().unwrap();
        inv.insert_row("Users", Row::keyed(&["7"], b"x".to_vec())).unwrap();
        let commit = inv.commit().unwrap().unwrap();
        assert_eq!(commit.seq, 2);
        assert_eq!(commit.mutations.len(), 1);
        assert_eq!(ledger.height().unwrap(), 2);
    }

    // -----------------------------------------------------------------------
    // Journal replay
    // -----------------------------------------------------------------------

    #[test]
    fn reopen_replays_journal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.journal");
        {
            let ledger = InMemoryLedger::open(&path, JournalConfig::default()).unwrap();
            seed(&ledger);
            let mut inv = ledger.begin().unwrap();
            inv.replace_row("Users", Row::keyed(&["42"], b"ada2".to_vec())).unwrap();
            inv.commit().unwrap();
        }

        let ledger = InMemoryLedger::open(&path, JournalConfig::default()).unwrap();
        assert_eq!(ledger.height().unwrap(), 2);
        let inv = ledger.begin().unwrap();
        let row = inv.get_row("Users", &keys(&["42"])).unwrap().unwrap();
        assert_eq!(row.value(), Some(&b"ada2"[..]));
    }

    #[test]
    fn aborted_work_is_not_journaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.journal");
        {
            let ledger = InMemoryLedger::open(&path, JournalConfig::default()).unwrap();
            seed(&ledger);
            let mut inv = ledger.begin().unwrap();
            inv.insert_row("Users", Row::keyed(&["99"], b"gone".to_vec())).unwrap();
            inv.abort();
        }
        let ledger = InMemoryLedger::open(&path, JournalConfig::default()).unwrap();
        let inv = ledger.begin().unwrap();
        assert!(inv.get_row("Users", &keys(&["99"])).unwrap().is_none());
    }

    #[test]
    fn volatile_ledger_has_no_journal() {
        assert!(InMemoryLedger::default().journal_path().is_none());
    }

    #[test]
    fn failed_journal_write_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.journal");
        {
            let ledger = InMemoryLedger::open(&path, JournalConfig::default()).unwrap();
            seed(&ledger);
            ledger.journal.as_ref().unwrap().fail_writes();

            let mut inv = ledger.begin().unwrap();
            inv.insert_row("Users", Row::keyed(&["8"], b"lost".to_vec())).unwrap();
            assert!(inv.commit().is_err());

            let inv = ledger.begin().unwrap();
            assert!(inv.get_row("Users", &keys(&["8"])).unwrap().is_none());
            drop(inv);
            assert_eq!(ledger.height().unwrap(), 1);
        }

        let ledger = InMemoryLedger::open(&path, JournalConfig::default()).unwrap();
        assert_eq!(ledger.height().unwrap(), 1);
        let mut inv = ledger.begin().unwrap();
        assert!(inv.get_row("Users", &keys(&["8"])).unwrap().is_none());
        inv.insert_row("Users", Row::keyed(&["8"], b"kept".to_vec())).unwrap();
        assert_eq!(inv.commit().unwrap().unwrap().seq, 2);
    }

    // -----------------------------------------------------------------------
    // Replay checks
    // -----------------------------------------------------------------------

    fn write_journal(path: &Path, commits: &[Commit]) {
        let journal = Journal::open(path, JournalConfig::default()).unwrap();
        for commit in commits {
            journal.append(commit).unwrap();
        }
    }

    fn create_users(seq: u64) -> Commit {
        Commit {
            seq,
            mutations: vec![Mutation::CreateTable {
                table: "Users".into(),
                columns: layout(1),
            }],
        }
    }

    #[test]
    fn replay_rejects_delete_of_missing_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.journal");
        write_journal(
            &path,
            &[
                create_users(1),
                Commit {
                    seq: 2,
                    mutations: vec![Mutation::DeleteRow {
                        table: "Users".into(),
                        keys: keys(&["42"]),
                    }],
                },
            ],
        );
        assert!(matches!(
            InMemoryLedger::open(&path, JournalConfig::default()),
            Err(LedgerError::ReplayMismatch { seq: 2, .. })
        ));
    }

    #[test]
    fn replay_rejects_sequence_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.journal");
        write_journal(&path, &[create_users(1), create_users(1)]);
        assert!(matches!(
            InMemoryLedger::open(&path, JournalConfig::default()),
            Err(LedgerError::ReplayMismatch { seq: 1, .. })
        ));
    }
}
