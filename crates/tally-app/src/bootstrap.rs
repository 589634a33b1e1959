use tally_ledger::TableLedger;
use tally_store::RecordStore;
use tracing::{debug, info};

use crate::error::AppResult;

/// World-state key recording the schema version.
pub const VERSION_KEY: &str = "version";

pub const SCHEMA_VERSION: &str = "1";

/// Drop and recreate every registered table, then record the version.
///
/// Running it again wipes all rows. Callers run it inside one invocation so
/// the reset commits as a single unit.
pub fn bootstrap<L>(store: &RecordStore, ledger: &mut L) -> AppResult<()>
where
    L: TableLedger + ?Sized,
{
    for descriptor in store.registry().tables() {
        let existed = store.drop_table(ledger, &descriptor.name)?;
        store.create_table(ledger, &descriptor.name)?;
        debug!(table = %descriptor.name, recreated = existed, "table initialized");
    }
    ledger.put_state(VERSION_KEY, SCHEMA_VERSION.as_bytes().to_vec())?;
    info!(
        tables = store.registry().len(),
        version = SCHEMA_VERSION,
        "bootstrap complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tally_ledger::InMemoryLedger;
    use tally_schema::auction::USER_TABLE;
    use tally_schema::SchemaRegistry;

    fn store() -> RecordStore {
        RecordStore::new(Arc::new(SchemaRegistry::auction()))
    }

    #[test]
    fn creates_every_table_and_version() {
        let store = store();
        let ledger = InMemoryLedger::new();
        let mut inv = ledger.begin().unwrap();
        bootstrap(&store, &mut inv).unwrap();
        for descriptor in store.registry().tables() {
            assert!(inv.has_table(&descriptor.name), "{} missing", descriptor.name);
        }
        assert_eq!(inv.get_state(VERSION_KEY).unwrap(), Some(b"1".to_vec()));
        inv.commit().unwrap();
        assert_eq!(ledger.table_stats().unwrap().len(), 10);
    }

    #[test]
    fn rerun_wipes_rows() {
        let store = store();
        let ledger = InMemoryLedger::new();
        let mut inv = ledger.begin().unwrap();
        bootstrap(&store, &mut inv).unwrap();
        store.insert(&mut inv, USER_TABLE, &["1"], b"{}".to_vec()).unwrap();
        inv.commit().unwrap();

        let mut inv = ledger.begin().unwrap();
        bootstrap(&store, &mut inv).unwrap();
        inv.commit().unwrap();

        let inv = ledger.begin().unwrap();
        assert!(!store.exists(&inv, USER_TABLE, &["1"]).unwrap());
        drop(inv);
        assert_eq!(ledger.height().unwrap(), 2);
    }
}
