use std::sync::Arc;

use tally_ledger::{Commit, InMemoryLedger};
use tally_records::RecordKind;
use tally_store::RecordStore;
use tracing::{info, warn};

use crate::bootstrap::bootstrap;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::handlers::Handlers;
use crate::operation::{Mode, Operation};

/// Entry point for named operations.
///
/// Each call runs in its own ledger invocation. An invoke commits when its
/// handler succeeds and aborts otherwise, so a handler that fails halfway
/// leaves nothing behind. Queries never commit.
pub struct Router {
    ledger: InMemoryLedger,
    handlers: Handlers,
}

impl Router {
    pub fn new(ledger: InMemoryLedger, store: RecordStore, category_epoch: impl Into<String>) -> Self {
        Self {
            ledger,
            handlers: Handlers::new(store, category_epoch),
        }
    }

    /// Open the configured journal and schema.
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        let registry = Arc::new(config.registry()?);
        let ledger = InMemoryLedger::open(&config.journal_path, config.journal_config())?;
        Ok(Self::new(
            ledger,
            RecordStore::new(registry),
            config.category_epoch.clone(),
        ))
    }

    /// A router over a volatile ledger, with no journal.
    pub fn volatile(config: &AppConfig) -> AppResult<Self> {
        let registry = Arc::new(config.registry()?);
        Ok(Self::new(
            InMemoryLedger::new(),
            RecordStore::new(registry),
            config.category_epoch.clone(),
        ))
    }

    /// Drop and recreate every table in one commit.
    pub fn init(&self) -> AppResult<Option<Commit>> {
        let mut inv = self.ledger.begin()?;
        if let Err(e) = bootstrap(self.handlers.store(), &mut inv) {
            warn!(error = %e, "bootstrap aborted");
            inv.abort();
            return Err(e);
        }
        Ok(inv.commit()?)
    }

    /// Run a writing operation and commit its effects.
    ///
    /// At least one argument must name a record kind.
    pub fn invoke(&self, name: &str, args: &[String]) -> AppResult<Vec<u8>> {
        let operation = Operation::resolve(name, Mode::Invoke)?;
        if RecordKind::find_in(args).is_none() {
            warn!(operation = %operation, ?args, "rejected: no record type in arguments");
            return Err(AppError::NoRecordKind(args.to_vec()));
        }

        let mut inv = self.ledger.begin()?;
        match self.handlers.invoke(operation, &mut inv, args) {
            Ok(result) => {
                let commit = inv.commit()?;
                info!(
                    operation = %operation,
                    seq = commit.as_ref().map(|c| c.seq),
                    "invoke committed"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(operation = %operation, error = %e, "invoke aborted");
                inv.abort();
                Err(e)
            }
        }
    }

    /// Run a read-only operation.
    pub fn query(&self, name: &str, args: &[String]) -> AppResult<Vec<u8>> {
        let operation = Operation::resolve(name, Mode::Query)?;
        let inv = self.ledger.begin()?;
        let result = self.handlers.query(operation, &inv, args);
        inv.abort();
        result
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    pub fn store(&self) -> &RecordStore {
        self.handlers.store()
    }

    pub fn category_epoch(&self) -> &str {
        self.handlers.category_epoch()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("ledger", &self.ledger)
            .field("category_epoch", &self.category_epoch())
            .finish()
    }
}
