//! Storage layer for monthly-budget
//!
//! JSON file repositories with atomic writes, the read-only upstream
//! transaction feed, and the audit log every mutation is recorded in.

pub mod accounts;
pub mod budgets;
pub mod feed;
pub mod file_io;
pub mod recurring;

pub use accounts::ManualAccountRepository;
pub use budgets::BudgetRepository;
pub use feed::{ImportResult, JsonTransactionFeed, MemoryFeed, TransactionFeed};
pub use file_io::{read_json, write_json_atomic};
pub use recurring::RecurringRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    pub budgets: BudgetRepository,
    pub recurring: RecurringRepository,
    pub accounts: ManualAccountRepository,
    feed: Box<dyn TransactionFeed>,
    audit: AuditLogger,
}

impl Storage {
    /// Open the store under `paths`, reading transactions from transactions.json
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        let feed = JsonTransactionFeed::new(paths.transactions_file());
        Self::with_feed(paths, Box::new(feed))
    }

    /// Open the store with a custom transaction feed
    pub fn with_feed(paths: BudgetPaths, feed: Box<dyn TransactionFeed>) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            budgets: BudgetRepository::new(paths.budgets_file()),
            recurring: RecurringRepository::new(paths.recurring_file()),
            accounts: ManualAccountRepository::new(paths.manual_accounts_file()),
            audit: AuditLogger::new(paths.audit_log()),
            feed,
            paths,
        })
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    /// Upstream bank transactions
    pub fn feed(&self) -> &dyn TransactionFeed {
        self.feed.as_ref()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), BudgetError> {
        self.budgets.load()?;
        self.recurring.load()?;
        self.accounts.load()?;
        tracing::debug!(base = %self.paths.base_dir().display(), "store loaded");
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BudgetError> {
        self.budgets.save()?;
        self.recurring.save()?;
        self.accounts.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log, with a diff of the serialized states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), BudgetError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
