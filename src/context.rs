//! Accounts context
//!
//! Views that show manual accounts read them through an [`AccountsContext`]
//! handed to them explicitly. Each refresh builds a new immutable
//! [`AccountsSnapshot`]; readers holding an older `Arc` keep a consistent
//! view until they ask again.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BudgetResult;
use crate::models::Money;
use crate::services::{AccountSummary, ManualAccountService};
use crate::storage::Storage;

/// Aggregate figures for all accounts in one currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CurrencyTotals {
    pub balance: Money,
    pub my_balance: Money,
    pub borrowed_total: Money,
    pub unallocated: Money,
}

/// Immutable view of all manual accounts at one point in time
#[derive(Debug, Clone, Serialize)]
pub struct AccountsSnapshot {
    pub accounts: Vec<AccountSummary>,
    /// Keyed by currency code; accounts in different currencies are never summed
    pub totals: BTreeMap<String, CurrencyTotals>,
    pub taken_at: DateTime<Utc>,
}

impl AccountsSnapshot {
    fn build(accounts: Vec<AccountSummary>) -> Self {
        let mut totals: BTreeMap<String, CurrencyTotals> = BTreeMap::new();
        for summary in &accounts {
            let entry = totals.entry(summary.account.currency.clone()).or_default();
            entry.balance += summary.account.balance;
            entry.my_balance += summary.partition.my_balance;
            entry.borrowed_total += summary.partition.borrowed_total;
            entry.unallocated += summary.partition.unallocated;
        }

        Self {
            accounts,
            totals,
            taken_at: Utc::now(),
        }
    }

    /// Look up an account summary by account name (case-insensitive)
    pub fn account(&self, name: &str) -> Option<&AccountSummary> {
        let needle = name.trim().to_lowercase();
        self.accounts
            .iter()
            .find(|s| s.account.name.to_lowercase() == needle)
    }
}

/// Shared, refreshable access to the manual accounts
pub struct AccountsContext<'a> {
    storage: &'a Storage,
    include_hidden: bool,
    current: RwLock<Arc<AccountsSnapshot>>,
}

impl<'a> AccountsContext<'a> {
    /// Build the context and its first snapshot
    pub fn new(storage: &'a Storage, include_hidden: bool) -> BudgetResult<Self> {
        let first = Self::load(storage, include_hidden)?;
        Ok(Self {
            storage,
            include_hidden,
            current: RwLock::new(Arc::new(first)),
        })
    }

    fn load(storage: &Storage, include_hidden: bool) -> BudgetResult<AccountsSnapshot> {
        let accounts = ManualAccountService::new(storage).list_with_partitions(include_hidden)?;
        Ok(AccountsSnapshot::build(accounts))
    }

    /// The latest snapshot
    pub fn snapshot(&self) -> Arc<AccountsSnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Re-read accounts from disk and publish a new snapshot
    ///
    /// On failure the previous snapshot stays current.
    pub fn refresh(&self) -> BudgetResult<Arc<AccountsSnapshot>> {
        self.storage.accounts.load()?;
        let fresh = Arc::new(Self::load(self.storage, self.include_hidden)?);

        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&fresh);

        tracing::debug!(accounts = fresh.accounts.len(), "accounts snapshot refreshed");
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BudgetPaths;
    use crate::models::Envelope;
    use crate::services::NewManualAccount;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_snapshot_totals_per_currency() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let cash = service
            .create(NewManualAccount::new("Hotovost", Money::from_major(10_000), "CZK"))
            .unwrap();
        service
            .create(NewManualAccount::new("Spořicí", Money::from_major(5_000), "CZK"))
            .unwrap();
        service
            .create(NewManualAccount::new("Revolut", Money::from_major(200), "EUR"))
            .unwrap();
        service
            .add_envelope(cash.id, Envelope::reserved("Mamka", Money::from_major(3_000)))
            .unwrap();

        let context = AccountsContext::new(&storage, false).unwrap();
        let snapshot = context.snapshot();

        assert_eq!(snapshot.accounts.len(), 3);
        let czk = snapshot.totals["CZK"];
        assert_eq!(czk.balance, Money::from_major(15_000));
        assert_eq!(czk.borrowed_total, Money::from_major(3_000));
        assert_eq!(czk.unallocated, Money::from_major(12_000));
        assert_eq!(snapshot.totals["EUR"].balance, Money::from_major(200));
    }

    #[test]
    fn test_old_snapshot_is_unchanged_after_refresh() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let cash = service
            .create(NewManualAccount::new("Hotovost", Money::from_major(1_000), "CZK"))
            .unwrap();

        let context = AccountsContext::new(&storage, false).unwrap();
        let before = context.snapshot();

        service
            .add_envelope(cash.id, Envelope::new("Dárky", Money::from_major(400)))
            .unwrap();
        let after = context.refresh().unwrap();

        assert!(before.account("hotovost").unwrap().account.envelopes.is_empty());
        assert_eq!(
            after.account("Hotovost").unwrap().partition.my_balance,
            Money::from_major(400)
        );
        assert!(Arc::ptr_eq(&after, &context.snapshot()));
    }

    #[test]
    fn test_hidden_accounts_excluded() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let mut hidden = NewManualAccount::new("Stará", Money::from_major(50), "CZK");
        hidden.is_visible = false;
        service.create(hidden).unwrap();

        assert!(AccountsContext::new(&storage, false).unwrap().snapshot().accounts.is_empty());
        assert_eq!(
            AccountsContext::new(&storage, true).unwrap().snapshot().accounts.len(),
            1
        );
    }
}
