//! Manual account service
//!
//! CRUD for manual accounts (cash, savings, anything the bank feed does not
//! cover) and the envelopes that partition their balance.

use serde::{Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    Envelope, EnvelopeId, EnvelopePatch, ManualAccount, ManualAccountId, Money, Partition,
};
use crate::storage::Storage;

use super::partition;

/// Service for manual account management
pub struct ManualAccountService<'a> {
    storage: &'a Storage,
}

/// An account with its envelope partition
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub account: ManualAccount,
    pub partition: Partition,
}

/// Fields of a new manual account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewManualAccount {
    pub name: String,
    pub account_number: Option<String>,
    pub balance: Money,
    pub currency: String,
    pub is_visible: bool,
}

impl NewManualAccount {
    pub fn new(name: impl Into<String>, balance: Money, currency: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account_number: None,
            balance,
            currency: currency.into(),
            is_visible: true,
        }
    }
}

/// Partial update of a manual account; an empty account number clears it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub balance: Option<Money>,
    pub currency: Option<String>,
    pub is_visible: Option<bool>,
}

impl<'a> ManualAccountService<'a> {
    /// Create a new manual account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All accounts, by name
    pub fn list(&self, include_hidden: bool) -> BudgetResult<Vec<ManualAccount>> {
        let accounts = self.storage.accounts.get_all()?;
        Ok(accounts
            .into_iter()
            .filter(|a| include_hidden || a.is_visible)
            .collect())
    }

    /// All accounts with their partitions
    pub fn list_with_partitions(&self, include_hidden: bool) -> BudgetResult<Vec<AccountSummary>> {
        Ok(self
            .list(include_hidden)?
            .into_iter()
            .map(|account| AccountSummary {
                partition: partition::compute_partition(&account),
                account,
            })
            .collect())
    }

    pub fn get(&self, id: ManualAccountId) -> BudgetResult<Option<ManualAccount>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name or ID reference
    pub fn find(&self, reference: &str) -> BudgetResult<Option<ManualAccount>> {
        self.storage.accounts.find(reference)
    }

    fn require(&self, id: ManualAccountId) -> BudgetResult<ManualAccount> {
        self.storage
            .accounts
            .get(id)?
            .ok_or_else(|| BudgetError::account_not_found(id.to_string()))
    }

    fn check_unique_name(&self, name: &str, exclude: Option<ManualAccountId>) -> BudgetResult<()> {
        if self.storage.accounts.name_exists(name, exclude)? {
            return Err(BudgetError::Validation(format!(
                "Manual account '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn persist(&self, account: &ManualAccount) -> BudgetResult<()> {
        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()
    }

    /// Create a new manual account
    pub fn create(&self, input: NewManualAccount) -> BudgetResult<ManualAccount> {
        let name = input.name.trim();
        self.check_unique_name(name, None)?;

        let mut account = ManualAccount::new(name, input.balance, input.currency.trim().to_uppercase());
        account.account_number = input.account_number.filter(|n| !n.trim().is_empty());
        account.is_visible = input.is_visible;

        // Validate
        account
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        // Save to storage
        self.persist(&account)?;

        // Audit log
        self.storage.log_create(
            EntityType::ManualAccount,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        Ok(account)
    }

    /// Update account fields; envelopes are left alone
    pub fn update(&self, id: ManualAccountId, patch: AccountPatch) -> BudgetResult<ManualAccount> {
        let before = self.require(id)?;
        let mut account = before.clone();

        if let Some(name) = patch.name {
            let name = name.trim();
            self.check_unique_name(name, Some(id))?;
            account.name = name.to_string();
        }
        if let Some(number) = patch.account_number {
            account.account_number = Some(number.trim().to_string()).filter(|n| !n.is_empty());
        }
        if let Some(balance) = patch.balance {
            account.balance = balance;
        }
        if let Some(currency) = patch.currency {
            account.currency = currency.trim().to_uppercase();
        }
        if let Some(visible) = patch.is_visible {
            account.is_visible = visible;
        }

        account
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        account.touch();

        self.persist(&account)?;
        self.storage.log_update(
            EntityType::ManualAccount,
            id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;

        Ok(account)
    }

    /// Delete an account together with its envelopes
    pub fn delete(&self, id: ManualAccountId) -> BudgetResult<ManualAccount> {
        let account = self
            .storage
            .accounts
            .delete(id)?
            .ok_or_else(|| BudgetError::account_not_found(id.to_string()))?;
        self.storage.accounts.save()?;

        self.storage.log_delete(
            EntityType::ManualAccount,
            id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;

        Ok(account)
    }

    /// Current partition of one account
    pub fn partition(&self, id: ManualAccountId) -> BudgetResult<Partition> {
        Ok(partition::compute_partition(&self.require(id)?))
    }

    /// Add an envelope to an account
    pub fn add_envelope(&self, account_id: ManualAccountId, envelope: Envelope) -> BudgetResult<Envelope> {
        let mut account = self.require(account_id)?;
        let envelope = Envelope {
            name: envelope.name.trim().to_string(),
            note: envelope.note.filter(|n| !n.trim().is_empty()),
            ..envelope
        };

        partition::add_envelope(&mut account, envelope.clone())?;
        self.persist(&account)?;

        self.storage.log_create(
            EntityType::Envelope,
            envelope.id.to_string(),
            Some(format!("{}/{}", account.name, envelope.name)),
            &envelope,
        )?;

        Ok(envelope)
    }

    fn envelope_of(&self, account: &ManualAccount, id: EnvelopeId) -> BudgetResult<Envelope> {
        account
            .envelope(id)
            .cloned()
            .ok_or_else(|| BudgetError::envelope_not_found(id.to_string()))
    }

    /// Apply a partial update to an envelope
    pub fn update_envelope(
        &self,
        account_id: ManualAccountId,
        envelope_id: EnvelopeId,
        patch: EnvelopePatch,
    ) -> BudgetResult<Envelope> {
        let mut account = self.require(account_id)?;
        let before = self.envelope_of(&account, envelope_id)?;

        partition::update_envelope(&mut account, envelope_id, patch)?;
        let after = self.envelope_of(&account, envelope_id)?;
        self.persist(&account)?;

        self.storage.log_update(
            EntityType::Envelope,
            envelope_id.to_string(),
            Some(format!("{}/{}", account.name, after.name)),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Flip an envelope between "mine" and "held for someone else"
    pub fn toggle_envelope(&self, account_id: ManualAccountId, envelope_id: EnvelopeId) -> BudgetResult<Envelope> {
        let account = self.require(account_id)?;
        let current = self.envelope_of(&account, envelope_id)?;
        let toggled = partition::toggle_ownership(&current);

        self.update_envelope(
            account_id,
            envelope_id,
            EnvelopePatch {
                is_mine: Some(toggled.is_mine),
                ..Default::default()
            },
        )
    }

    /// Remove an envelope; its amount returns to the unallocated remainder
    pub fn remove_envelope(&self, account_id: ManualAccountId, envelope_id: EnvelopeId) -> BudgetResult<Envelope> {
        let mut account = self.require(account_id)?;
        let removed = partition::remove_envelope(&mut account, envelope_id)?;
        self.persist(&account)?;

        self.storage.log_delete(
            EntityType::Envelope,
            envelope_id.to_string(),
            Some(format!("{}/{}", account.name, removed.name)),
            &removed,
        )?;

        Ok(removed)
    }

    /// Find an envelope of an account by name (case-insensitive) or ID reference
    pub fn find_envelope(&self, account: &ManualAccount, reference: &str) -> Option<Envelope> {
        let needle = reference.trim().to_lowercase();
        account
            .envelopes
            .iter()
            .find(|e| e.name.to_lowercase() == needle)
            .or_else(|| account.envelopes.iter().find(|e| e.id.matches(reference)))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BudgetPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn cash(service: &ManualAccountService, balance: i64) -> ManualAccount {
        service
            .create(NewManualAccount::new("Hotovost", Money::from_major(balance), "czk"))
            .unwrap()
    }

    #[test]
    fn test_create_account() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);

        let account = cash(&service, 10_000);
        assert_eq!(account.currency, "CZK");
        assert!(account.envelopes.is_empty());
        assert_eq!(service.find("hotovost").unwrap(), Some(account));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        cash(&service, 0);

        let err = service
            .create(NewManualAccount::new(" HOTOVOST ", Money::zero(), "CZK"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_currency_rejected() {
        let (_temp, storage) = create_test_storage();
        let err = ManualAccountService::new(&storage)
            .create(NewManualAccount::new("Revolut", Money::zero(), "EURO"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update_account() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let account = cash(&service, 10_000);

        let updated = service
            .update(
                account.id,
                AccountPatch {
                    balance: Some(Money::from_major(12_500)),
                    account_number: Some("  ".into()),
                    is_visible: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.balance, Money::from_major(12_500));
        assert!(updated.account_number.is_none());
        assert!(service.list(false).unwrap().is_empty());
        assert_eq!(service.list(true).unwrap().len(), 1);
    }

    #[test]
    fn test_envelope_lifecycle() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let account = cash(&service, 10_000);

        let mamka = service
            .add_envelope(account.id, Envelope::reserved("Mamka", Money::from_major(3_000)))
            .unwrap();
        service
            .add_envelope(account.id, Envelope::new("Dovolená", Money::from_major(2_000)))
            .unwrap();

        let p = service.partition(account.id).unwrap();
        assert_eq!(p.my_balance, Money::from_major(2_000));
        assert_eq!(p.borrowed_total, Money::from_major(3_000));
        assert_eq!(p.unallocated, Money::from_major(5_000));

        let toggled = service.toggle_envelope(account.id, mamka.id).unwrap();
        assert!(toggled.is_mine);
        assert_eq!(
            service.partition(account.id).unwrap().my_balance,
            Money::from_major(5_000)
        );

        service.remove_envelope(account.id, mamka.id).unwrap();
        assert_eq!(
            service.partition(account.id).unwrap().unallocated,
            Money::from_major(8_000)
        );
    }

    #[test]
    fn test_envelope_validation_leaves_account_unchanged() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let account = cash(&service, 1_000);

        let err = service
            .add_envelope(account.id, Envelope::new("Nic", Money::zero()))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.get(account.id).unwrap().unwrap().envelopes.is_empty());

        let err = service
            .remove_envelope(account.id, EnvelopeId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_envelope() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let account = cash(&service, 1_000);
        let env = service
            .add_envelope(account.id, Envelope::new("Dárky", Money::from_major(500)))
            .unwrap();

        let account = service.get(account.id).unwrap().unwrap();
        assert_eq!(service.find_envelope(&account, "dárky"), Some(env.clone()));
        assert_eq!(
            service.find_envelope(&account, &env.id.to_string()[..8]),
            Some(env)
        );
        assert!(service.find_envelope(&account, "jiné").is_none());
    }

    #[test]
    fn test_delete_account() {
        let (_temp, storage) = create_test_storage();
        let service = ManualAccountService::new(&storage);
        let account = cash(&service, 1_000);

        service.delete(account.id).unwrap();
        assert!(service.get(account.id).unwrap().is_none());
        assert!(service.delete(account.id).unwrap_err().is_not_found());
    }
}
