//! Manual account repository
//!
//! Manual accounts and their envelopes are stored in manual_accounts.json.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{ManualAccount, ManualAccountId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ManualAccountData {
    accounts: Vec<ManualAccount>,
}

/// Repository for manual account persistence
pub struct ManualAccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<ManualAccountId, ManualAccount>>,
}

impl ManualAccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: ManualAccountData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Save accounts to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let accounts = self.get_all()?;
        write_json_atomic(&self.path, &ManualAccountData { accounts })
    }

    pub fn get(&self, id: ManualAccountId) -> Result<Option<ManualAccount>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All accounts, by name
    pub fn get_all(&self) -> Result<Vec<ManualAccount>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(accounts)
    }

    /// Find an account by name (case-insensitive) or ID reference
    pub fn find(&self, reference: &str) -> Result<Option<ManualAccount>, BudgetError> {
        let needle = reference.trim().to_lowercase();
        let all = self.get_all()?;
        if let Some(account) = all.iter().find(|a| a.name.to_lowercase() == needle) {
            return Ok(Some(account.clone()));
        }
        Ok(all.into_iter().find(|a| a.id.matches(reference)))
    }

    /// Check if an account name is already taken
    pub fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<ManualAccountId>,
    ) -> Result<bool, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .any(|a| a.name.to_lowercase() == name_lower && Some(a.id) != exclude_id))
    }

    /// Insert or update an account
    pub fn upsert(&self, account: ManualAccount) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(account.id, account);
        Ok(())
    }

    pub fn delete(&self, id: ManualAccountId) -> Result<Option<ManualAccount>, BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }
}
