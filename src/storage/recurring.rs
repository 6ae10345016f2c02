//! Recurring expense template repository (recurring.json)

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{RecurringExpense, RecurringExpenseId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecurringData {
    templates: Vec<RecurringExpense>,
}

/// Repository for recurring expense templates
pub struct RecurringRepository {
    path: PathBuf,
    data: RwLock<HashMap<RecurringExpenseId, RecurringExpense>>,
}

fn sorted(mut templates: Vec<RecurringExpense>) -> Vec<RecurringExpense> {
    templates.sort_by(|a, b| a.order_index.cmp(&b.order_index).then(a.name.cmp(&b.name)));
    templates
}

impl RecurringRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: RecurringData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for template in file_data.templates {
            data.insert(template.id, template);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let templates = self.get_all()?;
        write_json_atomic(&self.path, &RecurringData { templates })
    }

    pub fn get(&self, id: RecurringExpenseId) -> Result<Option<RecurringExpense>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(&id).cloned())
    }

    /// All templates in display order
    pub fn get_all(&self) -> Result<Vec<RecurringExpense>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(sorted(data.values().cloned().collect()))
    }

    /// Templates new months are seeded from, in display order
    pub fn get_active(&self) -> Result<Vec<RecurringExpense>, BudgetError> {
        Ok(self.get_all()?.into_iter().filter(|t| t.is_active).collect())
    }

    /// Find a template by name (case-insensitive) or ID reference
    pub fn find(&self, reference: &str) -> Result<Option<RecurringExpense>, BudgetError> {
        let needle = reference.trim().to_lowercase();
        let all = self.get_all()?;
        if let Some(t) = all.iter().find(|t| t.name.to_lowercase() == needle) {
            return Ok(Some(t.clone()));
        }
        Ok(all.into_iter().find(|t| t.id.matches(reference)))
    }

    /// Next free display position
    pub fn next_order_index(&self) -> Result<u32, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data
            .values()
            .map(|t| t.order_index + 1)
            .max()
            .unwrap_or(0))
    }

    pub fn upsert(&self, template: RecurringExpense) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.insert(template.id, template);
        Ok(())
    }

    pub fn delete(&self, id: RecurringExpenseId) -> Result<Option<RecurringExpense>, BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(data.remove(&id))
    }
}
