//! Monthly budget repository
//!
//! Budgets and their expense lines live together in budgets.json, keyed by
//! `YYYY-MM`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{ExpenseId, MonthlyBudget, MonthlyExpense, RecurringExpenseId, YearMonth};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BudgetData {
    budgets: Vec<MonthlyBudget>,
}

/// Repository for monthly budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<YearMonth, MonthlyBudget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<YearMonth, MonthlyBudget>>, BudgetError>
    {
        self.data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<YearMonth, MonthlyBudget>>, BudgetError>
    {
        self.data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut data = self.write_lock()?;
        data.clear();
        for budget in file_data.budgets {
            data.insert(budget.year_month, budget);
        }
        Ok(())
    }

    /// Save budgets to disk, oldest month first
    pub fn save(&self) -> Result<(), BudgetError> {
        let data = self.read_lock()?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by_key(|b| b.year_month);

        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    pub fn get(&self, year_month: YearMonth) -> Result<Option<MonthlyBudget>, BudgetError> {
        Ok(self.read_lock()?.get(&year_month).cloned())
    }

    /// All budgets, oldest month first
    pub fn get_all(&self) -> Result<Vec<MonthlyBudget>, BudgetError> {
        let mut budgets: Vec<_> = self.read_lock()?.values().cloned().collect();
        budgets.sort_by_key(|b| b.year_month);
        Ok(budgets)
    }

    /// Budgets of one calendar year, January first
    pub fn get_year(&self, year: i32) -> Result<Vec<MonthlyBudget>, BudgetError> {
        let mut budgets: Vec<_> = self
            .read_lock()?
            .values()
            .filter(|b| b.year_month.year() == year)
            .cloned()
            .collect();
        budgets.sort_by_key(|b| b.year_month);
        Ok(budgets)
    }

    /// Find the budget holding an expense line
    pub fn find_expense(
        &self,
        id: ExpenseId,
    ) -> Result<Option<(YearMonth, MonthlyExpense)>, BudgetError> {
        let data = self.read_lock()?;
        Ok(data.values().find_map(|b| {
            b.expense(id)
                .map(|e| (b.year_month, e.clone()))
        }))
    }

    /// Find expense lines whose ID or name matches a user reference
    pub fn find_expenses_by_reference(
        &self,
        year_month: YearMonth,
        reference: &str,
    ) -> Result<Vec<MonthlyExpense>, BudgetError> {
        let data = self.read_lock()?;
        let Some(budget) = data.get(&year_month) else {
            return Ok(Vec::new());
        };

        let needle = reference.trim().to_lowercase();
        let by_name: Vec<_> = budget
            .expenses
            .iter()
            .filter(|e| e.name.to_lowercase() == needle)
            .cloned()
            .collect();
        if !by_name.is_empty() {
            return Ok(by_name);
        }

        Ok(budget
            .expenses
            .iter()
            .filter(|e| e.id.matches(reference))
            .cloned()
            .collect())
    }

    /// Budgets that contain instances of a template
    pub fn with_template(&self, template: RecurringExpenseId) -> Result<Vec<MonthlyBudget>, BudgetError> {
        let data = self.read_lock()?;
        Ok(data
            .values()
            .filter(|b| {
                b.expenses
                    .iter()
                    .any(|e| e.recurring_expense_id == Some(template))
            })
            .cloned()
            .collect())
    }

    /// Insert or replace a budget
    pub fn upsert(&self, budget: MonthlyBudget) -> Result<(), BudgetError> {
        self.write_lock()?.insert(budget.year_month, budget);
        Ok(())
    }

    pub fn delete(&self, year_month: YearMonth) -> Result<Option<MonthlyBudget>, BudgetError> {
        Ok(self.write_lock()?.remove(&year_month))
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        Ok(self.read_lock()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_save_load() {
        let (temp_dir, repo) = create_test_repo();

        let mut budget = MonthlyBudget::new(ym(2025, 1));
        budget.salary = Money::from_major(65_000);
        budget
            .expenses
            .push(MonthlyExpense::new("Nájem", Money::from_major(18_000)));
        repo.upsert(budget.clone()).unwrap();
        repo.save().unwrap();

        let reopened = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        reopened.load().unwrap();
        assert_eq!(reopened.get(ym(2025, 1)).unwrap(), Some(budget));
    }

    #[test]
    fn test_get_year_sorted() {
        let (_temp, repo) = create_test_repo();
        for (y, m) in [(2025, 3), (2024, 12), (2025, 1)] {
            repo.upsert(MonthlyBudget::new(ym(y, m))).unwrap();
        }

        let year: Vec<_> = repo
            .get_year(2025)
            .unwrap()
            .into_iter()
            .map(|b| b.year_month)
            .collect();
        assert_eq!(year, [ym(2025, 1), ym(2025, 3)]);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_find_expense() {
        let (_temp, repo) = create_test_repo();
        let expense = MonthlyExpense::new("Internet", Money::from_major(600));
        let id = expense.id;
        let mut budget = MonthlyBudget::new(ym(2025, 2));
        budget.expenses.push(expense);
        repo.upsert(budget).unwrap();

        let (found_ym, found) = repo.find_expense(id).unwrap().unwrap();
        assert_eq!(found_ym, ym(2025, 2));
        assert_eq!(found.name, "Internet");
        assert!(repo.find_expense(ExpenseId::new()).unwrap().is_none());

        let by_name = repo.find_expenses_by_reference(ym(2025, 2), "internet").unwrap();
        assert_eq!(by_name.len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp, repo) = create_test_repo();
        repo.upsert(MonthlyBudget::new(ym(2025, 5))).unwrap();
        assert!(repo.delete(ym(2025, 5)).unwrap().is_some());
        assert!(repo.delete(ym(2025, 5)).unwrap().is_none());
    }
}
