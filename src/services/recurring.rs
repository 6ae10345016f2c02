//! Recurring expense template service

use serde::{Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, RecurringExpense, RecurringExpenseId};
use crate::storage::Storage;

/// Service for recurring expense templates
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

/// Fields of a new template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecurring {
    pub name: String,
    pub default_amount: Money,
    pub is_auto_paid: bool,
    pub match_pattern: Option<String>,
    pub category: Option<String>,
}

/// Partial update of a template
///
/// For `match_pattern` and `category` an empty string clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPatch {
    pub name: Option<String>,
    pub default_amount: Option<Money>,
    pub is_auto_paid: Option<bool>,
    pub match_pattern: Option<String>,
    pub category: Option<String>,
    pub order_index: Option<u32>,
    pub is_active: Option<bool>,
}

/// What a template delete removed
#[derive(Debug, Clone)]
pub struct RecurringDeleteResult {
    pub template: RecurringExpense,
    /// Expense lines removed from monthly budgets (cascade only)
    pub instances_removed: usize,
}

fn clearable(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All templates in display order
    pub fn list(&self) -> BudgetResult<Vec<RecurringExpense>> {
        self.storage.recurring.get_all()
    }

    pub fn get(&self, id: RecurringExpenseId) -> BudgetResult<Option<RecurringExpense>> {
        self.storage.recurring.get(id)
    }

    /// Find a template by name or ID reference
    pub fn find(&self, reference: &str) -> BudgetResult<Option<RecurringExpense>> {
        self.storage.recurring.find(reference)
    }

    /// Create a template at the end of the display order
    pub fn create(&self, input: NewRecurring) -> BudgetResult<RecurringExpense> {
        let mut template = RecurringExpense::new(input.name.trim(), input.default_amount);
        template.is_auto_paid = input.is_auto_paid;
        template.match_pattern = input.match_pattern.and_then(clearable);
        template.category = input.category.and_then(clearable);
        template.order_index = self.storage.recurring.next_order_index()?;

        template
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.recurring.upsert(template.clone())?;
        self.storage.recurring.save()?;

        self.storage.log_create(
            EntityType::RecurringExpense,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        Ok(template)
    }

    /// Apply a partial update; existing monthly instances are not touched
    pub fn update(&self, id: RecurringExpenseId, patch: RecurringPatch) -> BudgetResult<RecurringExpense> {
        let before = self
            .storage
            .recurring
            .get(id)?
            .ok_or_else(|| BudgetError::recurring_not_found(id.to_string()))?;

        let mut template = before.clone();
        if let Some(name) = patch.name {
            template.name = name.trim().to_string();
        }
        if let Some(amount) = patch.default_amount {
            template.default_amount = amount;
        }
        if let Some(auto) = patch.is_auto_paid {
            template.is_auto_paid = auto;
        }
        if let Some(pattern) = patch.match_pattern {
            template.match_pattern = clearable(pattern);
        }
        if let Some(category) = patch.category {
            template.category = clearable(category);
        }
        if let Some(order) = patch.order_index {
            template.order_index = order;
        }
        if let Some(active) = patch.is_active {
            template.is_active = active;
        }

        template
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.recurring.upsert(template.clone())?;
        self.storage.recurring.save()?;

        self.storage.log_update(
            EntityType::RecurringExpense,
            id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;

        Ok(template)
    }

    /// Delete a template
    ///
    /// With `cascade`, every monthly expense line instantiated from it is
    /// removed too. Without it, those lines stay and keep a reference to a
    /// template that no longer exists.
    pub fn delete(&self, id: RecurringExpenseId, cascade: bool) -> BudgetResult<RecurringDeleteResult> {
        let template = self
            .storage
            .recurring
            .delete(id)?
            .ok_or_else(|| BudgetError::recurring_not_found(id.to_string()))?;
        self.storage.recurring.save()?;

        self.storage.log_delete(
            EntityType::RecurringExpense,
            id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        let mut instances_removed = 0;
        if cascade {
            for mut budget in self.storage.budgets.with_template(id)? {
                let removed: Vec<_> = budget
                    .expenses
                    .iter()
                    .filter(|e| e.recurring_expense_id == Some(id))
                    .cloned()
                    .collect();
                budget.expenses.retain(|e| e.recurring_expense_id != Some(id));
                budget.touch();
                self.storage.budgets.upsert(budget)?;

                for expense in &removed {
                    self.storage.log_delete(
                        EntityType::MonthlyExpense,
                        expense.id.to_string(),
                        Some(expense.name.clone()),
                        expense,
                    )?;
                }
                instances_removed += removed.len();
            }
            if instances_removed > 0 {
                self.storage.budgets.save()?;
            }
        }

        tracing::info!(template = %template.name, cascade, instances_removed, "deleted recurring expense");
        Ok(RecurringDeleteResult {
            template,
            instances_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BudgetPaths;
    use crate::models::YearMonth;
    use crate::services::BudgetService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn new_template(name: &str, amount: i64) -> NewRecurring {
        NewRecurring {
            name: name.into(),
            default_amount: Money::from_major(amount),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_appends_in_order() {
        let (_temp, storage) = create_test_storage();
        let service = RecurringService::new(&storage);

        let rent = service.create(new_template("Nájem", 18_000)).unwrap();
        let net = service
            .create(NewRecurring {
                match_pattern: Some("  O2 CZ ".into()),
                category: Some("".into()),
                ..new_template("Internet", 600)
            })
            .unwrap();

        assert_eq!(rent.order_index, 0);
        assert_eq!(net.order_index, 1);
        assert_eq!(net.match_pattern.as_deref(), Some("O2 CZ"));
        assert!(net.category.is_none());
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let (_temp, storage) = create_test_storage();
        let err = RecurringService::new(&storage)
            .create(new_template("   ", 100))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(storage.recurring.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_and_clear_pattern() {
        let (_temp, storage) = create_test_storage();
        let service = RecurringService::new(&storage);
        let t = service
            .create(NewRecurring {
                match_pattern: Some("NETFLIX".into()),
                ..new_template("Netflix", 299)
            })
            .unwrap();

        let updated = service
            .update(
                t.id,
                RecurringPatch {
                    default_amount: Some(Money::from_major(329)),
                    match_pattern: Some(String::new()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.default_amount, Money::from_major(329));
        assert!(updated.match_pattern.is_none());
        assert!(!updated.is_active);
        assert!(service
            .update(RecurringExpenseId::new(), RecurringPatch::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_without_cascade_keeps_instances() {
        let (_temp, storage) = create_test_storage();
        let service = RecurringService::new(&storage);
        let t = service.create(new_template("Netflix", 299)).unwrap();

        let jan = YearMonth::new(2025, 1).unwrap();
        BudgetService::new(&storage).get_or_create(jan).unwrap();

        let result = service.delete(t.id, false).unwrap();
        assert_eq!(result.instances_removed, 0);

        let budget = storage.budgets.get(jan).unwrap().unwrap();
        assert_eq!(budget.expenses.len(), 1);
        assert_eq!(budget.expenses[0].recurring_expense_id, Some(t.id));
    }

    #[test]
    fn test_delete_with_cascade_removes_instances() {
        let (_temp, storage) = create_test_storage();
        let service = RecurringService::new(&storage);
        let netflix = service.create(new_template("Netflix", 299)).unwrap();
        service.create(new_template("Nájem", 18_000)).unwrap();

        let budgets = BudgetService::new(&storage);
        for month in 1..=3 {
            budgets.get_or_create(YearMonth::new(2025, month).unwrap()).unwrap();
        }

        let result = service.delete(netflix.id, true).unwrap();
        assert_eq!(result.instances_removed, 3);

        for budget in storage.budgets.get_all().unwrap() {
            let names: Vec<_> = budget.expenses.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, ["Nájem"]);
        }
    }
}
