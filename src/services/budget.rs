//! Budget service
//!
//! Monthly budgets and their expense lines: creation from templates, income
//! edits, copy-previous, transaction matching and salary sync. Every mutation
//! validates first, then persists, then writes an audit entry.

use serde::{Deserialize, Serialize};

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetTotals, ExpenseId, Money, MonthlyBudget, MonthlyExpense, YearMonth};
use crate::storage::Storage;

use super::allocator;
use super::income::{self, IncomeSync};
use super::matching::{self, MatchReport};
use super::transfer::TransferRules;

/// Service for monthly budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// A budget together with its derived totals
#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverview {
    pub budget: MonthlyBudget,
    pub totals: BudgetTotals,
}

/// Partial update of a budget's own fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub salary: Option<Money>,
    pub other_income: Option<Money>,
    pub meal_vouchers: Option<Money>,
    pub investment_amount: Option<Money>,
    pub surplus_to_savings: Option<Money>,
    pub is_closed: Option<bool>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial update of an expense line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<Money>,
    /// One of 100, 50, 33, 25
    pub percentage: Option<u8>,
    pub is_paid: Option<bool>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a copy-previous operation
#[derive(Debug, Clone)]
pub struct CopyResult {
    pub from: YearMonth,
    pub budget: MonthlyBudget,
    pub copied: usize,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Get a budget without creating it
    pub fn get(&self, year_month: YearMonth) -> BudgetResult<Option<MonthlyBudget>> {
        self.storage.budgets.get(year_month)
    }

    fn require(&self, year_month: YearMonth) -> BudgetResult<MonthlyBudget> {
        self.storage
            .budgets
            .get(year_month)?
            .ok_or_else(|| BudgetError::budget_not_found(year_month.to_string()))
    }

    fn persist(&self, budget: &MonthlyBudget) -> BudgetResult<()> {
        self.storage.budgets.upsert(budget.clone())?;
        self.storage.budgets.save()
    }

    /// Get a month's budget, creating it from the active templates if missing
    pub fn get_or_create(&self, year_month: YearMonth) -> BudgetResult<MonthlyBudget> {
        if let Some(budget) = self.storage.budgets.get(year_month)? {
            return Ok(budget);
        }

        let mut budget = MonthlyBudget::new(year_month);
        budget.expenses = self
            .storage
            .recurring
            .get_active()?
            .iter()
            .map(allocator::instantiate_from_template)
            .collect();

        self.persist(&budget)?;
        self.storage.log_create(
            EntityType::MonthlyBudget,
            year_month.to_string(),
            None,
            &budget,
        )?;

        tracing::info!(
            %year_month,
            expenses = budget.expenses.len(),
            "created budget from templates"
        );
        Ok(budget)
    }

    /// Budget plus totals, creating the month if needed
    pub fn overview(&self, year_month: YearMonth) -> BudgetResult<BudgetOverview> {
        let budget = self.get_or_create(year_month)?;
        let totals = allocator::compute_totals(&budget);
        Ok(BudgetOverview { budget, totals })
    }

    /// Update income, investment, savings and the closed flag
    pub fn update(&self, year_month: YearMonth, patch: BudgetPatch) -> BudgetResult<MonthlyBudget> {
        let before = self.require(year_month)?;
        let mut budget = before.clone();

        if let Some(v) = patch.salary {
            budget.salary = v;
        }
        if let Some(v) = patch.other_income {
            budget.other_income = v;
        }
        if let Some(v) = patch.meal_vouchers {
            budget.meal_vouchers = v;
        }
        if let Some(v) = patch.investment_amount {
            budget.investment_amount = v;
        }
        if let Some(v) = patch.surplus_to_savings {
            budget.surplus_to_savings = v;
        }
        if let Some(v) = patch.is_closed {
            budget.is_closed = v;
        }

        budget
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        budget.touch();

        self.persist(&budget)?;
        self.storage.log_update(
            EntityType::MonthlyBudget,
            year_month.to_string(),
            None,
            &before,
            &budget,
        )?;

        Ok(budget)
    }

    /// Delete a budget and all of its expense lines
    pub fn delete(&self, year_month: YearMonth) -> BudgetResult<MonthlyBudget> {
        let budget = self
            .storage
            .budgets
            .delete(year_month)?
            .ok_or_else(|| BudgetError::budget_not_found(year_month.to_string()))?;
        self.storage.budgets.save()?;

        self.storage.log_delete(
            EntityType::MonthlyBudget,
            year_month.to_string(),
            None,
            &budget,
        )?;

        Ok(budget)
    }

    /// Add a one-off expense line to an existing budget
    pub fn add_expense(
        &self,
        year_month: YearMonth,
        name: &str,
        amount: Money,
        is_auto_paid: bool,
    ) -> BudgetResult<MonthlyExpense> {
        let mut budget = self.require(year_month)?;

        let mut expense = MonthlyExpense::new(name.trim(), amount);
        expense.is_auto_paid = is_auto_paid;
        expense
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        budget.expenses.push(expense.clone());
        budget.touch();
        self.persist(&budget)?;

        self.storage.log_create(
            EntityType::MonthlyExpense,
            expense.id.to_string(),
            Some(expense.name.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    fn locate_expense(&self, id: ExpenseId) -> BudgetResult<(MonthlyBudget, MonthlyExpense)> {
        let (year_month, expense) = self
            .storage
            .budgets
            .find_expense(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;
        Ok((self.require(year_month)?, expense))
    }

    fn replace_expense(
        &self,
        mut budget: MonthlyBudget,
        before: &MonthlyExpense,
        after: MonthlyExpense,
    ) -> BudgetResult<MonthlyExpense> {
        let slot = budget
            .expense_mut(after.id)
            .ok_or_else(|| BudgetError::expense_not_found(after.id.to_string()))?;
        *slot = after.clone();
        budget.touch();
        self.persist(&budget)?;

        self.storage.log_update(
            EntityType::MonthlyExpense,
            after.id.to_string(),
            Some(after.name.clone()),
            before,
            &after,
        )?;

        Ok(after)
    }

    /// Find expense lines of a month by name or ID reference
    pub fn find_expenses(&self, year_month: YearMonth, reference: &str) -> BudgetResult<Vec<MonthlyExpense>> {
        self.storage.budgets.find_expenses_by_reference(year_month, reference)
    }

    /// Apply a partial update to an expense line
    pub fn update_expense(&self, id: ExpenseId, patch: ExpensePatch) -> BudgetResult<MonthlyExpense> {
        let (budget, before) = self.locate_expense(id)?;

        let mut updated = match patch.percentage {
            Some(pct) => allocator::set_expense_share(&before, pct)?,
            None => before.clone(),
        };
        if let Some(name) = patch.name {
            updated.name = name.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            updated.amount = amount;
        }
        if let Some(is_paid) = patch.is_paid {
            updated.is_paid = is_paid;
        }
        updated
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.replace_expense(budget, &before, updated)
    }

    /// Flip an expense's paid flag
    pub fn toggle_paid(&self, id: ExpenseId) -> BudgetResult<MonthlyExpense> {
        let (budget, before) = self.locate_expense(id)?;
        let updated = allocator::toggle_paid(&before);
        self.replace_expense(budget, &before, updated)
    }

    /// Remove an expense line, optionally deleting the template it came from
    ///
    /// With `delete_template`, other months keep their instances; only the
    /// template itself goes away.
    pub fn delete_expense(&self, id: ExpenseId, delete_template: bool) -> BudgetResult<MonthlyExpense> {
        let (mut budget, expense) = self.locate_expense(id)?;

        budget.expenses.retain(|e| e.id != id);
        budget.touch();
        self.persist(&budget)?;

        self.storage.log_delete(
            EntityType::MonthlyExpense,
            id.to_string(),
            Some(expense.name.clone()),
            &expense,
        )?;

        if let Some(template_id) = expense.recurring_expense_id.filter(|_| delete_template) {
            if let Some(template) = self.storage.recurring.delete(template_id)? {
                self.storage.recurring.save()?;
                self.storage.log_delete(
                    EntityType::RecurringExpense,
                    template.id.to_string(),
                    Some(template.name.clone()),
                    &template,
                )?;
            }
        }

        Ok(expense)
    }

    /// Seed a month from the one before it
    ///
    /// Copies expense lines (fresh IDs, unpaid, unmatched) and the three
    /// income fields. Fails with `NotFound` when the previous month has no
    /// budget and with `DuplicatePeriod` when this month already has expenses.
    pub fn copy_previous(&self, year_month: YearMonth) -> BudgetResult<CopyResult> {
        let from = year_month
            .prev()
            .ok_or_else(|| BudgetError::budget_not_found(format!("month before {}", year_month)))?;
        let previous = self
            .storage
            .budgets
            .get(from)?
            .ok_or_else(|| BudgetError::budget_not_found(from.to_string()))?;

        let existing = self.storage.budgets.get(year_month)?;
        let before = existing.clone();
        let mut budget = existing.unwrap_or_else(|| MonthlyBudget::new(year_month));

        let copied = allocator::copy_from_previous_period(&budget, &previous)?;
        let count = copied.len();

        budget.expenses = copied;
        budget.salary = previous.salary;
        budget.other_income = previous.other_income;
        budget.meal_vouchers = previous.meal_vouchers;
        budget.touch();

        self.persist(&budget)?;
        match &before {
            Some(before) => self.storage.log_update(
                EntityType::MonthlyBudget,
                year_month.to_string(),
                None,
                before,
                &budget,
            )?,
            None => self.storage.log_create(
                EntityType::MonthlyBudget,
                year_month.to_string(),
                None,
                &budget,
            )?,
        }

        tracing::info!(%from, to = %year_month, expenses = count, "copied previous month");
        Ok(CopyResult {
            from,
            budget,
            copied: count,
        })
    }

    /// Link unpaid expense lines to this month's bank transactions
    pub fn match_transactions(
        &self,
        year_month: YearMonth,
        settings: &Settings,
    ) -> BudgetResult<MatchReport> {
        let before = self.require(year_month)?;
        let transactions = self.storage.feed().transactions()?;
        let templates = self.storage.recurring.get_all()?;
        let rules = TransferRules::new(&settings.transfers, &self.storage.accounts.get_all()?);

        let mut budget = before.clone();
        let report = matching::match_transactions(
            &mut budget,
            &templates,
            &transactions,
            &rules,
            &settings.matching,
        );

        if report.total() > 0 {
            self.persist(&budget)?;
            self.storage.log_update(
                EntityType::MonthlyBudget,
                year_month.to_string(),
                None,
                &before,
                &budget,
            )?;
        }

        tracing::info!(
            %year_month,
            by_pattern = report.by_pattern,
            by_amount = report.by_amount,
            by_category = report.by_category,
            "matched transactions"
        );
        Ok(report)
    }

    /// Set salary from categorised salary transactions
    pub fn sync_income(&self, year_month: YearMonth, settings: &Settings) -> BudgetResult<IncomeSync> {
        // Read the feed first so an unavailable upstream changes nothing
        let transactions = self.storage.feed().transactions()?;

        let before = self.get_or_create(year_month)?;
        let mut budget = before.clone();
        let sync = income::sync_income(&mut budget, &transactions, &settings.income);

        if sync.changed() {
            budget
                .validate()
                .map_err(|e| BudgetError::Validation(e.to_string()))?;
            self.persist(&budget)?;
            self.storage.log_update(
                EntityType::MonthlyBudget,
                year_month.to_string(),
                None,
                &before,
                &budget,
            )?;
        }

        Ok(sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BudgetPaths;
    use crate::models::{RecurringExpense, Share, Transaction, TransactionId};
    use crate::storage::MemoryFeed;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn storage_with_feed(transactions: Vec<Transaction>) -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::with_feed(paths, Box::new(MemoryFeed::new(transactions))).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn ym(month: u32) -> YearMonth {
        YearMonth::new(2025, month).unwrap()
    }

    fn add_template(storage: &Storage, name: &str, amount: i64, order: u32, active: bool) -> RecurringExpense {
        let mut t = RecurringExpense::new(name, Money::from_major(amount));
        t.order_index = order;
        t.is_active = active;
        storage.recurring.upsert(t.clone()).unwrap();
        t
    }

    #[test]
    fn test_get_or_create_seeds_active_templates_in_order() {
        let (_temp, storage) = create_test_storage();
        add_template(&storage, "Internet", 600, 2, true);
        add_template(&storage, "Nájem", 18_000, 1, true);
        add_template(&storage, "Posilovna", 900, 0, false);

        let service = BudgetService::new(&storage);
        let budget = service.get_or_create(ym(1)).unwrap();

        let names: Vec<_> = budget.expenses.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Nájem", "Internet"]);
        assert!(budget.expenses.iter().all(|e| e.share == Share::Full && !e.is_paid));

        // Second call returns the stored budget unchanged
        let again = service.get_or_create(ym(1)).unwrap();
        assert_eq!(again, budget);
    }

    #[test]
    fn test_update_patch_and_totals() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();

        service
            .update(
                ym(1),
                BudgetPatch {
                    salary: Some(Money::from_major(65_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        let expense = service
            .add_expense(ym(1), "Energie", Money::from_major(2_000), false)
            .unwrap();
        service
            .update_expense(
                expense.id,
                ExpensePatch {
                    percentage: Some(50),
                    ..Default::default()
                },
            )
            .unwrap();

        let overview = service.overview(ym(1)).unwrap();
        assert_eq!(overview.totals.remaining, Money::from_major(64_000));
    }

    #[test]
    fn test_update_rejects_negative_income() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();

        let err = service
            .update(
                ym(1),
                BudgetPatch {
                    salary: Some(Money::from_major(10)),
                    meal_vouchers: Some(Money::from_major(-1)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.get(ym(1)).unwrap().unwrap().salary.is_zero());
    }

    #[test]
    fn test_update_rejects_salary_over_limit() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();

        let err = service
            .update(
                ym(1),
                BudgetPatch {
                    salary: Some(Money::from_minor(9_223_372_036_854_775_800)),
                    other_income: Some(Money::from_major(1_000)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());

        let budget = service.get(ym(1)).unwrap().unwrap();
        assert!(budget.salary.is_zero());
        assert!(budget.other_income.is_zero());
        assert!(service.overview(ym(1)).is_ok());
    }

    #[test]
    fn test_update_missing_budget() {
        let (_temp, storage) = create_test_storage();
        let err = BudgetService::new(&storage)
            .update(ym(4), BudgetPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_share_is_not_applied() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();
        let expense = service
            .add_expense(ym(1), "Nájem", Money::from_major(18_000), true)
            .unwrap();

        let err = service
            .update_expense(
                expense.id,
                ExpensePatch {
                    name: Some("Bydlení".into()),
                    percentage: Some(40),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());

        let stored = service.get(ym(1)).unwrap().unwrap();
        assert_eq!(stored.expenses[0].name, "Nájem");
        assert_eq!(stored.expenses[0].share, Share::Full);
    }

    #[test]
    fn test_toggle_paid_and_unknown_expense() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(2)).unwrap();
        let expense = service
            .add_expense(ym(2), "Internet", Money::from_major(600), false)
            .unwrap();

        assert!(service.toggle_paid(expense.id).unwrap().is_paid);
        assert!(!service.toggle_paid(expense.id).unwrap().is_paid);
        assert!(service.toggle_paid(ExpenseId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_expense_with_template() {
        let (_temp, storage) = create_test_storage();
        let template = add_template(&storage, "Netflix", 329, 0, true);
        let service = BudgetService::new(&storage);
        let jan = service.get_or_create(ym(1)).unwrap();
        let feb = service.get_or_create(ym(2)).unwrap();

        service.delete_expense(jan.expenses[0].id, true).unwrap();

        assert!(service.get(ym(1)).unwrap().unwrap().expenses.is_empty());
        assert!(storage.recurring.get(template.id).unwrap().is_none());
        // Other months keep their instance
        assert_eq!(service.get(ym(2)).unwrap().unwrap().expenses, feb.expenses);
    }

    #[test]
    fn test_copy_previous() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();
        service
            .update(
                ym(1),
                BudgetPatch {
                    salary: Some(Money::from_major(65_000)),
                    meal_vouchers: Some(Money::from_major(2_600)),
                    investment_amount: Some(Money::from_major(5_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        let rent = service
            .add_expense(ym(1), "Nájem", Money::from_major(18_000), false)
            .unwrap();
        service.toggle_paid(rent.id).unwrap();

        let result = service.copy_previous(ym(2)).unwrap();
        assert_eq!(result.from, ym(1));
        assert_eq!(result.copied, 1);

        let feb = service.get(ym(2)).unwrap().unwrap();
        assert_eq!(feb.salary, Money::from_major(65_000));
        assert_eq!(feb.meal_vouchers, Money::from_major(2_600));
        assert!(feb.investment_amount.is_zero());
        assert!(!feb.expenses[0].is_paid);
        assert_ne!(feb.expenses[0].id, rent.id);

        let err = service.copy_previous(ym(2)).unwrap_err();
        assert!(matches!(err, BudgetError::DuplicatePeriod(p) if p == ym(2)));
    }

    #[test]
    fn test_copy_previous_without_previous_budget() {
        let (_temp, storage) = create_test_storage();
        let err = BudgetService::new(&storage).copy_previous(ym(3)).unwrap_err();
        assert!(err.is_not_found());
        assert!(storage.budgets.get(ym(3)).unwrap().is_none());

        let first = YearMonth::new(1, 1).unwrap();
        let err = BudgetService::new(&storage).copy_previous(first).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_match_transactions_persists_links() {
        let tx = Transaction::new(
            "t-rent",
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            "NAJEM LEDEN",
            Money::from_major(-18_000),
        );
        let (_temp, storage) = storage_with_feed(vec![tx]);
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();
        service
            .add_expense(ym(1), "Nájem", Money::from_major(18_000), false)
            .unwrap();

        let report = service.match_transactions(ym(1), &Settings::default()).unwrap();
        assert_eq!(report.by_amount, 1);

        let stored = service.get(ym(1)).unwrap().unwrap();
        assert_eq!(
            stored.expenses[0].matched_transaction_id,
            Some(TransactionId::new("t-rent"))
        );
        assert!(!stored.expenses[0].is_paid);
    }

    #[test]
    fn test_upstream_failure_changes_nothing() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service.sync_income(ym(1), &Settings::default()).unwrap_err();
        assert!(err.is_upstream());
        assert!(storage.budgets.get(ym(1)).unwrap().is_none());

        service.get_or_create(ym(1)).unwrap();
        let err = service
            .match_transactions(ym(1), &Settings::default())
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[test]
    fn test_sync_income_creates_budget() {
        let salary = Transaction::new(
            "s1",
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
            "VYPLATA",
            Money::from_major(65_000),
        )
        .with_category("Salary");
        let (_temp, storage) = storage_with_feed(vec![salary]);

        let sync = BudgetService::new(&storage)
            .sync_income(ym(1), &Settings::default())
            .unwrap();
        assert_eq!(sync.to, Money::from_major(65_000));
        assert_eq!(
            storage.budgets.get(ym(1)).unwrap().unwrap().salary,
            Money::from_major(65_000)
        );
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        service.get_or_create(ym(1)).unwrap();
        let e = service
            .add_expense(ym(1), "Internet", Money::from_major(600), false)
            .unwrap();
        service.delete_expense(e.id, false).unwrap();
        service.delete(ym(1)).unwrap();

        let kinds: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|entry| (entry.operation.to_string(), entry.entity_type))
            .collect();
        assert_eq!(
            kinds,
            [
                ("CREATE".to_string(), EntityType::MonthlyBudget),
                ("CREATE".to_string(), EntityType::MonthlyExpense),
                ("DELETE".to_string(), EntityType::MonthlyExpense),
                ("DELETE".to_string(), EntityType::MonthlyBudget),
            ]
        );
    }
}
