//! Monthly budget model
//!
//! One record per calendar month: income components, money set aside for
//! investments, and the ordered list of expense lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::MonthlyExpense;
use super::ids::ExpenseId;
use super::money::Money;
use super::period::YearMonth;

/// The budget for a single month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBudget {
    /// The month this budget covers
    pub year_month: YearMonth,

    #[serde(default)]
    pub salary: Money,

    #[serde(default)]
    pub other_income: Money,

    #[serde(default)]
    pub meal_vouchers: Money,

    /// Money diverted to investments this month
    #[serde(default)]
    pub investment_amount: Money,

    /// Amount recorded as moved to savings (informational)
    #[serde(default)]
    pub surplus_to_savings: Money,

    /// Whether the month has been closed by the user
    #[serde(default)]
    pub is_closed: bool,

    /// Expense lines in display order
    #[serde(default)]
    pub expenses: Vec<MonthlyExpense>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl MonthlyBudget {
    /// Create an empty budget for a month
    pub fn new(year_month: YearMonth) -> Self {
        let now = Utc::now();
        Self {
            year_month,
            salary: Money::zero(),
            other_income: Money::zero(),
            meal_vouchers: Money::zero(),
            investment_amount: Money::zero(),
            surplus_to_savings: Money::zero(),
            is_closed: false,
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Get an expense by ID
    pub fn expense(&self, id: ExpenseId) -> Option<&MonthlyExpense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Get a mutable expense by ID
    pub fn expense_mut(&mut self, id: ExpenseId) -> Option<&mut MonthlyExpense> {
        self.expenses.iter_mut().find(|e| e.id == id)
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate stored fields
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        let income = [
            ("salary", self.salary),
            ("other income", self.other_income),
            ("meal vouchers", self.meal_vouchers),
            ("investment amount", self.investment_amount),
            ("surplus to savings", self.surplus_to_savings),
        ];
        for (field, value) in income {
            if value.is_negative() {
                return Err(BudgetValidationError::NegativeAmount(field));
            }
            if !value.is_within_limit() {
                return Err(BudgetValidationError::AmountTooLarge(field));
            }
        }
        if self.expenses.iter().any(|e| !e.amount.is_within_limit()) {
            return Err(BudgetValidationError::AmountTooLarge("expense amount"));
        }
        Ok(())
    }
}

/// Derived totals of a monthly budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTotals {
    /// salary + other income + meal vouchers
    pub total_income: Money,

    /// Sum of every expense's personal share
    pub total_expenses: Money,

    /// Income minus expenses minus investments; negative means over budget
    pub remaining: Money,
}

impl BudgetTotals {
    /// Whether expenses and investments exceed income
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

impl fmt::Display for BudgetTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Income: {} | Expenses: {} | Remaining: {}",
            self.total_income, self.total_expenses, self.remaining
        )
    }
}

/// Validation errors for monthly budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeAmount(&'static str),
    AmountTooLarge(&'static str),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(field) => write!(f, "{} cannot be negative", field),
            Self::AmountTooLarge(field) => write!(
                f,
                "{} exceeds the maximum of {}",
                field,
                Money::from_minor(Money::MAX_ABS_MINOR)
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_period() -> YearMonth {
        YearMonth::new(2025, 1).unwrap()
    }

    #[test]
    fn test_new_budget() {
        let budget = MonthlyBudget::new(test_period());
        assert_eq!(budget.year_month, test_period());
        assert!(budget.expenses.is_empty());
        assert!(!budget.is_closed);
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_expense_lookup() {
        let mut budget = MonthlyBudget::new(test_period());
        let expense = MonthlyExpense::new("Nájem", Money::from_major(15_000));
        let id = expense.id;
        budget.expenses.push(expense);

        assert_eq!(budget.expense(id).unwrap().name, "Nájem");
        budget.expense_mut(id).unwrap().is_paid = true;
        assert!(budget.expense(id).unwrap().is_paid);
        assert!(budget.expense(ExpenseId::new()).is_none());
    }

    #[test]
    fn test_validation_rejects_negative_income() {
        let mut budget = MonthlyBudget::new(test_period());
        budget.meal_vouchers = Money::from_major(-1);
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::NegativeAmount("meal vouchers"))
        );
    }

    #[test]
    fn test_validation_rejects_amounts_over_limit() {
        let mut budget = MonthlyBudget::new(test_period());
        budget.salary = Money::from_minor(i64::MAX - 1);
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::AmountTooLarge("salary"))
        );

        budget.salary = Money::from_minor(Money::MAX_ABS_MINOR);
        assert!(budget.validate().is_ok());

        budget
            .expenses
            .push(MonthlyExpense::new("Hypotéka", Money::from_minor(i64::MAX)));
        assert_eq!(
            budget.validate(),
            Err(BudgetValidationError::AmountTooLarge("expense amount"))
        );
    }

    #[test]
    fn test_serialization_defaults() {
        let json = serde_json::json!({
            "year_month": "2025-02",
            "salary": 6500000,
            "created_at": "2025-02-01T00:00:00Z",
            "updated_at": "2025-02-01T00:00:00Z"
        });
        let budget: MonthlyBudget = serde_json::from_value(json).unwrap();
        assert_eq!(budget.salary, Money::from_major(65_000));
        assert_eq!(budget.other_income, Money::zero());
        assert!(budget.expenses.is_empty());
    }
}
