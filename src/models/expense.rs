//! Expense models
//!
//! `MonthlyExpense` is a line item of one month's budget; `RecurringExpense`
//! is the template new months are seeded from.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, RecurringExpenseId, TransactionId};
use super::money::Money;
use super::share::Share;

/// A single expense line in a monthly budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Display label
    pub name: String,

    /// Full cost of the expense, before the personal share is applied
    pub amount: Money,

    /// The caller's portion of the cost
    #[serde(rename = "my_percentage", default)]
    pub share: Share,

    /// Whether the user has confirmed payment
    #[serde(default)]
    pub is_paid: bool,

    /// Paid automatically (direct debit, standing order)
    #[serde(default)]
    pub is_auto_paid: bool,

    /// Upstream transaction that reconciled this expense (lookup only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_transaction_id: Option<TransactionId>,

    /// Template this instance was generated from (lookup only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_expense_id: Option<RecurringExpenseId>,
}

impl MonthlyExpense {
    /// Create a one-off expense paid in full by the caller
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: ExpenseId::new(),
            name: name.into(),
            amount,
            share: Share::Full,
            is_paid: false,
            is_auto_paid: false,
            matched_transaction_id: None,
            recurring_expense_id: None,
        }
    }

    /// The caller's portion of the cost, rounded half-up to the minor unit
    pub fn my_amount(&self) -> Money {
        self.amount.percent(u32::from(self.share.percent()))
    }

    /// Whether a transaction has been linked
    pub fn is_matched(&self) -> bool {
        self.matched_transaction_id.is_some()
    }

    /// Validate user-editable fields
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        if !self.amount.is_within_limit() {
            return Err(ExpenseValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

impl fmt::Display for MonthlyExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.amount)?;
        if self.share.is_partial() {
            write!(f, " ({} = {})", self.share, self.my_amount())?;
        }
        Ok(())
    }
}

/// A reusable expense definition used to seed new months
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: RecurringExpenseId,

    pub name: String,

    /// Amount copied into each new month
    pub default_amount: Money,

    #[serde(default)]
    pub is_auto_paid: bool,

    /// Substring the matcher looks for in transaction descriptions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<String>,

    /// Upstream transaction category used for approximate matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Display order
    #[serde(default)]
    pub order_index: u32,

    /// Inactive templates are not copied into new months
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl RecurringExpense {
    /// Create a new active template
    pub fn new(name: impl Into<String>, default_amount: Money) -> Self {
        Self {
            id: RecurringExpenseId::new(),
            name: name.into(),
            default_amount,
            is_auto_paid: false,
            match_pattern: None,
            category: None,
            order_index: 0,
            is_active: true,
        }
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.name.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyName);
        }
        if self.default_amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        if !self.default_amount.is_within_limit() {
            return Err(ExpenseValidationError::AmountTooLarge);
        }
        if let Some(pattern) = &self.match_pattern {
            if pattern.trim().is_empty() {
                return Err(ExpenseValidationError::EmptyPattern);
            }
        }
        Ok(())
    }
}

/// Validation errors for expenses and templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyName,
    NegativeAmount,
    AmountTooLarge,
    EmptyPattern,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Expense name cannot be empty"),
            Self::NegativeAmount => write!(f, "Expense amount cannot be negative"),
            Self::AmountTooLarge => write!(
                f,
                "Expense amount exceeds the maximum of {}",
                Money::from_minor(Money::MAX_ABS_MINOR)
            ),
            Self::EmptyPattern => write!(f, "Match pattern cannot be blank"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
