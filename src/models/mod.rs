//! Core data models for monthly-budget
//!
//! This module contains the data structures of the budgeting domain: monthly
//! budgets and their expense lines, recurring templates, manual accounts with
//! envelopes, and upstream bank transactions.

pub mod account;
pub mod budget;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;
pub mod rollup;
pub mod share;
pub mod transaction;

pub use account::{Envelope, EnvelopePatch, ManualAccount, Partition};
pub use budget::{BudgetTotals, MonthlyBudget};
pub use expense::{MonthlyExpense, RecurringExpense};
pub use ids::{EnvelopeId, ExpenseId, ManualAccountId, RecurringExpenseId, TransactionId};
pub use money::Money;
pub use period::YearMonth;
pub use rollup::{AnnualAverages, AnnualRollup, AnnualTotals, MonthRollup};
pub use share::Share;
pub use transaction::{Transaction, TransactionKind};
