//! Annual rollup model
//!
//! Per-month and yearly totals derived from a year of monthly budgets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::money::Money;
use super::period::YearMonth;

/// Totals for one month of the year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRollup {
    /// 1-12
    pub month: u32,
    pub year_month: YearMonth,
    pub income: Money,
    pub expenses: Money,
    pub investments: Money,
    pub savings: Money,
    pub remaining: Money,
}

impl MonthRollup {
    /// A month without a budget record
    pub fn empty(year_month: YearMonth) -> Self {
        Self {
            month: year_month.month(),
            year_month,
            income: Money::zero(),
            expenses: Money::zero(),
            investments: Money::zero(),
            savings: Money::zero(),
            remaining: Money::zero(),
        }
    }
}

/// Sums over the whole year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTotals {
    pub income: Money,
    pub expenses: Money,
    pub investments: Money,
    pub savings: Money,
    /// income - expenses
    pub net: Money,
}

/// Yearly totals spread over twelve months
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualAverages {
    pub income: Money,
    pub expenses: Money,
    pub investments: Money,
}

/// The annual overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualRollup {
    pub year: i32,

    /// Always twelve entries, January first
    pub months: Vec<MonthRollup>,

    pub totals: AnnualTotals,

    pub averages: AnnualAverages,

    /// Upstream category -> amount of matched transactions
    pub category_breakdown: BTreeMap<String, Money>,

    /// Expense name -> personal share summed over the year
    pub expense_breakdown: BTreeMap<String, Money>,
}
