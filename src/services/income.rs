//! Income sync
//!
//! Derives a month's salary from categorised bank transactions. Salary for a
//! month often lands in the first days of the next one, so the window runs
//! from the first of the month through a grace day of the following month.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::IncomeSettings;
use crate::models::{Money, MonthlyBudget, Transaction, YearMonth};

/// Outcome of a salary sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IncomeSync {
    pub from: Money,
    pub to: Money,
    /// First day counted
    pub window_start: NaiveDate,
    /// Last day counted (inclusive)
    pub window_end: NaiveDate,
}

impl IncomeSync {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Dates that count towards a month's salary
pub fn salary_window(year_month: YearMonth, grace_days: u32) -> (NaiveDate, NaiveDate) {
    let end = match year_month.next() {
        Some(next) => NaiveDate::from_ymd_opt(next.year(), next.month(), grace_days.max(1))
            .unwrap_or_else(|| next.end_date()),
        None => year_month.end_date(),
    };
    (year_month.start_date(), end)
}

/// Replace the budget's salary with the sum of salary inflows in its window
///
/// Only positive transactions whose category equals the configured salary
/// category are counted. `other_income` is never touched.
pub fn sync_income(
    budget: &mut MonthlyBudget,
    transactions: &[Transaction],
    settings: &IncomeSettings,
) -> IncomeSync {
    let (window_start, window_end) = salary_window(budget.year_month, settings.salary_grace_days);

    let total: Money = transactions
        .iter()
        .filter(|t| t.is_inflow())
        .filter(|t| t.date >= window_start && t.date <= window_end)
        .filter(|t| t.category.as_deref() == Some(settings.salary_category.as_str()))
        .map(|t| t.amount)
        .sum();

    let from = budget.salary;
    if from != total {
        budget.salary = total;
        budget.touch();
    }

    IncomeSync {
        from,
        to: total,
        window_start,
        window_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn salary(id: &str, on: NaiveDate, amount: i64) -> Transaction {
        Transaction::new(id, on, "VYPLATA", Money::from_major(amount)).with_category("Salary")
    }

    #[test]
    fn test_window_crosses_year_end() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(salary_window(dec, 15), (date(2024, 12, 1), date(2025, 1, 15)));
    }

    #[test]
    fn test_window_of_last_month_ends_at_month_end() {
        let last = YearMonth::new(9999, 12).unwrap();
        assert_eq!(salary_window(last, 15), (date(9999, 12, 1), date(9999, 12, 31)));
    }

    #[test]
    fn test_sums_salary_in_window() {
        let mut budget = MonthlyBudget::new(YearMonth::new(2025, 1).unwrap());
        budget.salary = Money::from_major(60_000);
        budget.other_income = Money::from_major(2_000);

        let txs = vec![
            salary("before", date(2024, 12, 31), 10_000),
            salary("jan", date(2025, 1, 10), 30_000),
            salary("feb-early", date(2025, 2, 15), 35_000),
            salary("feb-late", date(2025, 2, 16), 99_000),
            Transaction::new("refund", date(2025, 1, 12), "Vratka", Money::from_major(500)),
            salary("reversal", date(2025, 1, 20), -1_000),
        ];

        let sync = sync_income(&mut budget, &txs, &IncomeSettings::default());

        assert_eq!(sync.from, Money::from_major(60_000));
        assert_eq!(sync.to, Money::from_major(65_000));
        assert!(sync.changed());
        assert_eq!(sync.window_end, date(2025, 2, 15));
        assert_eq!(budget.salary, Money::from_major(65_000));
        assert_eq!(budget.other_income, Money::from_major(2_000));
    }

    #[test]
    fn test_no_salary_sets_zero() {
        let mut budget = MonthlyBudget::new(YearMonth::new(2025, 3).unwrap());
        budget.salary = Money::from_major(1);
        let sync = sync_income(&mut budget, &[], &IncomeSettings::default());
        assert!(sync.to.is_zero());
        assert!(budget.salary.is_zero());
    }

    #[test]
    fn test_custom_category() {
        let mut budget = MonthlyBudget::new(YearMonth::new(2025, 1).unwrap());
        let settings = IncomeSettings {
            salary_category: "Mzda".into(),
            salary_grace_days: 5,
        };
        let txs = vec![
            Transaction::new("a", date(2025, 1, 28), "MZDA", Money::from_major(40_000))
                .with_category("Mzda"),
            salary("b", date(2025, 1, 28), 1_000),
        ];
        sync_income(&mut budget, &txs, &settings);
        assert_eq!(budget.salary, Money::from_major(40_000));
    }
}
