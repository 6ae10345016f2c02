//! Annual rollup
//!
//! Reduces a year of monthly budgets into per-month figures, yearly totals and
//! averages, and breakdowns by upstream category and by expense name.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    AnnualAverages, AnnualRollup, AnnualTotals, MonthRollup, MonthlyBudget, Money, Transaction,
    TransactionId, YearMonth,
};

use super::allocator::compute_totals;

/// Category used for matched transactions the bank did not categorise
pub const UNCATEGORIZED: &str = "Other";

/// Build the annual overview for `year`
///
/// Budgets outside `year` are ignored; months without a budget contribute
/// zeros. Expenses are counted at the user's share. The category breakdown
/// sums the absolute amounts of matched transactions, skipping matches whose
/// transaction is not in `transactions`.
pub fn annual_rollup(
    year: i32,
    budgets: &[MonthlyBudget],
    transactions: &[Transaction],
) -> AnnualRollup {
    let by_month: HashMap<YearMonth, &MonthlyBudget> = budgets
        .iter()
        .filter(|b| b.year_month.year() == year)
        .map(|b| (b.year_month, b))
        .collect();

    let tx_index: HashMap<&TransactionId, &Transaction> =
        transactions.iter().map(|t| (&t.id, t)).collect();

    let mut months = Vec::with_capacity(12);
    let mut totals = AnnualTotals::default();
    let mut category_breakdown: BTreeMap<String, Money> = BTreeMap::new();
    let mut expense_breakdown: BTreeMap<String, Money> = BTreeMap::new();

    for ym in YearMonth::months_of(year) {
        let Some(budget) = by_month.get(&ym) else {
            months.push(MonthRollup::empty(ym));
            continue;
        };

        let t = compute_totals(budget);
        months.push(MonthRollup {
            month: ym.month(),
            year_month: ym,
            income: t.total_income,
            expenses: t.total_expenses,
            investments: budget.investment_amount,
            savings: budget.surplus_to_savings,
            remaining: t.remaining,
        });

        totals.income += t.total_income;
        totals.expenses += t.total_expenses;
        totals.investments += budget.investment_amount;
        totals.savings += budget.surplus_to_savings;

        for expense in &budget.expenses {
            *expense_breakdown.entry(expense.name.clone()).or_default() += expense.my_amount();

            let Some(tx) = expense
                .matched_transaction_id
                .as_ref()
                .and_then(|id| tx_index.get(id))
            else {
                continue;
            };
            let category = tx
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNCATEGORIZED);
            *category_breakdown.entry(category.to_string()).or_default() += tx.amount.abs();
        }
    }

    totals.net = totals.income - totals.expenses;

    let averages = AnnualAverages {
        income: totals.income.split_even(12),
        expenses: totals.expenses.split_even(12),
        investments: totals.investments.split_even(12),
    };

    AnnualRollup {
        year,
        months,
        totals,
        averages,
        category_breakdown,
        expense_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthlyExpense, Share};
    use chrono::NaiveDate;

    fn budget(year: i32, month: u32, salary: i64) -> MonthlyBudget {
        let mut b = MonthlyBudget::new(YearMonth::new(year, month).unwrap());
        b.salary = Money::from_major(salary);
        b
    }

    fn matched(name: &str, amount: i64, share: Share, tx: &str) -> MonthlyExpense {
        MonthlyExpense {
            share,
            matched_transaction_id: Some(TransactionId::new(tx)),
            ..MonthlyExpense::new(name, Money::from_major(amount))
        }
    }

    fn tx(id: &str, amount: i64, category: Option<&str>) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let t = Transaction::new(id, date, "payment", Money::from_major(amount));
        match category {
            Some(c) => t.with_category(c),
            None => t,
        }
    }

    #[test]
    fn test_empty_year_has_twelve_zero_months() {
        let rollup = annual_rollup(2025, &[], &[]);
        assert_eq!(rollup.months.len(), 12);
        assert_eq!(rollup.months[0].month, 1);
        assert_eq!(rollup.months[11].month, 12);
        assert!(rollup.months.iter().all(|m| m.income.is_zero()));
        assert_eq!(rollup.totals, AnnualTotals::default());
        assert!(rollup.category_breakdown.is_empty());
    }

    #[test]
    fn test_totals_use_personal_share() {
        let mut jan = budget(2025, 1, 60_000);
        jan.investment_amount = Money::from_major(5_000);
        jan.surplus_to_savings = Money::from_major(2_000);
        jan.expenses.push(matched("Nájem", 20_000, Share::Half, "t1"));

        let mut mar = budget(2025, 3, 60_000);
        mar.expenses.push(matched("Nájem", 20_000, Share::Half, "t3"));

        let rollup = annual_rollup(2025, &[jan, mar], &[]);

        assert_eq!(rollup.months[0].expenses, Money::from_major(10_000));
        assert_eq!(rollup.months[0].remaining, Money::from_major(45_000));
        assert!(rollup.months[1].income.is_zero());
        assert_eq!(rollup.totals.income, Money::from_major(120_000));
        assert_eq!(rollup.totals.expenses, Money::from_major(20_000));
        assert_eq!(rollup.totals.investments, Money::from_major(5_000));
        assert_eq!(rollup.totals.savings, Money::from_major(2_000));
        assert_eq!(rollup.totals.net, Money::from_major(100_000));
        assert_eq!(
            rollup.expense_breakdown.get("Nájem"),
            Some(&Money::from_major(20_000))
        );
    }

    #[test]
    fn test_averages_divide_by_twelve() {
        let mut jan = budget(2025, 1, 0);
        jan.salary = Money::from_minor(100);
        let rollup = annual_rollup(2025, &[jan], &[]);
        // 100 / 12 = 8.33 -> 8
        assert_eq!(rollup.averages.income, Money::from_minor(8));

        let mut feb = budget(2025, 2, 0);
        feb.salary = Money::from_minor(18);
        let rollup = annual_rollup(2025, &[feb], &[]);
        // 18 / 12 = 1.5 -> 2
        assert_eq!(rollup.averages.income, Money::from_minor(2));
    }

    #[test]
    fn test_other_years_are_ignored() {
        let rollup = annual_rollup(2025, &[budget(2024, 12, 50_000), budget(2026, 1, 50_000)], &[]);
        assert!(rollup.totals.income.is_zero());
    }

    #[test]
    fn test_category_breakdown_from_matched_transactions() {
        let mut jan = budget(2025, 1, 60_000);
        jan.expenses.push(matched("Nájem", 18_000, Share::Half, "t1"));
        jan.expenses.push(matched("Obědy", 2_000, Share::Full, "t2"));
        jan.expenses.push(matched("Zmizelá", 500, Share::Full, "gone"));
        jan.expenses.push(MonthlyExpense::new("Nespárovaná", Money::from_major(300)));

        let transactions = vec![
            tx("t1", -18_000, Some("Housing")),
            tx("t2", -1_950, None),
            tx("unrelated", -99, Some("Housing")),
        ];

        let rollup = annual_rollup(2025, &[jan], &transactions);
        assert_eq!(rollup.category_breakdown.len(), 2);
        assert_eq!(
            rollup.category_breakdown.get("Housing"),
            Some(&Money::from_major(18_000))
        );
        assert_eq!(
            rollup.category_breakdown.get(UNCATEGORIZED),
            Some(&Money::from_major(1_950))
        );
    }
}
