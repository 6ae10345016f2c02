//! Budget allocator
//!
//! Pure computations over a monthly budget: totals, share changes, paid
//! toggling, and seeding expense lines from templates or the previous month.
//! Nothing here touches storage; the budget service persists the results.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    BudgetTotals, ExpenseId, MonthlyBudget, MonthlyExpense, RecurringExpense, Share,
};

/// Compute income, personal-share expenses and the remaining balance
///
/// Expenses contribute `my_amount`, not their full `amount`. `remaining` is
/// not clamped and goes negative when the month is over budget.
pub fn compute_totals(budget: &MonthlyBudget) -> BudgetTotals {
    let total_income = budget.salary + budget.other_income + budget.meal_vouchers;
    let total_expenses = budget.expenses.iter().map(MonthlyExpense::my_amount).sum();

    BudgetTotals {
        total_income,
        total_expenses,
        remaining: total_income - total_expenses - budget.investment_amount,
    }
}

/// Change the caller's share of an expense
///
/// Fails with a validation error when `percentage` is not one of 100, 50, 33
/// or 25; the input expense is left untouched either way.
pub fn set_expense_share(expense: &MonthlyExpense, percentage: u8) -> BudgetResult<MonthlyExpense> {
    let share = Share::try_from(percentage).map_err(|e| BudgetError::Validation(e.to_string()))?;
    Ok(with_share(expense, share))
}

/// Typed variant of [`set_expense_share`]
pub fn with_share(expense: &MonthlyExpense, share: Share) -> MonthlyExpense {
    MonthlyExpense {
        share,
        ..expense.clone()
    }
}

/// Flip the paid flag; nothing else changes
pub fn toggle_paid(expense: &MonthlyExpense) -> MonthlyExpense {
    MonthlyExpense {
        is_paid: !expense.is_paid,
        ..expense.clone()
    }
}

/// Create this month's instance of a recurring template
pub fn instantiate_from_template(template: &RecurringExpense) -> MonthlyExpense {
    MonthlyExpense {
        id: ExpenseId::new(),
        name: template.name.clone(),
        amount: template.default_amount,
        share: Share::Full,
        is_paid: false,
        is_auto_paid: template.is_auto_paid,
        matched_transaction_id: None,
        recurring_expense_id: Some(template.id),
    }
}

/// Clone the previous month's expense lines for `target`
///
/// Amounts, shares, the auto-paid hint and the template link carry over. Each
/// copy gets a fresh ID and starts unpaid and unmatched. Fails when the target
/// month already has expenses.
pub fn copy_from_previous_period(
    target: &MonthlyBudget,
    previous: &MonthlyBudget,
) -> BudgetResult<Vec<MonthlyExpense>> {
    if !target.expenses.is_empty() {
        return Err(BudgetError::DuplicatePeriod(target.year_month));
    }

    Ok(previous
        .expenses
        .iter()
        .map(|e| MonthlyExpense {
            id: ExpenseId::new(),
            name: e.name.clone(),
            amount: e.amount,
            share: e.share,
            is_paid: false,
            is_auto_paid: e.is_auto_paid,
            matched_transaction_id: None,
            recurring_expense_id: e.recurring_expense_id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecurringExpenseId, TransactionId, YearMonth};

    fn period(month: u32) -> YearMonth {
        YearMonth::new(2025, month).unwrap()
    }

    fn expense(name: &str, amount: i64, share: Share) -> MonthlyExpense {
        MonthlyExpense {
            share,
            ..MonthlyExpense::new(name, Money::from_major(amount))
        }
    }

    #[test]
    fn test_salary_with_half_shared_expense() {
        let mut budget = MonthlyBudget::new(period(1));
        budget.salary = Money::from_major(65_000);
        budget.expenses.push(expense("Energie", 2_000, Share::Half));

        let totals = compute_totals(&budget);
        assert_eq!(totals.total_income, Money::from_major(65_000));
        assert_eq!(totals.total_expenses, Money::from_major(1_000));
        assert_eq!(totals.remaining, Money::from_major(64_000));
    }

    #[test]
    fn test_total_expenses_is_sum_of_my_amounts() {
        let mut budget = MonthlyBudget::new(period(2));
        budget.salary = Money::from_major(40_000);
        budget.other_income = Money::from_major(3_000);
        budget.meal_vouchers = Money::from_minor(260_000);
        budget.investment_amount = Money::from_major(5_000);
        budget.expenses = vec![
            expense("Nájem", 18_000, Share::Half),
            MonthlyExpense {
                share: Share::Third,
                ..MonthlyExpense::new("Internet", Money::from_minor(59_900))
            },
            expense("Netflix", 329, Share::Quarter),
            expense("Pojištění", 1_001, Share::Third),
        ];

        let expected: Money = budget.expenses.iter().map(|e| e.my_amount()).sum();
        let totals = compute_totals(&budget);

        assert_eq!(totals.total_expenses, expected);
        assert_eq!(totals.total_income, Money::from_minor(4_560_000));
        assert_eq!(
            totals.remaining,
            totals.total_income - expected - Money::from_major(5_000)
        );
    }

    #[test]
    fn test_remaining_can_go_negative() {
        let mut budget = MonthlyBudget::new(period(3));
        budget.salary = Money::from_major(1_000);
        budget.investment_amount = Money::from_major(500);
        budget.expenses.push(expense("Auto", 900, Share::Full));

        let totals = compute_totals(&budget);
        assert_eq!(totals.remaining, Money::from_major(-400));
        assert!(totals.is_over_budget());
    }

    #[test]
    fn test_surplus_to_savings_does_not_affect_remaining() {
        let mut budget = MonthlyBudget::new(period(4));
        budget.salary = Money::from_major(10_000);
        let before = compute_totals(&budget);
        budget.surplus_to_savings = Money::from_major(7_000);
        assert_eq!(compute_totals(&budget), before);
    }

    #[test]
    fn test_set_expense_share_recomputes_my_amount() {
        let base = MonthlyExpense::new("Pojištění", Money::from_minor(100_101));
        for pct in [100u8, 50, 33, 25] {
            let updated = set_expense_share(&base, pct).unwrap();
            assert_eq!(updated.share.percent(), pct);
            assert_eq!(updated.my_amount(), base.amount.percent(u32::from(pct)));
            assert_eq!(updated.id, base.id);
        }
        assert_eq!(set_expense_share(&base, 50).unwrap().my_amount().minor(), 50_051);
    }

    #[test]
    fn test_set_expense_share_rejects_40() {
        let base = MonthlyExpense::new("Nájem", Money::from_major(18_000));
        let err = set_expense_share(&base, 40).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(base.share, Share::Full);
    }

    #[test]
    fn test_toggle_paid_leaves_match_alone() {
        let mut base = MonthlyExpense::new("Spotify", Money::from_major(169));
        base.matched_transaction_id = Some(TransactionId::new("tx-1"));

        let paid = toggle_paid(&base);
        assert!(paid.is_paid);
        assert_eq!(paid.matched_transaction_id, base.matched_transaction_id);
        assert_eq!(paid.amount, base.amount);

        let unpaid = toggle_paid(&paid);
        assert_eq!(unpaid, base);
    }

    #[test]
    fn test_instantiate_from_template() {
        let mut template = RecurringExpense::new("Elektřina", Money::from_major(1_800));
        template.is_auto_paid = true;
        template.match_pattern = Some("PRE".into());

        let expense = instantiate_from_template(&template);
        assert_eq!(expense.name, "Elektřina");
        assert_eq!(expense.amount, Money::from_major(1_800));
        assert_eq!(expense.share, Share::Full);
        assert!(expense.is_auto_paid);
        assert!(!expense.is_paid);
        assert!(expense.matched_transaction_id.is_none());
        assert_eq!(expense.recurring_expense_id, Some(template.id));
    }

    #[test]
    fn test_copy_from_previous_period_resets_state() {
        let mut previous = MonthlyBudget::new(period(1));
        let template_id = RecurringExpenseId::new();
        let mut rent = expense("Nájem", 18_000, Share::Half);
        rent.is_paid = true;
        rent.is_auto_paid = true;
        rent.matched_transaction_id = Some(TransactionId::new("tx-rent"));
        rent.recurring_expense_id = Some(template_id);
        previous.expenses = vec![rent, expense("Dárky", 1_500, Share::Quarter)];

        let target = MonthlyBudget::new(period(2));
        let copied = copy_from_previous_period(&target, &previous).unwrap();

        assert_eq!(copied.len(), 2);
        for (copy, source) in copied.iter().zip(&previous.expenses) {
            assert!(!copy.is_paid);
            assert!(copy.matched_transaction_id.is_none());
            assert_eq!(copy.name, source.name);
            assert_eq!(copy.amount, source.amount);
            assert_eq!(copy.share, source.share);
            assert_eq!(copy.is_auto_paid, source.is_auto_paid);
            assert_eq!(copy.recurring_expense_id, source.recurring_expense_id);
            assert_ne!(copy.id, source.id);
        }
    }

    #[test]
    fn test_copy_onto_populated_period_fails() {
        let mut previous = MonthlyBudget::new(period(1));
        previous.expenses.push(expense("Nájem", 18_000, Share::Full));

        let mut target = MonthlyBudget::new(period(2));
        target.expenses.push(expense("Jednorázové", 500, Share::Full));

        let err = copy_from_previous_period(&target, &previous).unwrap_err();
        assert!(matches!(err, BudgetError::DuplicatePeriod(p) if p == period(2)));
    }
}
