//! Budget display formatting
//!
//! Formats a monthly budget, its expense lines and the recurring templates
//! for terminal output.

use crate::models::{BudgetTotals, MonthlyBudget, RecurringExpense};

use super::report::separator;

fn column_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.chars().count())
}

/// Format a month's budget with its expense table and totals
pub fn format_budget(budget: &MonthlyBudget, totals: &BudgetTotals, currency: &str) -> String {
    let mut output = String::new();

    let title = if budget.is_closed {
        format!("Budget {} (closed)", budget.year_month)
    } else {
        format!("Budget {}", budget.year_month)
    };
    output.push_str(&title);
    output.push('\n');
    output.push_str(&separator(title.chars().count()));
    output.push('\n');

    output.push_str(&format!("  Salary:        {:>12}\n", budget.salary));
    output.push_str(&format!("  Other income:  {:>12}\n", budget.other_income));
    output.push_str(&format!("  Meal vouchers: {:>12}\n", budget.meal_vouchers));
    output.push('\n');

    if budget.expenses.is_empty() {
        output.push_str("No expenses.\n");
    } else {
        output.push_str(&format_expense_table(budget));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Total income:   {}\n",
        totals.total_income.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  My expenses:    {}\n",
        totals.total_expenses.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Investments:    {}\n",
        budget.investment_amount.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Remaining:      {}{}\n",
        totals.remaining.format_with_currency(currency),
        if totals.is_over_budget() { "  OVER BUDGET" } else { "" }
    ));
    if !budget.surplus_to_savings.is_zero() {
        output.push_str(&format!(
            "  To savings:     {}\n",
            budget.surplus_to_savings.format_with_currency(currency)
        ));
    }

    output
}

fn format_expense_table(budget: &MonthlyBudget) -> String {
    let name_width = column_width(budget.expenses.iter().map(|e| e.name.as_str()), "Expense");

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:>12}  {:>5}  {:>12}  {:<4}  {}\n",
        "ID",
        "Expense",
        "Amount",
        "Share",
        "Mine",
        "Paid",
        "Matched",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:->12}  {:->5}  {:->12}  {:-<4}  {:-<7}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for expense in &budget.expenses {
        let paid = match (expense.is_paid, expense.is_auto_paid) {
            (true, _) => "yes",
            (false, true) => "auto",
            (false, false) => "",
        };
        let matched = expense
            .matched_transaction_id
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_default();

        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:>12}  {:>5}  {:>12}  {:<4}  {}\n",
            expense.id.to_string(),
            expense.name,
            expense.amount,
            expense.share.to_string(),
            expense.my_amount(),
            paid,
            matched,
            name_width = name_width,
        ));
    }

    output
}

/// Format the recurring templates in display order
pub fn format_recurring_list(templates: &[RecurringExpense]) -> String {
    if templates.is_empty() {
        return "No recurring expenses.".to_string();
    }

    let name_width = column_width(templates.iter().map(|t| t.name.as_str()), "Name");

    let mut output = String::new();
    output.push_str(&format!(
        "{:>3}  {:<12}  {:<name_width$}  {:>12}  {:<6}  {}\n",
        "#",
        "ID",
        "Name",
        "Amount",
        "Active",
        "Match",
        name_width = name_width,
    ));

    for template in templates {
        let mut matching = Vec::new();
        if let Some(pattern) = &template.match_pattern {
            matching.push(format!("\"{}\"", pattern));
        }
        if let Some(category) = &template.category {
            matching.push(format!("[{}]", category));
        }
        if template.is_auto_paid {
            matching.push("auto-paid".to_string());
        }

        output.push_str(&format!(
            "{:>3}  {:<12}  {:<name_width$}  {:>12}  {:<6}  {}\n",
            template.order_index,
            template.id.to_string(),
            template.name,
            template.default_amount,
            if template.is_active { "yes" } else { "no" },
            matching.join(" "),
            name_width = name_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, MonthlyExpense, Share, YearMonth};
    use crate::services::allocator::compute_totals;

    #[test]
    fn test_format_budget() {
        let mut budget = MonthlyBudget::new(YearMonth::new(2025, 1).unwrap());
        budget.salary = Money::from_major(65_000);
        let mut energy = MonthlyExpense::new("Energie", Money::from_major(2_000));
        energy.share = Share::Half;
        energy.is_paid = true;
        budget.expenses.push(energy);

        let output = format_budget(&budget, &compute_totals(&budget), "CZK");

        assert!(output.starts_with("Budget 2025-01\n"));
        assert!(output.contains("Energie"));
        assert!(output.contains("50%"));
        assert!(output.contains("1000.00"));
        assert!(output.contains("Remaining:      64000.00 CZK"));
        assert!(!output.contains("OVER BUDGET"));
    }

    #[test]
    fn test_format_budget_over_budget() {
        let mut budget = MonthlyBudget::new(YearMonth::new(2025, 2).unwrap());
        budget.is_closed = true;
        budget
            .expenses
            .push(MonthlyExpense::new("Nájem", Money::from_major(18_000)));

        let output = format_budget(&budget, &compute_totals(&budget), "CZK");
        assert!(output.contains("(closed)"));
        assert!(output.contains("OVER BUDGET"));
    }

    #[test]
    fn test_format_recurring_list() {
        assert_eq!(format_recurring_list(&[]), "No recurring expenses.");

        let mut netflix = RecurringExpense::new("Netflix", Money::from_major(299));
        netflix.match_pattern = Some("NETFLIX".into());
        let output = format_recurring_list(&[netflix]);
        assert!(output.contains("\"NETFLIX\""));
        assert!(output.contains("299.00"));
    }
}
