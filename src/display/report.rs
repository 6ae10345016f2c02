//! Report formatting for terminal output
//!
//! Annual rollup, transfer listing, and the outcome messages of matching and
//! income sync.

use std::collections::BTreeMap;

use crate::models::{AnnualRollup, Money};
use crate::services::{ClassifiedTransaction, IncomeSync, MatchReport};

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Create a simple bar chart representation
pub fn format_bar(value: Money, max_value: Money, width: usize) -> String {
    if !max_value.is_positive() || !value.is_positive() {
        return " ".repeat(width);
    }

    let filled = (value.minor() as i128 * width as i128 / max_value.minor() as i128) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        ".".repeat(max_chars)
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

const ROLLUP_WIDTH: usize = 80;

/// Format the annual rollup: month table, totals, averages and breakdowns
pub fn format_annual_rollup(rollup: &AnnualRollup, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Annual Report {} ({})\n", rollup.year, currency));
    output.push_str(&double_separator(ROLLUP_WIDTH));
    output.push('\n');

    output.push_str(&format!(
        "{:<8} {:>13} {:>13} {:>13} {:>13} {:>13}\n",
        "Month", "Income", "Expenses", "Invested", "Savings", "Remaining"
    ));
    output.push_str(&separator(ROLLUP_WIDTH));
    output.push('\n');

    for month in &rollup.months {
        output.push_str(&format!(
            "{:<8} {:>13} {:>13} {:>13} {:>13} {:>13}\n",
            month.year_month.to_string(),
            month.income,
            month.expenses,
            month.investments,
            month.savings,
            month.remaining,
        ));
    }

    output.push_str(&separator(ROLLUP_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{:<8} {:>13} {:>13} {:>13} {:>13}\n",
        "TOTAL",
        rollup.totals.income,
        rollup.totals.expenses,
        rollup.totals.investments,
        rollup.totals.savings,
    ));
    output.push_str(&format!(
        "{:<8} {:>13} {:>13} {:>13}\n",
        "AVERAGE", rollup.averages.income, rollup.averages.expenses, rollup.averages.investments,
    ));
    output.push_str(&format!(
        "\nNet (income - expenses): {}\n",
        rollup.totals.net.format_with_currency(currency)
    ));

    if !rollup.expense_breakdown.is_empty() {
        output.push_str("\nBy expense\n");
        output.push_str(&format_breakdown(&rollup.expense_breakdown));
    }
    if !rollup.category_breakdown.is_empty() {
        output.push_str("\nBy category (matched transactions)\n");
        output.push_str(&format_breakdown(&rollup.category_breakdown));
    }

    output
}

fn format_breakdown(breakdown: &BTreeMap<String, Money>) -> String {
    let mut rows: Vec<(&String, &Money)> = breakdown.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    let max = rows.first().map(|(_, m)| **m).unwrap_or_default();

    rows.iter()
        .map(|(name, amount)| {
            format!(
                "  {:<30} {:>13}  {}\n",
                truncate(name, 30),
                amount,
                format_bar(**amount, max, 20)
            )
        })
        .collect()
}

/// Format a month's transfers
pub fn format_transfers(transfers: &[ClassifiedTransaction]) -> String {
    if transfers.is_empty() {
        return "No transfers found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:>12}  {:<18}  {}\n",
        "Date", "Amount", "Kind", "Description"
    ));
    for item in transfers {
        let tx = &item.transaction;
        let counterparty = tx
            .creditor_name
            .as_deref()
            .or(tx.debtor_name.as_deref())
            .or(tx.counterparty_account.as_deref())
            .unwrap_or("");
        output.push_str(&format!(
            "{:<10}  {:>12}  {:<18}  {} {}\n",
            tx.date.to_string(),
            tx.amount,
            item.kind.to_string(),
            truncate(&tx.description, 40),
            counterparty,
        ));
    }
    output
}

/// One-line summary of a matching run
pub fn format_match_report(report: &MatchReport) -> String {
    if report.total() == 0 {
        return "No new matches.".to_string();
    }
    format!(
        "Matched {} expense(s): {} by pattern, {} by amount, {} by category.",
        report.total(),
        report.by_pattern,
        report.by_amount,
        report.by_category
    )
}

/// One-line summary of an income sync
pub fn format_income_sync(sync: &IncomeSync, currency: &str) -> String {
    if sync.changed() {
        format!(
            "Salary updated: {} -> {} (transactions {} to {}).",
            sync.from.format_with_currency(currency),
            sync.to.format_with_currency(currency),
            sync.window_start,
            sync.window_end
        )
    } else {
        format!(
            "Salary unchanged at {} (transactions {} to {}).",
            sync.to.format_with_currency(currency),
            sync.window_start,
            sync.window_end
        )
    }
}
