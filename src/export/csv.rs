//! CSV export
//!
//! Spreadsheet-friendly tables: the annual rollup by month and the expense
//! lines of one month.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{AnnualRollup, MonthlyBudget};

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

/// Export an annual rollup: one row per month, then TOTAL and AVERAGE rows
pub fn export_rollup_csv<W: Write>(rollup: &AnnualRollup, writer: W) -> BudgetResult<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record(["Month", "Income", "Expenses", "Investments", "Savings", "Remaining"])
        .map_err(export_err)?;

    for month in &rollup.months {
        wtr.write_record([
            month.year_month.to_string(),
            month.income.to_string(),
            month.expenses.to_string(),
            month.investments.to_string(),
            month.savings.to_string(),
            month.remaining.to_string(),
        ])
        .map_err(export_err)?;
    }

    let totals = &rollup.totals;
    wtr.write_record([
        "TOTAL".to_string(),
        totals.income.to_string(),
        totals.expenses.to_string(),
        totals.investments.to_string(),
        totals.savings.to_string(),
        totals.net.to_string(),
    ])
    .map_err(export_err)?;

    let averages = &rollup.averages;
    wtr.write_record([
        "AVERAGE".to_string(),
        averages.income.to_string(),
        averages.expenses.to_string(),
        averages.investments.to_string(),
        String::new(),
        String::new(),
    ])
    .map_err(export_err)?;

    wtr.flush().map_err(export_err)?;
    Ok(())
}

/// Export one month's expense lines
pub fn export_budget_csv<W: Write>(budget: &MonthlyBudget, writer: W) -> BudgetResult<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    wtr.write_record([
        "Month",
        "Expense",
        "Amount",
        "Share",
        "My Amount",
        "Paid",
        "Auto Paid",
        "Matched Transaction",
    ])
    .map_err(export_err)?;

    for expense in &budget.expenses {
        wtr.write_record([
            budget.year_month.to_string(),
            expense.name.clone(),
            expense.amount.to_string(),
            expense.share.percent().to_string(),
            expense.my_amount().to_string(),
            expense.is_paid.to_string(),
            expense.is_auto_paid.to_string(),
            expense
                .matched_transaction_id
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_default(),
        ])
        .map_err(export_err)?;
    }

    wtr.flush().map_err(export_err)?;
    Ok(())
}
