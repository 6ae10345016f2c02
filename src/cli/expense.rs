//! Expense CLI commands
//!
//! Expense lines of a monthly budget, referenced by name or short ID within
//! the selected month.

use clap::Subcommand;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{MonthlyExpense, Share, YearMonth};
use crate::services::{BudgetService, ExpensePatch};
use crate::storage::Storage;

use super::{flag_pair, parse_money, parse_money_opt, parse_month};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add a one-off expense to a month
    Add {
        /// Expense name
        name: String,
        /// Full amount (e.g., "2000" or "2000.50")
        amount: String,
        /// Month (YYYY-MM, current, last, next)
        #[arg(short, long)]
        month: Option<String>,
        /// Your share in percent: 100, 50, 33 or 25
        #[arg(short, long)]
        share: Option<u8>,
        /// Paid automatically (direct debit, standing order)
        #[arg(long)]
        auto_paid: bool,
    },

    /// Edit an expense line
    Set {
        /// Expense name or ID
        expense: String,
        #[arg(short, long)]
        month: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        /// Your share in percent: 100, 50, 33 or 25
        #[arg(short, long)]
        share: Option<u8>,
        #[arg(long, conflicts_with = "unpaid")]
        paid: bool,
        #[arg(long)]
        unpaid: bool,
    },

    /// Toggle an expense between paid and unpaid
    Paid {
        /// Expense name or ID
        expense: String,
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete an expense line
    Delete {
        /// Expense name or ID
        expense: String,
        #[arg(short, long)]
        month: Option<String>,
        /// Also delete the recurring template this line came from
        #[arg(long)]
        with_template: bool,
    },
}

fn resolve(service: &BudgetService, ym: YearMonth, reference: &str) -> BudgetResult<MonthlyExpense> {
    let mut found = service.find_expenses(ym, reference)?;
    match found.len() {
        0 => Err(BudgetError::expense_not_found(format!("{} in {}", reference, ym))),
        1 => Ok(found.remove(0)),
        n => Err(BudgetError::Validation(format!(
            "'{}' matches {} expenses in {}; use the ID instead",
            reference, n, ym
        ))),
    }
}

/// Handle an expense command
pub fn handle_expense_command(storage: &Storage, cmd: ExpenseCommands) -> BudgetResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            month,
            share,
            auto_paid,
        } => {
            let ym = parse_month(month.as_deref())?;
            let amount = parse_money(&amount, "amount")?;
            if let Some(pct) = share {
                Share::try_from(pct).map_err(|e| BudgetError::Validation(e.to_string()))?;
            }

            service.get_or_create(ym)?;
            let mut expense = service.add_expense(ym, &name, amount, auto_paid)?;
            if let Some(pct) = share {
                expense = service.update_expense(
                    expense.id,
                    ExpensePatch {
                        percentage: Some(pct),
                        ..Default::default()
                    },
                )?;
            }

            println!("Added to {}: {}", ym, expense);
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::Set {
            expense,
            month,
            name,
            amount,
            share,
            paid,
            unpaid,
        } => {
            let ym = parse_month(month.as_deref())?;
            let target = resolve(&service, ym, &expense)?;
            let patch = ExpensePatch {
                name,
                amount: parse_money_opt(amount, "amount")?,
                percentage: share,
                is_paid: flag_pair(paid, unpaid),
            };

            if patch.is_empty() {
                println!("No changes specified. Use --name, --amount, --share, --paid or --unpaid.");
                return Ok(());
            }

            let updated = service.update_expense(target.id, patch)?;
            println!("Updated: {}", updated);
        }

        ExpenseCommands::Paid { expense, month } => {
            let ym = parse_month(month.as_deref())?;
            let target = resolve(&service, ym, &expense)?;
            let updated = service.toggle_paid(target.id)?;
            println!(
                "{} is now {}.",
                updated.name,
                if updated.is_paid { "paid" } else { "unpaid" }
            );
        }

        ExpenseCommands::Delete {
            expense,
            month,
            with_template,
        } => {
            let ym = parse_month(month.as_deref())?;
            let target = resolve(&service, ym, &expense)?;
            let deleted = service.delete_expense(target.id, with_template)?;
            println!("Deleted {} from {}.", deleted.name, ym);
            if with_template && deleted.recurring_expense_id.is_some() {
                println!("Recurring template removed as well.");
            }
        }
    }

    Ok(())
}
