//! Budget CLI commands
//!
//! Monthly budget overview, income edits, copy-previous, matching and salary
//! sync.

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_budget, format_income_sync, format_match_report};
use crate::error::BudgetResult;
use crate::services::{BudgetPatch, BudgetService};
use crate::storage::Storage;

use super::{flag_pair, parse_money_opt, parse_month};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show a month's budget, creating it from templates if needed
    Show {
        /// Month (YYYY-MM, current, last, next)
        month: Option<String>,
    },

    /// Set income, investment and savings figures
    Set {
        /// Month (YYYY-MM, current, last, next)
        #[arg(short, long)]
        month: Option<String>,
        #[arg(long)]
        salary: Option<String>,
        #[arg(long)]
        other_income: Option<String>,
        #[arg(long)]
        meal_vouchers: Option<String>,
        /// Amount moved to investments this month
        #[arg(long)]
        investment: Option<String>,
        /// Amount moved to savings this month (informational)
        #[arg(long)]
        savings: Option<String>,
        /// Mark the month closed
        #[arg(long, conflicts_with = "reopen")]
        close: bool,
        /// Mark the month open again
        #[arg(long)]
        reopen: bool,
    },

    /// Seed a month from the previous one
    CopyPrevious {
        /// Month to fill (YYYY-MM, current, last, next)
        month: Option<String>,
    },

    /// Link expenses to bank transactions
    Match {
        /// Month (YYYY-MM, current, last, next)
        month: Option<String>,
    },

    /// Set salary from categorised bank transactions
    SyncIncome {
        /// Month (YYYY-MM, current, last, next)
        month: Option<String>,
    },

    /// Delete a month's budget and all its expenses
    Delete {
        /// Month (YYYY-MM)
        month: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, settings: &Settings, cmd: BudgetCommands) -> BudgetResult<()> {
    let service = BudgetService::new(storage);
    let currency = settings.currency.as_str();

    match cmd {
        BudgetCommands::Show { month } => {
            let overview = service.overview(parse_month(month.as_deref())?)?;
            print!("{}", format_budget(&overview.budget, &overview.totals, currency));
        }

        BudgetCommands::Set {
            month,
            salary,
            other_income,
            meal_vouchers,
            investment,
            savings,
            close,
            reopen,
        } => {
            let ym = parse_month(month.as_deref())?;
            let patch = BudgetPatch {
                salary: parse_money_opt(salary, "salary")?,
                other_income: parse_money_opt(other_income, "other income")?,
                meal_vouchers: parse_money_opt(meal_vouchers, "meal vouchers")?,
                investment_amount: parse_money_opt(investment, "investment")?,
                surplus_to_savings: parse_money_opt(savings, "savings")?,
                is_closed: flag_pair(close, reopen),
            };

            if patch.is_empty() {
                println!("No changes specified. See 'budget budget set --help'.");
                return Ok(());
            }

            service.get_or_create(ym)?;
            let updated = service.update(ym, patch)?;
            let overview = service.overview(updated.year_month)?;
            print!("{}", format_budget(&overview.budget, &overview.totals, currency));
        }

        BudgetCommands::CopyPrevious { month } => {
            let result = service.copy_previous(parse_month(month.as_deref())?)?;
            println!(
                "Copied {} expense(s) and income from {} to {}.",
                result.copied, result.from, result.budget.year_month
            );
        }

        BudgetCommands::Match { month } => {
            let report = service.match_transactions(parse_month(month.as_deref())?, settings)?;
            println!("{}", format_match_report(&report));
        }

        BudgetCommands::SyncIncome { month } => {
            let sync = service.sync_income(parse_month(month.as_deref())?, settings)?;
            println!("{}", format_income_sync(&sync, currency));
        }

        BudgetCommands::Delete { month } => {
            let deleted = service.delete(parse_month(Some(&month))?)?;
            println!(
                "Deleted budget {} ({} expense(s)).",
                deleted.year_month,
                deleted.expenses.len()
            );
        }
    }

    Ok(())
}
