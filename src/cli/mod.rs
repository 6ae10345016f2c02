//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod budget;
pub mod envelope;
pub mod expense;
pub mod export;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use envelope::{handle_envelope_command, EnvelopeCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, YearMonth};

fn out_of_range(arg: &str) -> BudgetError {
    BudgetError::Validation(format!("Month '{}' is outside 0001-01..9999-12", arg))
}

/// Resolve a month argument
///
/// Accepts `YYYY-MM`, `current` (the default), `last`/`prev` and `next`.
pub fn parse_month(arg: Option<&str>) -> BudgetResult<YearMonth> {
    let current = YearMonth::current();
    let Some(arg) = arg else {
        return Ok(current);
    };

    match arg.trim().to_lowercase().as_str() {
        "" | "current" | "this" => Ok(current),
        "last" | "prev" | "previous" => current.prev().ok_or_else(|| out_of_range(arg)),
        "next" => current.next().ok_or_else(|| out_of_range(arg)),
        other => YearMonth::parse(other).map_err(|e| {
            BudgetError::Validation(format!(
                "Invalid month '{}': {}. Use YYYY-MM, current, last or next",
                arg, e
            ))
        }),
    }
}

/// Parse a money argument such as `1500`, `1500.50` or `1 500,50`
pub fn parse_money(value: &str, field: &str) -> BudgetResult<Money> {
    Money::parse(value).map_err(|e| {
        BudgetError::Validation(format!("Invalid {} '{}': {}", field, value, e))
    })
}

/// Parse an optional money argument
pub fn parse_money_opt(value: Option<String>, field: &str) -> BudgetResult<Option<Money>> {
    value.map(|v| parse_money(&v, field)).transpose()
}

/// Turn a `--flag`/`--no-flag` pair into an optional boolean
pub fn flag_pair(set: bool, unset: bool) -> Option<bool> {
    match (set, unset) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        let current = YearMonth::current();
        assert_eq!(parse_month(None).unwrap(), current);
        assert_eq!(Some(parse_month(Some("last")).unwrap()), current.prev());
        assert_eq!(Some(parse_month(Some("NEXT")).unwrap()), current.next());
        assert_eq!(
            parse_month(Some("2025-03")).unwrap(),
            YearMonth::new(2025, 3).unwrap()
        );
        assert!(parse_month(Some("2025-13")).unwrap_err().is_validation());
        assert!(parse_month(Some("March")).is_err());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("1500", "amount").unwrap(), Money::from_major(1_500));
        assert!(parse_money("abc", "amount").unwrap_err().is_validation());
        assert_eq!(parse_money_opt(None, "salary").unwrap(), None);
    }

    #[test]
    fn test_flag_pair() {
        assert_eq!(flag_pair(true, false), Some(true));
        assert_eq!(flag_pair(false, true), Some(false));
        assert_eq!(flag_pair(false, false), None);
    }
}
