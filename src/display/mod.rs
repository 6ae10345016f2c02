//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for budgets, manual accounts and
//! reports.

pub mod account;
pub mod budget;
pub mod report;

pub use account::{format_account_details, format_account_list};
pub use budget::{format_budget, format_recurring_list};
pub use report::{format_annual_rollup, format_income_sync, format_match_report, format_transfers};
