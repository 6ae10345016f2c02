//! Service layer for monthly-budget
//!
//! Pure domain operations (allocation, envelope partitioning, the annual
//! rollup, matching, income sync, transfer detection) and the storage-backed
//! services that validate, persist and audit on top of them.

pub mod account;
pub mod allocator;
pub mod budget;
pub mod income;
pub mod matching;
pub mod partition;
pub mod recurring;
pub mod report;
pub mod rollup;
pub mod transfer;

pub use account::{AccountPatch, AccountSummary, ManualAccountService, NewManualAccount};
pub use budget::{BudgetOverview, BudgetPatch, BudgetService, CopyResult, ExpensePatch};
pub use income::IncomeSync;
pub use matching::MatchReport;
pub use recurring::{NewRecurring, RecurringDeleteResult, RecurringPatch, RecurringService};
pub use report::{ClassifiedTransaction, ReportService};
pub use transfer::{classify, TransferRules};
