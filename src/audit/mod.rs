//! Audit logging
//!
//! Every create, update and delete performed by the services is appended to
//! a line-delimited JSON log with the entity's state before and after the
//! change.
//!
//! - `AuditEntry`: one operation on one entity
//! - `AuditLogger`: appends entries to and reads them back from the log file
//! - `generate_diff`: top-level field changes between two serialized states
//!
//! ```rust,ignore
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::update(
//!     EntityType::MonthlyExpense,
//!     expense.id.to_string(),
//!     Some(expense.name.clone()),
//!     &before,
//!     &expense,
//!     generate_diff(&before_json, &after_json),
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
