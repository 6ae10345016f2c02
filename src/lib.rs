//! monthly-budget - monthly budgeting with shared-expense splitting
//!
//! This library provides the core functionality for the `budget` command.
//! Each month plans income against expense lines; an expense split with
//! someone else counts only at the user's share (100, 50, 33 or 25 percent).
//! Manual accounts can be divided into envelopes of the user's own money and
//! money held for others. Bank transactions come from an upstream feed and
//! are only read: to match expenses, set salary and build the annual report.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (money, shares, budgets, accounts, transactions)
//! - `storage`: JSON file repositories and the transaction feed
//! - `services`: Business logic (allocator, partitioner, rollup, matching)
//! - `context`: Shared snapshot of manual accounts and their totals
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use monthly_budget::config::{BudgetPaths, Settings};
//! use monthly_budget::services::BudgetService;
//! use monthly_budget::storage::Storage;
//!
//! let paths = BudgetPaths::new()?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let overview = BudgetService::new(&storage).overview(YearMonth::current())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
