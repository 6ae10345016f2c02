//! Configuration module for monthly-budget
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BudgetPaths;
pub use settings::{IncomeSettings, MatchingSettings, Settings, TransferSettings};
