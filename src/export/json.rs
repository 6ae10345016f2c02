//! JSON export
//!
//! Full store export with schema versioning, and the annual rollup as a
//! standalone document.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{AnnualRollup, ManualAccount, MonthlyBudget, RecurringExpense};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything the store owns; upstream transactions are not included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub budgets: Vec<MonthlyBudget>,

    pub recurring: Vec<RecurringExpense>,

    pub manual_accounts: Vec<ManualAccount>,

    pub metadata: ExportMetadata,
}

/// Counts and ranges, for a reader skimming the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub budget_count: usize,
    pub expense_count: usize,
    pub template_count: usize,
    pub account_count: usize,
    pub envelope_count: usize,
    pub earliest_period: Option<String>,
    pub latest_period: Option<String>,
}

impl FullExport {
    /// Snapshot the store
    pub fn from_storage(storage: &Storage) -> BudgetResult<Self> {
        let budgets = storage.budgets.get_all()?;
        let recurring = storage.recurring.get_all()?;
        let manual_accounts = storage.accounts.get_all()?;

        let metadata = ExportMetadata {
            budget_count: budgets.len(),
            expense_count: budgets.iter().map(|b| b.expenses.len()).sum(),
            template_count: recurring.len(),
            account_count: manual_accounts.len(),
            envelope_count: manual_accounts.iter().map(|a| a.envelopes.len()).sum(),
            earliest_period: budgets.iter().map(|b| b.year_month).min().map(|p| p.to_string()),
            latest_period: budgets.iter().map(|b| b.year_month).max().map(|p| p.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            budgets,
            recurring,
            manual_accounts,
            metadata,
        })
    }

    /// Check version and structural consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let mut periods = HashSet::new();
        let mut expense_ids = HashSet::new();
        for budget in &self.budgets {
            if !periods.insert(budget.year_month) {
                return Err(format!("Duplicate budget for {}", budget.year_month));
            }
            budget
                .validate()
                .map_err(|e| format!("Budget {}: {}", budget.year_month, e))?;
            for expense in &budget.expenses {
                if !expense_ids.insert(expense.id) {
                    return Err(format!("Duplicate expense id {}", expense.id));
                }
            }
        }

        for template in &self.recurring {
            template
                .validate()
                .map_err(|e| format!("Recurring expense {}: {}", template.name, e))?;
        }

        for account in &self.manual_accounts {
            account
                .validate()
                .map_err(|e| format!("Manual account {}: {}", account.name, e))?;
        }

        Ok(())
    }
}

/// Export the full store to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> BudgetResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| BudgetError::Json(e.to_string()))?;
    export.validate().map_err(BudgetError::Validation)?;
    Ok(export)
}

/// Annual rollup wrapped with export metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollupExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub currency: String,
    pub rollup: AnnualRollup,
}

impl RollupExport {
    pub fn new(rollup: AnnualRollup, currency: impl Into<String>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            currency: currency.into(),
            rollup,
        }
    }
}

/// Export an annual rollup to pretty-printed JSON
pub fn export_rollup_json<W: Write>(rollup: &AnnualRollup, currency: &str, writer: &mut W) -> BudgetResult<()> {
    let export = RollupExport::new(rollup.clone(), currency);
    serde_json::to_writer_pretty(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))
}
