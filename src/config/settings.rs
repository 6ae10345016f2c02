//! User settings for monthly-budget
//!
//! Currency, matching tolerances, the salary window, transfer detection rules
//! and the default log filter.

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;

/// Tolerances for linking expenses to bank transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Amount strategy: allowed deviation from the expense amount, in percent
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance_pct: u32,

    /// Category strategy: allowed deviation from the expense amount, in percent
    #[serde(default = "default_category_tolerance")]
    pub category_tolerance_pct: u32,
}

fn default_amount_tolerance() -> u32 {
    5
}

fn default_category_tolerance() -> u32 {
    20
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            amount_tolerance_pct: default_amount_tolerance(),
            category_tolerance_pct: default_category_tolerance(),
        }
    }
}

/// How salary is recognised in the transaction feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSettings {
    /// Upstream category carrying salary payments
    #[serde(default = "default_salary_category")]
    pub salary_category: String,

    /// Salary paid up to this day of the following month still counts
    #[serde(default = "default_grace_days")]
    pub salary_grace_days: u32,
}

fn default_salary_category() -> String {
    "Salary".to_string()
}

fn default_grace_days() -> u32 {
    15
}

impl Default for IncomeSettings {
    fn default() -> Self {
        Self {
            salary_category: default_salary_category(),
            salary_grace_days: default_grace_days(),
        }
    }
}

/// Rules for recognising transfers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSettings {
    /// Account numbers belonging to the user, in addition to manual accounts
    #[serde(default)]
    pub own_account_numbers: Vec<String>,

    /// Names of family members; transfers to or from them are tagged
    #[serde(default)]
    pub family_names: Vec<String>,
}

/// User settings for monthly-budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// ISO code used for new manual accounts and in reports
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub matching: MatchingSettings,

    #[serde(default)]
    pub income: IncomeSettings,

    #[serde(default)]
    pub transfers: TransferSettings,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "CZK".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency: default_currency(),
            matching: MatchingSettings::default(),
            income: IncomeSettings::default(),
            transfers: TransferSettings::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Caller decides when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.matching.amount_tolerance_pct > 100 || self.matching.category_tolerance_pct > 100 {
            return Err(BudgetError::Config(
                "Matching tolerances must be between 0 and 100 percent".into(),
            ));
        }
        if !(1..=28).contains(&self.income.salary_grace_days) {
            return Err(BudgetError::Config(
                "salary_grace_days must be between 1 and 28".into(),
            ));
        }
        if self.income.salary_category.trim().is_empty() {
            return Err(BudgetError::Config("salary_category cannot be empty".into()));
        }
        Ok(())
    }
}
