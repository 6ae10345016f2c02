//! Export module for monthly-budget
//!
//! - CSV: annual rollup and monthly expense tables (spreadsheet-compatible)
//! - JSON: machine-readable full store export and annual rollup
//! - YAML: human-readable versions of the same

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_budget_csv, export_rollup_csv};
pub use json::{export_full_json, export_rollup_json, import_from_json, FullExport, RollupExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, export_rollup_yaml, import_from_yaml};
