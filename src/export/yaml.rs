//! YAML export
//!
//! Human-readable counterparts of the JSON exports.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::{FullExport, RollupExport};
use crate::models::AnnualRollup;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

/// Export the full store to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# monthly-budget full export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer, "#").map_err(export_err)?;
    writeln!(writer, "# Bank transactions are not part of this file.").map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;
    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> BudgetResult<FullExport> {
    let export: FullExport = serde_yaml::from_str(yaml_str).map_err(export_err)?;
    export.validate().map_err(BudgetError::Validation)?;
    Ok(export)
}

/// Export an annual rollup to YAML
pub fn export_rollup_yaml<W: Write>(rollup: &AnnualRollup, currency: &str, writer: &mut W) -> BudgetResult<()> {
    writeln!(writer, "# Annual report {}", rollup.year).map_err(export_err)?;
    serde_yaml::to_writer(writer, &RollupExport::new(rollup.clone(), currency)).map_err(export_err)
}
