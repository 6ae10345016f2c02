//! CLI commands for data export
//!
//! Provides commands for exporting the store and checking export files.

use crate::error::{BudgetError, BudgetResult};
use crate::export::{
    export_budget_csv, export_full_json, export_full_yaml, import_from_json, import_from_yaml,
    FullExport,
};
use crate::services::BudgetService;
use crate::storage::Storage;
use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::parse_month;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export budgets, templates and manual accounts to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export one month's expense lines to CSV
    Budget {
        /// Month (YYYY-MM, current, last, next)
        month: String,

        /// Output file path
        output: PathBuf,
    },

    /// Check that an export file parses and is consistent
    Verify {
        /// JSON or YAML export file
        file: PathBuf,
    },

    /// Show export information without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> BudgetResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => handle_export_all(storage, output, format, pretty),
        ExportCommands::Budget { month, output } => handle_export_budget(storage, &month, output),
        ExportCommands::Verify { file } => handle_verify(&file),
        ExportCommands::Info => handle_export_info(storage),
    }
}

fn create_file(output: &Path) -> BudgetResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        BudgetError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle full export
fn handle_export_all(
    storage: &Storage,
    output: PathBuf,
    format: ExportFormat,
    pretty: bool,
) -> BudgetResult<()> {
    let mut writer = create_file(&output)?;

    match format {
        ExportFormat::Json => export_full_json(storage, &mut writer, pretty)?,
        ExportFormat::Yaml => export_full_yaml(storage, &mut writer)?,
    }
    writer.flush()?;

    println!("Full store exported to: {}", output.display());
    Ok(())
}

/// Handle single-month CSV export
fn handle_export_budget(storage: &Storage, month: &str, output: PathBuf) -> BudgetResult<()> {
    let ym = parse_month(Some(month))?;
    let budget = BudgetService::new(storage)
        .get(ym)?
        .ok_or_else(|| BudgetError::budget_not_found(ym.to_string()))?;

    let mut writer = create_file(&output)?;
    export_budget_csv(&budget, &mut writer)?;
    writer.flush()?;

    println!(
        "Exported {} expense(s) of {} to: {}",
        budget.expenses.len(),
        ym,
        output.display()
    );
    Ok(())
}

/// Parse an export file and report what it holds
fn handle_verify(file: &Path) -> BudgetResult<()> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| BudgetError::Io(format!("Failed to read {}: {}", file.display(), e)))?;

    let is_yaml = matches!(
        file.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let export = if is_yaml {
        import_from_yaml(&contents)?
    } else {
        import_from_json(&contents)?
    };

    println!("Export file is valid.");
    print_summary(&export);
    Ok(())
}

fn print_summary(export: &FullExport) {
    println!("Schema Version: {}", export.schema_version);
    println!("App Version:    {}", export.app_version);
    println!();

    println!("Data Summary:");
    println!("  Budgets:       {}", export.metadata.budget_count);
    println!("  Expenses:      {}", export.metadata.expense_count);
    println!("  Templates:     {}", export.metadata.template_count);
    println!("  Accounts:      {}", export.metadata.account_count);
    println!("  Envelopes:     {}", export.metadata.envelope_count);

    if let (Some(earliest), Some(latest)) = (
        export.metadata.earliest_period.as_ref(),
        export.metadata.latest_period.as_ref(),
    ) {
        println!();
        println!("Budget Range:");
        println!("  Earliest: {}", earliest);
        println!("  Latest:   {}", latest);
    }
}

/// Handle export info
fn handle_export_info(storage: &Storage) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;

    println!("Export Information");
    println!("==================\n");
    print_summary(&export);

    println!("\nAvailable Export Formats:");
    println!("  json - full store, machine-readable");
    println!("  yaml - full store, human-readable");
    println!("  csv  - one month's expenses (export budget)");

    println!("\nExamples:");
    println!("  budget export all backup.json --pretty");
    println!("  budget export budget 2025-01 january.csv");
    println!("  budget report annual 2025 --format csv --output 2025.csv");

    Ok(())
}
