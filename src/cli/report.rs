//! CLI commands for reports
//!
//! The annual overview, printed or exported.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use chrono::Datelike;
use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::format_annual_rollup;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_rollup_csv, export_rollup_json, export_rollup_yaml};
use crate::services::ReportService;
use crate::storage::Storage;

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain-text table
    Terminal,
    Json,
    Yaml,
    /// Month rows plus TOTAL and AVERAGE
    Csv,
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Annual overview: per-month figures, totals, averages and breakdowns
    Annual {
        /// Year, defaults to the current one
        year: Option<i32>,

        /// Skip the transaction feed; the category breakdown stays empty
        #[arg(long)]
        offline: bool,

        #[arg(short, long, value_enum, default_value = "terminal")]
        format: ReportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&PathBuf>) -> BudgetResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Handle a report command
pub fn handle_report_command(storage: &Storage, settings: &Settings, cmd: ReportCommands) -> BudgetResult<()> {
    let service = ReportService::new(storage);

    match cmd {
        ReportCommands::Annual {
            year,
            offline,
            format,
            output,
        } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let rollup = if offline {
                service.annual_budgets_only(year)?
            } else {
                service.annual(year)?
            };

            let currency = settings.currency.as_str();
            let mut writer = open_output(output.as_ref())?;
            match format {
                ReportFormat::Terminal => {
                    writer.write_all(format_annual_rollup(&rollup, currency).as_bytes())?;
                }
                ReportFormat::Json => export_rollup_json(&rollup, currency, &mut writer)?,
                ReportFormat::Yaml => export_rollup_yaml(&rollup, currency, &mut writer)?,
                ReportFormat::Csv => export_rollup_csv(&rollup, &mut writer)?,
            }
            writer.flush()?;

            if let Some(path) = output {
                println!("Annual report {} written to: {}", year, path.display());
            }
        }
    }

    Ok(())
}
