//! Transaction CLI commands
//!
//! Bank transactions are read-only here: they can be imported into the local
//! feed file from a CSV export and listed with their transfer classification.

use std::fs::File;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_transfers;
use crate::display::report::truncate;
use crate::error::{BudgetError, BudgetResult};
use crate::services::ReportService;
use crate::storage::{JsonTransactionFeed, Storage};

use super::parse_month;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Merge a bank CSV export into the transaction feed
    Import {
        /// CSV file path
        file: PathBuf,
    },
    /// List a month's transactions with their classification
    List {
        /// Month (YYYY-MM, current, last, next)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List a month's transfers
    Transfers {
        /// Month (YYYY-MM, current, last, next)
        #[arg(short, long)]
        month: Option<String>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    match cmd {
        TransactionCommands::Import { file } => {
            let reader = File::open(&file)
                .map_err(|e| BudgetError::Io(format!("Failed to open {}: {}", file.display(), e)))?;
            let feed = JsonTransactionFeed::new(storage.paths().transactions_file());
            let result = feed.import_csv(reader)?;

            println!("Import Complete!");
            println!("  Imported:    {}", result.imported);
            println!("  Skipped:     {}", result.duplicates_skipped);
            if !result.errors.is_empty() {
                println!("  Errors:      {}", result.errors.len());
                for (line, message) in result.errors.iter().take(10) {
                    println!("    Line {}: {}", line, message);
                }
            }
        }

        TransactionCommands::List { month } => {
            let ym = parse_month(month.as_deref())?;
            let classified = ReportService::new(storage).classified_transactions(ym, settings)?;

            if classified.is_empty() {
                println!("No transactions in {}.", ym);
                return Ok(());
            }

            println!(
                "{:<10}  {:>12}  {:<16}  {:<18}  Description",
                "Date", "Amount", "Category", "Kind"
            );
            for item in &classified {
                let tx = &item.transaction;
                println!(
                    "{:<10}  {:>12}  {:<16}  {:<18}  {}",
                    tx.date.to_string(),
                    tx.amount,
                    truncate(tx.category.as_deref().unwrap_or("-"), 16),
                    item.kind.to_string(),
                    truncate(&tx.description, 40)
                );
            }
            println!("{} transaction(s).", classified.len());
        }

        TransactionCommands::Transfers { month } => {
            let ym = parse_month(month.as_deref())?;
            let transfers = ReportService::new(storage).transfers(ym, settings)?;
            println!("{}", format_transfers(&transfers));
        }
    }

    Ok(())
}
