//! Upstream transaction feed
//!
//! Bank transactions are owned by the upstream provider. This module only
//! reads them, plus a CSV import that fills the local feed file from a bank
//! export.

use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Source of upstream bank transactions
pub trait TransactionFeed {
    /// Every transaction the source currently knows about
    ///
    /// Fails with `UpstreamUnavailable` when the source cannot be read.
    fn transactions(&self) -> BudgetResult<Vec<Transaction>>;

    /// Transactions dated within `from..=to`
    fn transactions_between(&self, from: NaiveDate, to: NaiveDate) -> BudgetResult<Vec<Transaction>> {
        Ok(self
            .transactions()?
            .into_iter()
            .filter(|t| t.date >= from && t.date <= to)
            .collect())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FeedData {
    transactions: Vec<Transaction>,
}

/// Feed backed by a transactions.json file synced from the bank
pub struct JsonTransactionFeed {
    path: PathBuf,
}

impl JsonTransactionFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Merge transactions from a bank CSV export into the feed file
    ///
    /// Expected columns (header row required, extra columns ignored):
    /// `id,date,description,amount,currency,category,creditor_name,debtor_name,counterparty_account`.
    /// Only `date` and `amount` are mandatory. Rows without an `id` get one
    /// derived from date, amount and description, so re-importing the same
    /// export is a no-op.
    pub fn import_csv<R: Read>(&self, reader: R) -> BudgetResult<ImportResult> {
        let mut existing: FeedData = read_json(&self.path)?;
        let mut known: HashSet<TransactionId> =
            existing.transactions.iter().map(|t| t.id.clone()).collect();

        let mut result = ImportResult::default();
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (idx, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // Header is line 1
            let line = idx + 2;
            let tx = match row.map_err(|e| e.to_string()).and_then(CsvRow::into_transaction) {
                Ok(tx) => tx,
                Err(message) => {
                    result.errors.push((line, message));
                    continue;
                }
            };

            if !known.insert(tx.id.clone()) {
                result.duplicates_skipped += 1;
                continue;
            }
            existing.transactions.push(tx);
            result.imported += 1;
        }

        if result.imported > 0 {
            existing.transactions.sort_by(|a, b| a.date.cmp(&b.date));
            write_json_atomic(&self.path, &existing)?;
        }

        tracing::info!(
            imported = result.imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors.len(),
            "CSV import finished"
        );
        Ok(result)
    }
}

impl TransactionFeed for JsonTransactionFeed {
    fn transactions(&self) -> BudgetResult<Vec<Transaction>> {
        if !self.path.exists() {
            return Err(BudgetError::UpstreamUnavailable(format!(
                "no transaction feed at {}",
                self.path.display()
            )));
        }

        let data: FeedData = read_json(&self.path).map_err(|e| {
            tracing::warn!(error = %e, "transaction feed unreadable");
            BudgetError::UpstreamUnavailable(e.to_string())
        })?;
        tracing::debug!(count = data.transactions.len(), "loaded transaction feed");
        Ok(data.transactions)
    }
}

/// Fixed in-memory feed
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    transactions: Vec<Transaction>,
}

impl MemoryFeed {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

impl TransactionFeed for MemoryFeed {
    fn transactions(&self) -> BudgetResult<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }
}

/// Outcome of a CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    pub duplicates_skipped: usize,
    /// (CSV line number, message)
    pub errors: Vec<(usize, String)>,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    date: String,
    #[serde(default)]
    description: String,
    amount: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    creditor_name: Option<String>,
    #[serde(default)]
    debtor_name: Option<String>,
    #[serde(default)]
    counterparty_account: Option<String>,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("Invalid date: '{}'", s))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Stable ID for rows the bank exported without one
fn derived_id(date: NaiveDate, amount: Money, description: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    date.hash(&mut hasher);
    amount.minor().hash(&mut hasher);
    description.hash(&mut hasher);
    format!("csv-{:016x}", hasher.finish())
}

impl CsvRow {
    fn into_transaction(self) -> Result<Transaction, String> {
        let date = parse_date(&self.date)?;
        let amount = Money::parse(&self.amount).map_err(|e| e.to_string())?;
        let id = non_empty(self.id).unwrap_or_else(|| derived_id(date, amount, &self.description));

        let mut tx = Transaction::new(id, date, self.description, amount);
        if let Some(currency) = non_empty(self.currency) {
            tx.currency = currency.to_uppercase();
        }
        tx.category = non_empty(self.category);
        tx.creditor_name = non_empty(self.creditor_name);
        tx.debtor_name = non_empty(self.debtor_name);
        tx.counterparty_account = non_empty(self.counterparty_account);
        Ok(tx)
    }
}
