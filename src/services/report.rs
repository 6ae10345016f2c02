//! Report service
//!
//! Read-only views that combine budgets with the upstream transaction feed.

use serde::Serialize;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{AnnualRollup, Transaction, TransactionKind, YearMonth};
use crate::storage::Storage;

use super::rollup;
use super::transfer::{classify, TransferRules};

/// Service for annual and transaction reports
pub struct ReportService<'a> {
    storage: &'a Storage,
}

/// A transaction with its transfer classification
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedTransaction {
    pub transaction: Transaction,
    pub kind: TransactionKind,
}

fn check_year(year: i32) -> BudgetResult<()> {
    if YearMonth::new(year, 1).is_none() {
        return Err(BudgetError::Validation(format!("Invalid year: {}", year)));
    }
    Ok(())
}

impl<'a> ReportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Annual overview including the category breakdown
    ///
    /// Fails with `UpstreamUnavailable` when the transaction feed cannot be
    /// read; nothing is computed from a partial view.
    pub fn annual(&self, year: i32) -> BudgetResult<AnnualRollup> {
        check_year(year)?;
        let budgets = self.storage.budgets.get_year(year)?;
        let transactions = self.storage.feed().transactions()?;
        Ok(rollup::annual_rollup(year, &budgets, &transactions))
    }

    /// Annual overview from budgets alone; the category breakdown is empty
    pub fn annual_budgets_only(&self, year: i32) -> BudgetResult<AnnualRollup> {
        check_year(year)?;
        let budgets = self.storage.budgets.get_year(year)?;
        Ok(rollup::annual_rollup(year, &budgets, &[]))
    }

    /// A month's upstream transactions with their transfer classification
    pub fn classified_transactions(
        &self,
        year_month: YearMonth,
        settings: &Settings,
    ) -> BudgetResult<Vec<ClassifiedTransaction>> {
        let rules = TransferRules::new(&settings.transfers, &self.storage.accounts.get_all()?);
        let transactions = self
            .storage
            .feed()
            .transactions_between(year_month.start_date(), year_month.end_date())?;

        Ok(transactions
            .into_iter()
            .map(|transaction| ClassifiedTransaction {
                kind: classify(&transaction, &rules),
                transaction,
            })
            .collect())
    }

    /// Only the transfers of a month
    pub fn transfers(&self, year_month: YearMonth, settings: &Settings) -> BudgetResult<Vec<ClassifiedTransaction>> {
        Ok(self
            .classified_transactions(year_month, settings)?
            .into_iter()
            .filter(|c| c.kind.is_transfer())
            .collect())
    }
}
