//! Transaction model
//!
//! Transactions come from the upstream bank feed and are never edited here.
//! They are read by the matcher, the income sync and the annual rollup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// Classification of a transaction by counterparty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Ordinary income or spending
    #[default]
    Normal,
    /// Money moved between the user's own accounts
    InternalTransfer,
    /// Money sent to or received from a family member
    FamilyTransfer,
}

impl TransactionKind {
    /// Whether the transaction moves money rather than spending it
    pub fn is_transfer(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::InternalTransfer => write!(f, "Internal transfer"),
            Self::FamilyTransfer => write!(f, "Family transfer"),
        }
    }
}

/// A bank transaction as delivered by the upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    /// Positive for inflow, negative for outflow
    pub amount: Money,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditor_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtor_name: Option<String>,

    /// Account number of the other side, when the bank reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_account: Option<String>,
}

fn default_currency() -> String {
    "CZK".to_string()
}

impl Transaction {
    /// Create a transaction with only the required fields
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            id: TransactionId::new(id),
            date,
            description: description.into(),
            amount,
            currency: default_currency(),
            category: None,
            creditor_name: None,
            debtor_name: None,
            counterparty_account: None,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check if this is an outflow
    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }

    /// Check if this is an inflow
    pub fn is_inflow(&self) -> bool {
        self.amount.is_positive()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.description, self.amount)
    }
}
