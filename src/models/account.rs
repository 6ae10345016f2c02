//! Manual account model
//!
//! A manual account is a balance the user types in (cash, an account without
//! bank sync). Its balance can be split into named envelopes, each either the
//! user's own money or money held for someone else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EnvelopeId, ManualAccountId};
use super::money::Money;

/// A user-maintained account with envelope sub-allocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAccount {
    pub id: ManualAccountId,

    pub name: String,

    /// Free-text account number, used only for transfer detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    /// Balance as entered by the user
    #[serde(default)]
    pub balance: Money,

    /// ISO currency code
    pub currency: String,

    /// Whether the account is shown in overviews
    #[serde(default = "default_visible")]
    pub is_visible: bool,

    /// Envelopes in display order
    #[serde(default)]
    pub envelopes: Vec<Envelope>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_visible() -> bool {
    true
}

impl ManualAccount {
    /// Create a new account with no envelopes
    pub fn new(name: impl Into<String>, balance: Money, currency: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ManualAccountId::new(),
            name: name.into(),
            account_number: None,
            balance,
            currency: currency.into(),
            is_visible: true,
            envelopes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Get an envelope by ID
    pub fn envelope(&self, id: EnvelopeId) -> Option<&Envelope> {
        self.envelopes.iter().find(|e| e.id == id)
    }

    /// Mark the record as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        let code = self.currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AccountValidationError::InvalidCurrency(self.currency.clone()));
        }
        if !self.balance.is_within_limit() {
            return Err(AccountValidationError::BalanceTooLarge);
        }
        Ok(())
    }
}

impl fmt::Display for ManualAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance.format_with_currency(&self.currency))
    }
}

/// A named slice of a manual account's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: EnvelopeId,

    pub name: String,

    pub amount: Money,

    /// `true` for the user's own money, `false` for money held for someone else
    #[serde(default = "default_mine")]
    pub is_mine: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn default_mine() -> bool {
    true
}

impl Envelope {
    /// Create an envelope belonging to the user
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: EnvelopeId::new(),
            name: name.into(),
            amount,
            is_mine: true,
            note: None,
        }
    }

    /// Create an envelope holding someone else's money
    pub fn reserved(name: impl Into<String>, amount: Money) -> Self {
        Self {
            is_mine: false,
            ..Self::new(name, amount)
        }
    }

    /// Attach a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Partial update for an envelope; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mine: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EnvelopePatch {
    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none() && self.is_mine.is_none() && self.note.is_none()
    }
}

/// Balance of a manual account split by envelope ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Sum of the user's own envelopes
    pub my_balance: Money,

    /// Sum of envelopes held for someone else
    pub borrowed_total: Money,

    /// Balance not assigned to any envelope; negative when over-allocated
    pub unallocated: Money,
}

impl Partition {
    /// Whether envelopes claim more than the account holds
    pub fn is_over_allocated(&self) -> bool {
        self.unallocated.is_negative()
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    InvalidCurrency(String),
    BalanceTooLarge,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::InvalidCurrency(c) => write!(f, "Invalid currency code: '{}'", c),
            Self::BalanceTooLarge => write!(
                f,
                "Account balance exceeds the maximum of {}",
                Money::from_minor(Money::MAX_ABS_MINOR)
            ),
        }
    }
}

impl std::error::Error for AccountValidationError {}
