//! Transfer detection
//!
//! Tags upstream transactions that move money between the user's own accounts
//! or to and from family members, so they can be kept out of expense matching.

use crate::config::TransferSettings;
use crate::models::{ManualAccount, Transaction, TransactionKind};

/// Normalized rule set for [`classify`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRules {
    own_accounts: Vec<String>,
    family_names: Vec<String>,
}

/// Strip whitespace so "1234 5678/0100" and "12345678/0100" compare equal
fn normalize_account(number: &str) -> String {
    number.chars().filter(|c| !c.is_whitespace()).collect()
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl TransferRules {
    /// Build rules from configured numbers and names plus manual account numbers
    pub fn new(settings: &TransferSettings, accounts: &[ManualAccount]) -> Self {
        let mut own_accounts: Vec<String> = settings
            .own_account_numbers
            .iter()
            .map(String::as_str)
            .chain(accounts.iter().filter_map(|a| a.account_number.as_deref()))
            .map(normalize_account)
            .filter(|n| !n.is_empty())
            .collect();
        own_accounts.sort();
        own_accounts.dedup();

        let family_names = settings
            .family_names
            .iter()
            .map(|n| normalize_name(n))
            .filter(|n| !n.is_empty())
            .collect();

        Self {
            own_accounts,
            family_names,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.own_accounts.is_empty() && self.family_names.is_empty()
    }

    fn mentions_own_account(&self, text: &str) -> bool {
        let text = normalize_account(text);
        self.own_accounts.iter().any(|n| text.contains(n.as_str()))
    }

    fn mentions_family(&self, name: &str) -> bool {
        let name = normalize_name(name);
        self.family_names.iter().any(|f| name.contains(f.as_str()))
    }
}

/// Classify a transaction; an own-account hit wins over a family-name hit
pub fn classify(tx: &Transaction, rules: &TransferRules) -> TransactionKind {
    let internal = tx
        .counterparty_account
        .as_deref()
        .into_iter()
        .chain(std::iter::once(tx.description.as_str()))
        .any(|text| rules.mentions_own_account(text));
    if internal {
        return TransactionKind::InternalTransfer;
    }

    let family = tx
        .creditor_name
        .as_deref()
        .into_iter()
        .chain(tx.debtor_name.as_deref())
        .any(|name| rules.mentions_family(name));
    if family {
        return TransactionKind::FamilyTransfer;
    }

    TransactionKind::Normal
}
