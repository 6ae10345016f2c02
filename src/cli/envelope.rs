//! Envelope CLI commands
//!
//! Envelopes split a manual account's balance into the user's own money and
//! money held for someone else.

use clap::Subcommand;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Envelope, EnvelopePatch, ManualAccount};
use crate::services::ManualAccountService;
use crate::storage::Storage;

use super::account::require_account;
use super::{flag_pair, parse_money, parse_money_opt};

/// Envelope subcommands
#[derive(Subcommand)]
pub enum EnvelopeCommands {
    /// Add an envelope to an account
    Add {
        /// Account name or ID
        account: String,
        /// Envelope name
        name: String,
        /// Amount set aside
        amount: String,
        /// Money held for someone else
        #[arg(long)]
        borrowed: bool,
        #[arg(long)]
        note: Option<String>,
    },
    /// Edit an envelope
    Edit {
        /// Account name or ID
        account: String,
        /// Envelope name or ID
        envelope: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Mark as the user's own money
        #[arg(long, conflicts_with = "borrowed")]
        mine: bool,
        /// Mark as money held for someone else
        #[arg(long)]
        borrowed: bool,
    },
    /// Flip an envelope between own and borrowed
    Toggle {
        /// Account name or ID
        account: String,
        /// Envelope name or ID
        envelope: String,
    },
    /// Remove an envelope; its amount becomes unallocated
    Delete {
        /// Account name or ID
        account: String,
        /// Envelope name or ID
        envelope: String,
    },
}

fn require_envelope(
    service: &ManualAccountService,
    account: &ManualAccount,
    reference: &str,
) -> BudgetResult<Envelope> {
    service
        .find_envelope(account, reference)
        .ok_or_else(|| BudgetError::envelope_not_found(format!("{} in {}", reference, account.name)))
}

fn ownership(envelope: &Envelope) -> &'static str {
    if envelope.is_mine {
        "mine"
    } else {
        "borrowed"
    }
}

/// Handle an envelope command
pub fn handle_envelope_command(storage: &Storage, cmd: EnvelopeCommands) -> BudgetResult<()> {
    let service = ManualAccountService::new(storage);

    match cmd {
        EnvelopeCommands::Add {
            account,
            name,
            amount,
            borrowed,
            note,
        } => {
            let account = require_account(&service, &account)?;
            let amount = parse_money(&amount, "amount")?;
            let mut envelope = if borrowed {
                Envelope::reserved(name, amount)
            } else {
                Envelope::new(name, amount)
            };
            envelope.note = note;

            let added = service.add_envelope(account.id, envelope)?;
            let partition = service.partition(account.id)?;
            println!(
                "Added envelope '{}' ({}, {}) to {}.",
                added.name,
                added.amount,
                ownership(&added),
                account.name
            );
            println!("  Unallocated: {}", partition.unallocated);
            if partition.is_over_allocated() {
                println!("  Warning: envelopes exceed the account balance.");
            }
        }

        EnvelopeCommands::Edit {
            account,
            envelope,
            name,
            amount,
            note,
            mine,
            borrowed,
        } => {
            let account = require_account(&service, &account)?;
            let target = require_envelope(&service, &account, &envelope)?;
            let patch = EnvelopePatch {
                name,
                amount: parse_money_opt(amount, "amount")?,
                is_mine: flag_pair(mine, borrowed),
                note,
            };

            if patch.is_empty() {
                println!("No changes specified. Use --name, --amount, --note, --mine or --borrowed.");
                return Ok(());
            }

            let updated = service.update_envelope(account.id, target.id, patch)?;
            println!(
                "Updated envelope '{}' ({}, {}).",
                updated.name,
                updated.amount,
                ownership(&updated)
            );
        }

        EnvelopeCommands::Toggle { account, envelope } => {
            let account = require_account(&service, &account)?;
            let target = require_envelope(&service, &account, &envelope)?;
            let toggled = service.toggle_envelope(account.id, target.id)?;
            println!("Envelope '{}' is now {}.", toggled.name, ownership(&toggled));
        }

        EnvelopeCommands::Delete { account, envelope } => {
            let account = require_account(&service, &account)?;
            let target = require_envelope(&service, &account, &envelope)?;
            let removed = service.remove_envelope(account.id, target.id)?;
            println!("Removed envelope '{}' from {}.", removed.name, account.name);
        }
    }

    Ok(())
}
