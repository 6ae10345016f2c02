//! Manual account CLI commands
//!
//! Implements CLI commands for manual account management.

use clap::Subcommand;

use crate::config::Settings;
use crate::context::AccountsContext;
use crate::display::{format_account_details, format_account_list};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{ManualAccount, Money};
use crate::services::{AccountPatch, AccountSummary, ManualAccountService, NewManualAccount};
use crate::storage::Storage;

use super::{flag_pair, parse_money, parse_money_opt};

/// Manual account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List manual accounts with their envelope partition
    List {
        /// Include hidden accounts
        #[arg(short, long)]
        all: bool,
    },
    /// Show account details and envelopes
    Show {
        /// Account name or ID
        account: String,
    },
    /// Create a new manual account
    Create {
        /// Account name
        name: String,
        /// Current balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0")]
        balance: String,
        /// Currency code; defaults to the configured currency
        #[arg(short, long)]
        currency: Option<String>,
        /// Account number, used to recognise transfers
        #[arg(long)]
        number: Option<String>,
        /// Hide the account from overviews
        #[arg(long)]
        hidden: bool,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        balance: Option<String>,
        /// Account number; pass "" to clear
        #[arg(long)]
        number: Option<String>,
        #[arg(short, long)]
        currency: Option<String>,
        #[arg(long, conflicts_with = "hide")]
        show: bool,
        #[arg(long)]
        hide: bool,
    },
    /// Delete an account and its envelopes
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Look up an account by name or ID, failing with `NotFound`
pub(crate) fn require_account(service: &ManualAccountService, reference: &str) -> BudgetResult<ManualAccount> {
    service
        .find(reference)?
        .ok_or_else(|| BudgetError::account_not_found(reference))
}

/// Handle a manual account command
pub fn handle_account_command(storage: &Storage, settings: &Settings, cmd: AccountCommands) -> BudgetResult<()> {
    let service = ManualAccountService::new(storage);

    match cmd {
        AccountCommands::List { all } => {
            let context = AccountsContext::new(storage, all)?;
            print!("{}", format_account_list(&context.snapshot()));
        }

        AccountCommands::Show { account } => {
            let account = require_account(&service, &account)?;
            let summary = AccountSummary {
                partition: service.partition(account.id)?,
                account,
            };
            print!("{}", format_account_details(&summary));
        }

        AccountCommands::Create {
            name,
            balance,
            currency,
            number,
            hidden,
        } => {
            let balance: Money = parse_money(&balance, "balance")?;
            let mut input = NewManualAccount::new(
                name,
                balance,
                currency.unwrap_or_else(|| settings.currency.clone()),
            );
            input.account_number = number.filter(|n| !n.trim().is_empty());
            input.is_visible = !hidden;

            let account = service.create(input)?;
            println!("Created account: {}", account);
            println!("  ID: {}", account.id);
        }

        AccountCommands::Edit {
            account,
            name,
            balance,
            number,
            currency,
            show,
            hide,
        } => {
            let target = require_account(&service, &account)?;
            let patch = AccountPatch {
                name,
                account_number: number,
                balance: parse_money_opt(balance, "balance")?,
                currency,
                is_visible: flag_pair(show, hide),
            };

            if patch == AccountPatch::default() {
                println!("No changes specified. Use --name, --balance, --number, --currency, --show or --hide.");
                return Ok(());
            }

            let updated = service.update(target.id, patch)?;
            println!("Updated account: {}", updated);
        }

        AccountCommands::Delete { account } => {
            let target = require_account(&service, &account)?;
            let deleted = service.delete(target.id)?;
            println!(
                "Deleted account '{}' ({} envelope(s)).",
                deleted.name,
                deleted.envelopes.len()
            );
        }
    }

    Ok(())
}
