//! Recurring expense CLI commands

use clap::Subcommand;

use crate::display::format_recurring_list;
use crate::error::{BudgetError, BudgetResult};
use crate::models::RecurringExpense;
use crate::services::{NewRecurring, RecurringPatch, RecurringService};
use crate::storage::Storage;

use super::{flag_pair, parse_money, parse_money_opt};

/// Recurring expense subcommands
#[derive(Subcommand)]
pub enum RecurringCommands {
    /// List templates in display order
    List,
    /// Add a template; new months start with a line for it
    Add {
        name: String,
        /// Default monthly amount
        amount: String,
        /// Paid automatically (direct debit, standing order)
        #[arg(long)]
        auto_paid: bool,
        /// Text to look for in transaction descriptions
        #[arg(short, long)]
        pattern: Option<String>,
        /// Upstream category used for matching
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit a template; existing months keep their lines
    Edit {
        /// Template name or ID
        template: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(long, conflicts_with = "manual")]
        auto_paid: bool,
        #[arg(long)]
        manual: bool,
        /// Match pattern; pass "" to clear
        #[arg(short, long)]
        pattern: Option<String>,
        /// Category; pass "" to clear
        #[arg(short, long)]
        category: Option<String>,
        /// Position in the display order
        #[arg(long)]
        order: Option<u32>,
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        /// Stop seeding new months from this template
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a template
    Delete {
        /// Template name or ID
        template: String,
        /// Also remove its lines from every monthly budget
        #[arg(long)]
        cascade: bool,
    },
}

fn require_template(service: &RecurringService, reference: &str) -> BudgetResult<RecurringExpense> {
    service
        .find(reference)?
        .ok_or_else(|| BudgetError::recurring_not_found(reference))
}

/// Handle a recurring expense command
pub fn handle_recurring_command(storage: &Storage, cmd: RecurringCommands) -> BudgetResult<()> {
    let service = RecurringService::new(storage);

    match cmd {
        RecurringCommands::List => {
            print!("{}", format_recurring_list(&service.list()?));
        }

        RecurringCommands::Add {
            name,
            amount,
            auto_paid,
            pattern,
            category,
        } => {
            let template = service.create(NewRecurring {
                name,
                default_amount: parse_money(&amount, "amount")?,
                is_auto_paid: auto_paid,
                match_pattern: pattern,
                category,
            })?;
            println!("Created recurring expense: {} ({})", template.name, template.default_amount);
            println!("  ID: {}", template.id);
        }

        RecurringCommands::Edit {
            template,
            name,
            amount,
            auto_paid,
            manual,
            pattern,
            category,
            order,
            active,
            inactive,
        } => {
            let target = require_template(&service, &template)?;
            let patch = RecurringPatch {
                name,
                default_amount: parse_money_opt(amount, "amount")?,
                is_auto_paid: flag_pair(auto_paid, manual),
                match_pattern: pattern,
                category,
                order_index: order,
                is_active: flag_pair(active, inactive),
            };

            if patch == RecurringPatch::default() {
                println!("No changes specified. See 'budget recurring edit --help'.");
                return Ok(());
            }

            let updated = service.update(target.id, patch)?;
            println!("Updated recurring expense: {} ({})", updated.name, updated.default_amount);
        }

        RecurringCommands::Delete { template, cascade } => {
            let target = require_template(&service, &template)?;
            let result = service.delete(target.id, cascade)?;
            println!("Deleted recurring expense '{}'.", result.template.name);
            if cascade {
                println!("Removed {} monthly line(s).", result.instances_removed);
            }
        }
    }

    Ok(())
}
