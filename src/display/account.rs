//! Manual account display formatting
//!
//! Formats manual accounts and their envelope partitions in table and detail
//! views.

use crate::context::AccountsSnapshot;
use crate::services::AccountSummary;

/// Format all accounts of a snapshot as a table, with per-currency totals
pub fn format_account_list(snapshot: &AccountsSnapshot) -> String {
    if snapshot.accounts.is_empty() {
        return "No manual accounts found.".to_string();
    }

    let name_width = snapshot
        .accounts
        .iter()
        .map(|s| s.account.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>14}\n",
        "Name",
        "Balance",
        "Mine",
        "Borrowed",
        "Unallocated",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}  {:->14}  {:->14}  {:->14}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for summary in &snapshot.accounts {
        let currency = &summary.account.currency;
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>14}\n",
            summary.account.name,
            summary.account.balance.format_with_currency(currency),
            summary.partition.my_balance.format_with_currency(currency),
            summary.partition.borrowed_total.format_with_currency(currency),
            summary.partition.unallocated.format_with_currency(currency),
            name_width = name_width,
        ));
    }

    for (currency, totals) in &snapshot.totals {
        output.push_str(&format!(
            "{:<name_width$}  {:>14}  {:>14}  {:>14}  {:>14}\n",
            format!("TOTAL {}", currency),
            totals.balance.format_with_currency(currency),
            totals.my_balance.format_with_currency(currency),
            totals.borrowed_total.format_with_currency(currency),
            totals.unallocated.format_with_currency(currency),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single account with its envelopes
pub fn format_account_details(summary: &AccountSummary) -> String {
    let account = &summary.account;
    let partition = &summary.partition;
    let currency = account.currency.as_str();

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:             {}\n", account.id));
    if let Some(number) = &account.account_number {
        output.push_str(&format!("  Number:         {}\n", number));
    }
    output.push_str(&format!(
        "  Visible:        {}\n",
        if account.is_visible { "Yes" } else { "No" }
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Balance:        {}\n",
        account.balance.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Mine:           {}\n",
        partition.my_balance.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Borrowed:       {}\n",
        partition.borrowed_total.format_with_currency(currency)
    ));
    output.push_str(&format!(
        "  Unallocated:    {}{}\n",
        partition.unallocated.format_with_currency(currency),
        if partition.is_over_allocated() { "  OVER-ALLOCATED" } else { "" }
    ));

    output.push('\n');
    if account.envelopes.is_empty() {
        output.push_str("  No envelopes.\n");
    } else {
        output.push_str("  Envelopes:\n");
        for envelope in &account.envelopes {
            let owner = if envelope.is_mine { "mine" } else { "borrowed" };
            output.push_str(&format!(
                "    {:<12}  {:<20}  {:>12}  {:<8}  {}\n",
                envelope.id.to_string(),
                envelope.name,
                envelope.amount,
                owner,
                envelope.note.as_deref().unwrap_or(""),
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "  Modified: {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
