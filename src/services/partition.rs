//! Envelope partitioner
//!
//! Splits a manual account's balance into the user's own envelopes, envelopes
//! held for someone else, and whatever is left unassigned. Mutations operate
//! on an in-memory account; callers persist the result.

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Envelope, EnvelopeId, EnvelopePatch, ManualAccount, Money, Partition};

/// Compute the ownership partition of an account's balance
///
/// `my_balance + borrowed_total + unallocated == balance` always holds.
/// Nothing is clamped: over-allocation shows up as negative `unallocated`.
pub fn compute_partition(account: &ManualAccount) -> Partition {
    let (mine, borrowed): (Vec<&Envelope>, Vec<&Envelope>) =
        account.envelopes.iter().partition(|e| e.is_mine);

    let my_balance: Money = mine.iter().map(|e| e.amount).sum();
    let borrowed_total: Money = borrowed.iter().map(|e| e.amount).sum();

    Partition {
        my_balance,
        borrowed_total,
        unallocated: account.balance - my_balance - borrowed_total,
    }
}

fn check_name(name: &str) -> BudgetResult<()> {
    if name.trim().is_empty() {
        return Err(BudgetError::Validation(
            "Envelope name cannot be empty".into(),
        ));
    }
    Ok(())
}

fn check_amount(amount: Money) -> BudgetResult<()> {
    if !amount.is_positive() {
        return Err(BudgetError::Validation(format!(
            "Envelope amount must be positive (got {})",
            amount
        )));
    }
    if !amount.is_within_limit() {
        return Err(BudgetError::Validation(format!(
            "Envelope amount exceeds the maximum of {}",
            Money::from_minor(Money::MAX_ABS_MINOR)
        )));
    }
    Ok(())
}

/// Append an envelope to the account
pub fn add_envelope(account: &mut ManualAccount, envelope: Envelope) -> BudgetResult<()> {
    check_name(&envelope.name)?;
    check_amount(envelope.amount)?;

    account.envelopes.push(envelope);
    account.touch();
    Ok(())
}

/// Apply a partial update to one envelope
///
/// Supplied fields are checked before anything is written, so a rejected
/// patch leaves the envelope as it was.
pub fn update_envelope(
    account: &mut ManualAccount,
    id: EnvelopeId,
    patch: EnvelopePatch,
) -> BudgetResult<()> {
    let envelope = account
        .envelopes
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| BudgetError::envelope_not_found(id.to_string()))?;

    if let Some(name) = &patch.name {
        check_name(name)?;
    }
    if let Some(amount) = patch.amount {
        check_amount(amount)?;
    }

    if let Some(name) = patch.name {
        envelope.name = name;
    }
    if let Some(amount) = patch.amount {
        envelope.amount = amount;
    }
    if let Some(is_mine) = patch.is_mine {
        envelope.is_mine = is_mine;
    }
    if let Some(note) = patch.note {
        envelope.note = if note.trim().is_empty() { None } else { Some(note) };
    }

    account.touch();
    Ok(())
}

/// Remove an envelope and hand it back; the account balance is unaffected
pub fn remove_envelope(account: &mut ManualAccount, id: EnvelopeId) -> BudgetResult<Envelope> {
    let index = account
        .envelopes
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| BudgetError::envelope_not_found(id.to_string()))?;

    let removed = account.envelopes.remove(index);
    account.touch();
    Ok(removed)
}

/// Flip between "mine" and "held for someone else"
pub fn toggle_ownership(envelope: &Envelope) -> Envelope {
    Envelope {
        is_mine: !envelope.is_mine,
        ..envelope.clone()
    }
}
