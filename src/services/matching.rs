//! Transaction matching
//!
//! Links unpaid expense lines of a month to outgoing bank transactions of the
//! same month. Three strategies are tried per expense, in order: the template's
//! description pattern, a close amount, and the template's category with a
//! wider amount tolerance. A match records the transaction id only; marking
//! the expense paid stays a separate user action.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::MatchingSettings;
use crate::models::{
    Money, MonthlyBudget, RecurringExpense, RecurringExpenseId, Transaction, TransactionId,
    TransactionKind,
};

use super::transfer::{classify, TransferRules};

/// Number of expenses linked by each strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub by_pattern: usize,
    pub by_amount: usize,
    pub by_category: usize,
}

impl MatchReport {
    pub fn total(&self) -> usize {
        self.by_pattern + self.by_amount + self.by_category
    }
}

/// Template lookups, keyed by id and by lowercased name
///
/// The name maps only hold templates that carry a usable pattern or
/// category, so a same-named template without one never hides another.
struct TemplateIndex<'a> {
    by_id: HashMap<RecurringExpenseId, &'a RecurringExpense>,
    pattern_by_name: HashMap<String, String>,
    category_by_name: HashMap<String, &'a str>,
}

fn pattern_of(template: &RecurringExpense) -> Option<String> {
    template
        .match_pattern
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase)
}

impl<'a> TemplateIndex<'a> {
    fn new(templates: &'a [RecurringExpense]) -> Self {
        let mut pattern_by_name = HashMap::new();
        let mut category_by_name = HashMap::new();
        for t in templates {
            let key = t.name.to_lowercase();
            if let Some(pattern) = pattern_of(t) {
                pattern_by_name.entry(key.clone()).or_insert(pattern);
            }
            if let Some(category) = t.category.as_deref().filter(|c| !c.trim().is_empty()) {
                category_by_name.entry(key).or_insert(category);
            }
        }
        Self {
            by_id: templates.iter().map(|t| (t.id, t)).collect(),
            pattern_by_name,
            category_by_name,
        }
    }

    /// Pattern from the linked template, falling back to a same-named one
    fn pattern_for(&self, template_id: Option<RecurringExpenseId>, name: &str) -> Option<String> {
        template_id
            .and_then(|id| self.by_id.get(&id))
            .and_then(|t| pattern_of(t))
            .or_else(|| self.pattern_by_name.get(&name.to_lowercase()).cloned())
    }

    fn category_for(&self, name: &str) -> Option<&'a str> {
        self.category_by_name.get(&name.to_lowercase()).copied()
    }
}

/// Whether `actual` is within `pct` percent of `expected`
fn within_tolerance(actual: Money, expected: Money, pct: u32) -> bool {
    let diff = (i128::from(actual.minor()) - i128::from(expected.minor())).abs();
    diff * 100 <= i128::from(expected.abs().minor()) * i128::from(pct)
}

/// Link expenses of `budget` to transactions
///
/// Candidates are outgoing transactions dated within the budget's month that
/// are not internal transfers and are not already linked to another expense
/// of this budget. Paid or already matched expenses are left alone, and each
/// transaction is used at most once.
pub fn match_transactions(
    budget: &mut MonthlyBudget,
    templates: &[RecurringExpense],
    transactions: &[Transaction],
    rules: &TransferRules,
    settings: &MatchingSettings,
) -> MatchReport {
    let mut used: HashSet<TransactionId> = budget
        .expenses
        .iter()
        .filter_map(|e| e.matched_transaction_id.clone())
        .collect();

    let candidates: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| budget.year_month.contains(t.date))
        .filter(|t| t.is_outflow())
        .filter(|t| classify(t, rules) != TransactionKind::InternalTransfer)
        .collect();

    let index = TemplateIndex::new(templates);
    let mut report = MatchReport::default();

    for expense in budget.expenses.iter_mut() {
        if expense.is_paid || expense.is_matched() {
            continue;
        }

        let mut available = candidates.iter().filter(|t| !used.contains(&t.id));

        let by_pattern = index
            .pattern_for(expense.recurring_expense_id, &expense.name)
            .and_then(|pattern| {
                available
                    .clone()
                    .find(|t| t.description.to_lowercase().contains(&pattern))
            });
        if let Some(tx) = by_pattern {
            expense.matched_transaction_id = Some(tx.id.clone());
            used.insert(tx.id.clone());
            report.by_pattern += 1;
            continue;
        }

        let by_amount = available.clone().find(|t| {
            within_tolerance(t.amount.abs(), expense.amount, settings.amount_tolerance_pct)
        });
        if let Some(tx) = by_amount {
            expense.matched_transaction_id = Some(tx.id.clone());
            used.insert(tx.id.clone());
            report.by_amount += 1;
            continue;
        }

        let by_category = index.category_for(&expense.name).and_then(|category| {
            available.find(|t| {
                t.category.as_deref() == Some(category)
                    && within_tolerance(
                        t.amount.abs(),
                        expense.amount,
                        settings.category_tolerance_pct,
                    )
            })
        });
        if let Some(tx) = by_category {
            expense.matched_transaction_id = Some(tx.id.clone());
            used.insert(tx.id.clone());
            report.by_category += 1;
        }
    }

    if report.total() > 0 {
        budget.touch();
    }
    report
}
