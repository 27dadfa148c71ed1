use std::collections::HashMap;

use tracing::debug;

use crate::date_utils::month_key_of;
use crate::models::{BudgetLookup, Category, Expense};

#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    pub is_hidden: bool,
    pub budget_cents: i64,
    pub spent_cents: i64,
    pub remaining_cents: i64,
    pub is_over_budget: bool,
    /// Capped at 100 for display; raw spent/budget figures are kept
    /// alongside so the uncapped ratio stays derivable.
    pub progress_percent: f64,
    pub expense_count: usize,
}

#[derive(Debug, Clone)]
pub struct MonthSummary {
    pub month: String,
    /// All categories, hidden ones included and flagged. Sorted by name.
    pub categories: Vec<CategorySummary>,
    /// Totals over visible categories only.
    pub total_budget_cents: i64,
    pub total_spent_cents: i64,
    pub total_remaining_cents: i64,
    pub progress_percent: f64,
}

/// Join categories, expenses and monthly budgets into the spent/remaining
/// state for one month. Pure function: always recomputes from the snapshot
/// passed in, nothing is cached.
///
/// Expenses are attributed to a month by their date. Hidden categories keep
/// their own row in the listing but are excluded from the global totals.
pub fn compute_summary(
    categories: &[Category],
    expenses: &[Expense],
    budgets: &BudgetLookup,
    month: &str,
) -> MonthSummary {
    let mut spent_by_category: HashMap<i64, (i64, usize)> = HashMap::new();
    for expense in expenses {
        let in_month = month_key_of(&expense.date)
            .map(|key| key == month)
            .unwrap_or(false);
        if !in_month {
            continue;
        }
        let entry = spent_by_category.entry(expense.category_id).or_insert((0, 0));
        entry.0 += expense.amount_cents;
        entry.1 += 1;
    }

    let mut rows: Vec<CategorySummary> = categories
        .iter()
        .map(|category| {
            let budget_cents = budgets.budget_for(category.id, month);
            let (spent_cents, expense_count) = spent_by_category
                .get(&category.id)
                .copied()
                .unwrap_or((0, 0));
            CategorySummary {
                category_id: category.id,
                name: category.name.clone(),
                color: category.color.clone(),
                is_hidden: category.is_hidden,
                budget_cents,
                spent_cents,
                remaining_cents: budget_cents - spent_cents,
                is_over_budget: spent_cents > budget_cents,
                progress_percent: progress_percent(spent_cents, budget_cents),
                expense_count,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let visible = rows.iter().filter(|r| !r.is_hidden);
    let (total_budget_cents, total_spent_cents) = visible.fold((0, 0), |(budget, spent), row| {
        (budget + row.budget_cents, spent + row.spent_cents)
    });

    debug!(
        month,
        category_count = rows.len(),
        total_spent_cents,
        "Computed month summary"
    );

    // The global gauge reads 0 when the month has no budget at all, even
    // with spending recorded; only category rows pin that case to 100.
    let global_progress = if total_budget_cents > 0 {
        progress_percent(total_spent_cents, total_budget_cents)
    } else {
        0.0
    };

    MonthSummary {
        month: month.to_string(),
        categories: rows,
        total_budget_cents,
        total_spent_cents,
        total_remaining_cents: total_budget_cents - total_spent_cents,
        progress_percent: global_progress,
    }
}

/// Per-category spent-over-budget percentage, capped at 100. A zero budget
/// yields 0 for zero spend and 100 for any positive spend; never NaN or
/// infinity.
fn progress_percent(spent_cents: i64, budget_cents: i64) -> f64 {
    if budget_cents > 0 {
        ((spent_cents as f64 / budget_cents as f64) * 100.0).min(100.0)
    } else if spent_cents > 0 {
        100.0
    } else {
        0.0
    }
}
