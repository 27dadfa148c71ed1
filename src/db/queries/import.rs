use rusqlite::Connection;
use tracing::{debug, info};

use crate::db::queries::{categories, expenses, monthly_budgets};
use crate::error::AppResult;
use crate::models::{NewCategory, NewMonthlyBudget};
use crate::services::csv_import::{resolve_expenses, ParsedImport};

#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub categories_created: usize,
    pub budgets_upserted: usize,
    pub expenses_created: usize,
}

/// Commit a parsed CSV import in two phases: category rows first (creating
/// missing categories and upserting their budgets for `month`), then expense
/// rows resolved against the *updated* category set.
///
/// If expense resolution fails, the committed categories are not rolled
/// back; rollback, if wanted, is the caller's responsibility.
pub fn commit_import(
    conn: &Connection,
    user_id: &str,
    month: &str,
    parsed: &ParsedImport,
) -> AppResult<ImportOutcome> {
    let mut outcome = ImportOutcome::default();

    for row in &parsed.categories {
        let category_id = match categories::get_category_by_name(conn, user_id, &row.name)? {
            Some(existing) => existing.id,
            None => {
                let new = NewCategory::new(&row.name, &row.color, row.is_hidden)?;
                outcome.categories_created += 1;
                categories::create_category(conn, user_id, &new)?
            }
        };

        let budget = NewMonthlyBudget::new(category_id, month, row.budget_cents)?;
        monthly_budgets::upsert_monthly_budget(conn, user_id, &budget)?;
        outcome.budgets_upserted += 1;
    }

    // Expense names resolve against the category set as committed above,
    // not against the file's own category rows.
    let committed = categories::list_categories(conn, user_id)?;
    let resolved = resolve_expenses(&parsed.expenses, &committed)?;

    for expense in &resolved {
        expenses::create_expense(conn, user_id, expense)?;
        outcome.expenses_created += 1;
    }

    debug!(
        categories_created = outcome.categories_created,
        budgets_upserted = outcome.budgets_upserted,
        expenses_created = outcome.expenses_created,
        "Committed CSV import"
    );
    info!(month, user_id, "CSV import committed");

    Ok(outcome)
}
