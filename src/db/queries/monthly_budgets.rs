use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::models::monthly_budget::{MonthlyBudget, NewMonthlyBudget};

fn budget_from_row(row: &rusqlite::Row) -> rusqlite::Result<MonthlyBudget> {
    Ok(MonthlyBudget {
        category_id: row.get(0)?,
        month: row.get(1)?,
        budget_cents: row.get(2)?,
        user_id: row.get(3)?,
    })
}

pub fn list_monthly_budgets(
    conn: &Connection,
    user_id: &str,
    month: &str,
) -> rusqlite::Result<Vec<MonthlyBudget>> {
    let mut stmt = conn.prepare(
        "SELECT category_id, month, budget_cents, user_id
         FROM monthly_budgets
         WHERE user_id = ? AND month = ?",
    )?;

    let budgets = stmt
        .query_map(params![user_id, month], budget_from_row)?
        .filter_map(|b| b.ok())
        .collect();

    Ok(budgets)
}

pub fn get_monthly_budget(
    conn: &Connection,
    category_id: i64,
    month: &str,
) -> rusqlite::Result<Option<MonthlyBudget>> {
    conn.query_row(
        "SELECT category_id, month, budget_cents, user_id
         FROM monthly_budgets
         WHERE category_id = ? AND month = ?",
        params![category_id, month],
        budget_from_row,
    )
    .optional()
}

/// Insert or overwrite the budget for `(category_id, month)`.
pub fn upsert_monthly_budget(
    conn: &Connection,
    user_id: &str,
    budget: &NewMonthlyBudget,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO monthly_budgets (category_id, month, budget_cents, user_id)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(category_id, month)
         DO UPDATE SET budget_cents = excluded.budget_cents,
                       updated_at = datetime('now')",
        params![budget.category_id, budget.month, budget.budget_cents, user_id],
    )?;
    debug!(
        category_id = budget.category_id,
        month = %budget.month,
        budget_cents = budget.budget_cents,
        "Upserted monthly budget"
    );
    Ok(())
}
