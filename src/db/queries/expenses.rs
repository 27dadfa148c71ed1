use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::date_utils::month_bounds;
use crate::error::AppResult;
use crate::models::expense::{Expense, NewExpense};

fn expense_from_row(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        category_id: row.get(1)?,
        amount_cents: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        user_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const EXPENSE_COLUMNS: &str =
    "id, category_id, amount_cents, description, date, user_id, created_at, updated_at";

/// List one month's expenses for a user, newest first. The window is the
/// month's first and last calendar dates.
pub fn list_expenses(conn: &Connection, user_id: &str, month: &str) -> AppResult<Vec<Expense>> {
    let (start, end) = month_bounds(month)?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses
         WHERE user_id = ? AND date >= ? AND date <= ?
         ORDER BY date DESC, id DESC",
        EXPENSE_COLUMNS
    ))?;

    let expenses = stmt
        .query_map(params![user_id, start, end], expense_from_row)?
        .filter_map(|e| e.ok())
        .collect();

    Ok(expenses)
}

pub fn get_expense(conn: &Connection, id: i64) -> rusqlite::Result<Option<Expense>> {
    conn.query_row(
        &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
        [id],
        expense_from_row,
    )
    .optional()
}

pub fn create_expense(
    conn: &Connection,
    user_id: &str,
    expense: &NewExpense,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO expenses (category_id, amount_cents, description, date, user_id)
         VALUES (?, ?, ?, ?, ?)",
        params![
            expense.category_id,
            expense.amount_cents,
            expense.description,
            expense.date,
            user_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(expense_id = id, date = %expense.date, "Created expense");
    Ok(id)
}

pub fn update_expense(conn: &Connection, id: i64, expense: &NewExpense) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE expenses SET category_id = ?, amount_cents = ?, description = ?, date = ?,
         updated_at = datetime('now') WHERE id = ?",
        params![
            expense.category_id,
            expense.amount_cents,
            expense.description,
            expense.date,
            id
        ],
    )?;
    if rows > 0 {
        debug!(expense_id = id, "Updated expense");
    }
    Ok(rows > 0)
}

/// Delete an expense. No cascade effects on the category.
pub fn delete_expense(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM expenses WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(expense_id = id, "Deleted expense");
    }
    Ok(rows > 0)
}
