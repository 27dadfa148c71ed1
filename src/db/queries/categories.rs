use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::category::{Category, NewCategory};

fn category_from_row(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        user_id: row.get(3)?,
        is_hidden: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const CATEGORY_COLUMNS: &str = "id, name, color, user_id, is_hidden, created_at, updated_at";

pub fn list_categories(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM categories WHERE user_id = ? ORDER BY name",
        CATEGORY_COLUMNS
    ))?;

    let categories = stmt
        .query_map([user_id], category_from_row)?
        .filter_map(|c| c.ok())
        .collect();

    Ok(categories)
}

pub fn get_category(conn: &Connection, id: i64) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        &format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS),
        [id],
        category_from_row,
    )
    .optional()
}

pub fn get_category_by_name(
    conn: &Connection,
    user_id: &str,
    name: &str,
) -> rusqlite::Result<Option<Category>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM categories WHERE user_id = ? AND name = ?",
            CATEGORY_COLUMNS
        ),
        params![user_id, name],
        category_from_row,
    )
    .optional()
}

pub fn create_category(
    conn: &Connection,
    user_id: &str,
    category: &NewCategory,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO categories (name, color, user_id, is_hidden) VALUES (?, ?, ?, ?)",
        params![category.name, category.color, user_id, category.is_hidden],
    )?;
    let id = conn.last_insert_rowid();
    debug!(category_id = id, name = %category.name, "Created category");
    Ok(id)
}

pub fn update_category(
    conn: &Connection,
    id: i64,
    category: &NewCategory,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE categories SET name = ?, color = ?, is_hidden = ?,
         updated_at = datetime('now') WHERE id = ?",
        params![category.name, category.color, category.is_hidden, id],
    )?;
    if rows > 0 {
        debug!(category_id = id, name = %category.name, "Updated category");
    }
    Ok(rows > 0)
}

/// Delete a category. Rejected with `DependencyConflict` while any expense
/// still references it; expenses must be removed or reassigned first.
pub fn delete_category(conn: &Connection, id: i64) -> AppResult<bool> {
    let referencing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM expenses WHERE category_id = ?",
        [id],
        |row| row.get(0),
    )?;
    if referencing > 0 {
        return Err(AppError::DependencyConflict(format!(
            "Category {} still has {} expense(s)",
            id, referencing
        )));
    }

    conn.execute("DELETE FROM monthly_budgets WHERE category_id = ?", [id])?;
    let rows = conn.execute("DELETE FROM categories WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(category_id = id, "Deleted category");
    }
    Ok(rows > 0)
}
