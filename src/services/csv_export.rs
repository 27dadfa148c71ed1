use std::collections::HashMap;

use chrono::Local;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{format_cents, BudgetLookup, Category, Expense};

/// Section marker lines of the export format.
pub const CATEGORIES_MARKER: &str = "CATEGORIES";
pub const EXPENSES_MARKER: &str = "DEPENSES";

pub const CATEGORY_HEADERS: [&str; 4] = ["Nom", "Budget", "Couleur", "Masquée"];
pub const EXPENSE_HEADERS: [&str; 4] = ["Date", "Catégorie", "Description", "Montant"];

/// Serialize categories, expenses and the month's budgets into a single
/// sectioned CSV blob: a `CATEGORIES` section, a blank line, then a
/// `DEPENSES` section. Fields containing commas or quotes are quoted with
/// internal quotes doubled.
///
/// Expense rows carry the category *name*, which is the join key on import.
/// Two categories sharing a name are indistinguishable in the file, so
/// unique names are required for a lossless round-trip.
pub fn export_to_csv(
    categories: &[Category],
    expenses: &[Expense],
    budgets: &BudgetLookup,
    month: &str,
) -> AppResult<String> {
    let category_names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    let mut category_rows = Vec::with_capacity(categories.len());
    for category in categories {
        let budget = budgets.budget_for(category.id, month);
        category_rows.push([
            category.name.clone(),
            format_cents(budget),
            category.color.clone(),
            category.is_hidden.to_string(),
        ]);
    }

    let mut expense_rows = Vec::with_capacity(expenses.len());
    for expense in expenses {
        let name = category_names.get(&expense.category_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Category {} referenced by expense {}",
                expense.category_id, expense.id
            ))
        })?;
        expense_rows.push([
            expense.date.clone(),
            name.to_string(),
            expense.description.clone(),
            format_cents(expense.amount_cents),
        ]);
    }

    let categories_section = write_section(&CATEGORY_HEADERS, &category_rows)?;
    let expenses_section = write_section(&EXPENSE_HEADERS, &expense_rows)?;

    debug!(
        month,
        category_count = categories.len(),
        expense_count = expenses.len(),
        "Exported CSV"
    );

    Ok(format!(
        "{}\n{}\n{}\n{}",
        CATEGORIES_MARKER, categories_section, EXPENSES_MARKER, expenses_section
    ))
}

/// Download filename embedding the export date, e.g.
/// `budget_export_2024-03-15.csv`.
pub fn export_filename() -> String {
    format!(
        "budget_export_{}.csv",
        Local::now().date_naive().format("%Y-%m-%d")
    )
}

fn write_section(headers: &[&str; 4], rows: &[[String; 4]]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| AppError::CsvParse(e.to_string()))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::CsvParse(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::CsvParse(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::CsvParse(e.to_string()))
}
