use std::collections::HashMap;

use tracing::{debug, warn};

use crate::date_utils::parse_iso_date;
use crate::error::{AppError, AppResult};
use crate::models::{parse_amount_cents, Category, NewExpense};
use crate::services::csv_export::{CATEGORIES_MARKER, EXPENSES_MARKER};

/// Category row parsed from the `CATEGORIES` section.
#[derive(Debug, Clone)]
pub struct ParsedCategory {
    pub name: String,
    pub budget_cents: i64,
    pub color: String,
    pub is_hidden: bool,
}

/// Expense row parsed from the `DEPENSES` section. The category is still a
/// name at this point; resolution against the target system's categories is
/// a separate step.
#[derive(Debug, Clone)]
pub struct ParsedExpense {
    pub date: String,
    pub category_name: String,
    pub description: String,
    pub amount_cents: i64,
}

#[derive(Debug, Default)]
pub struct ParsedImport {
    pub categories: Vec<ParsedCategory>,
    pub expenses: Vec<ParsedExpense>,
    /// Row-level failures: the rows were skipped, the rest of the file was
    /// still parsed.
    pub errors: Vec<String>,
}

/// Parse a sectioned CSV blob. Splits on the `CATEGORIES` / `DEPENSES`
/// marker lines, skips header rows and blank lines, and records malformed
/// rows (wrong field count, non-numeric amounts, bad dates, empty names or
/// descriptions) as row-level failures without aborting the rest of the
/// file.
///
/// This function only parses; resolving expense rows against a category set
/// and the categories-before-expenses commit ordering belong to the caller.
pub fn parse_csv(text: &str) -> AppResult<ParsedImport> {
    enum Section {
        None,
        Categories,
        Expenses,
    }

    let mut category_lines: Vec<&str> = Vec::new();
    let mut expense_lines: Vec<&str> = Vec::new();
    let mut section = Section::None;

    for line in text.lines() {
        match line.trim() {
            CATEGORIES_MARKER => section = Section::Categories,
            EXPENSES_MARKER => section = Section::Expenses,
            "" => {}
            _ => match section {
                Section::Categories => category_lines.push(line),
                Section::Expenses => expense_lines.push(line),
                Section::None => {
                    return Err(AppError::CsvParse(format!(
                        "Content before any section marker: '{}'",
                        line
                    )))
                }
            },
        }
    }

    if category_lines.is_empty() && expense_lines.is_empty() {
        return Err(AppError::CsvParse(
            "No CATEGORIES or DEPENSES section found".into(),
        ));
    }

    let mut result = ParsedImport::default();

    result.categories = for_each_record(&category_lines, &mut result.errors, |fields| {
        if fields[0].is_empty() {
            return Err("Empty category name".to_string());
        }
        let budget_cents = parse_amount_cents(fields[1])
            .map_err(|_| format!("Invalid budget '{}'", fields[1]))?;
        let is_hidden = parse_bool(fields[3])?;
        Ok(ParsedCategory {
            name: fields[0].to_string(),
            budget_cents,
            color: fields[2].to_string(),
            is_hidden,
        })
    });

    result.expenses = for_each_record(&expense_lines, &mut result.errors, |fields| {
        parse_iso_date(fields[0]).map_err(|_| format!("Invalid date '{}'", fields[0]))?;
        if fields[1].is_empty() {
            return Err("Empty category name".to_string());
        }
        if fields[2].is_empty() {
            return Err("Empty description".to_string());
        }
        let amount_cents = parse_amount_cents(fields[3])
            .map_err(|_| format!("Invalid amount '{}'", fields[3]))?;
        Ok(ParsedExpense {
            date: fields[0].to_string(),
            category_name: fields[1].to_string(),
            description: fields[2].to_string(),
            amount_cents,
        })
    });

    if !result.errors.is_empty() {
        warn!(
            error_count = result.errors.len(),
            "CSV import parsed with row-level failures"
        );
    }
    debug!(
        category_count = result.categories.len(),
        expense_count = result.expenses.len(),
        error_count = result.errors.len(),
        "CSV import parsed"
    );

    Ok(result)
}

/// Resolve parsed expense rows against the categories already present in
/// the target system. Fails the whole batch with `CategoryNotFound` if any
/// row names an unknown category; no partial expense list is produced.
pub fn resolve_expenses(
    parsed: &[ParsedExpense],
    categories: &[Category],
) -> AppResult<Vec<NewExpense>> {
    let name_to_id: HashMap<&str, i64> = categories
        .iter()
        .map(|c| (c.name.as_str(), c.id))
        .collect();

    let mut resolved = Vec::with_capacity(parsed.len());
    for row in parsed {
        let category_id = name_to_id
            .get(row.category_name.as_str())
            .copied()
            .ok_or_else(|| AppError::CategoryNotFound(row.category_name.clone()))?;
        resolved.push(NewExpense::new(
            &row.date,
            category_id,
            &row.description,
            row.amount_cents,
        )?);
    }
    Ok(resolved)
}

/// Run a section's lines through the CSV reader, enforcing exactly four
/// fields per row. The first non-blank line is the header and is skipped.
/// Malformed rows are reported through `errors` with the offending content.
fn for_each_record<T>(
    lines: &[&str],
    errors: &mut Vec<String>,
    parse_row: impl Fn(&[&str; 4]) -> Result<T, String>,
) -> Vec<T> {
    if lines.is_empty() {
        return Vec::new();
    }

    let section = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(section.as_bytes());

    let mut parsed = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Unreadable row: {}", e));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != 4 {
            errors.push(format!(
                "Row {}: expected 4 fields, got {} in '{}'",
                line,
                record.len(),
                record.iter().collect::<Vec<_>>().join(",")
            ));
            continue;
        }

        let fields: [&str; 4] = [
            record.get(0).unwrap_or("").trim(),
            record.get(1).unwrap_or("").trim(),
            record.get(2).unwrap_or("").trim(),
            record.get(3).unwrap_or("").trim(),
        ];

        match parse_row(&fields) {
            Ok(value) => parsed.push(value),
            Err(message) => errors.push(format!("Row {}: {}", line, message)),
        }
    }
    parsed
}

fn parse_bool(field: &str) -> Result<bool, String> {
    if field.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if field.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(format!("Invalid hidden flag '{}'", field))
    }
}
