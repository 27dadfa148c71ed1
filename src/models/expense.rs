use serde::{Deserialize, Serialize};

use crate::date_utils::parse_iso_date;
use crate::error::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::money::format_cents;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category_id: i64,
    pub amount_cents: i64,
    pub description: String,
    /// ISO date `YYYY-MM-DD`; the expense belongs to the month derived
    /// from this date, there is no stored month field.
    pub date: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Expense {
    pub fn amount_display(&self) -> String {
        format_cents(self.amount_cents)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub date: String,
    pub category_id: i64,
    pub description: String,
    pub amount_cents: i64,
}

impl NewExpense {
    /// Validated constructor. Rejects malformed dates, empty descriptions
    /// and negative amounts.
    pub fn new(date: &str, category_id: i64, description: &str, amount_cents: i64) -> AppResult<Self> {
        parse_iso_date(date)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::Validation("Expense description is empty".into()));
        }
        if amount_cents < 0 {
            return Err(AppError::Validation(format!(
                "Expense amount must not be negative, got {}",
                format_cents(amount_cents)
            )));
        }
        Ok(Self {
            date: date.to_string(),
            category_id,
            description: description.to_string(),
            amount_cents,
        })
    }

    /// Check that the referenced category exists in the given set.
    pub fn validate_against(&self, categories: &[Category]) -> AppResult<()> {
        if categories.iter().any(|c| c.id == self.category_id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Expense references unknown category id {}",
                self.category_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            color: "#ff0000".to_string(),
            user_id: "test".to_string(),
            is_hidden: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_new_expense_valid() {
        let exp = NewExpense::new("2024-01-15", 1, "Groceries", 15000).unwrap();
        assert_eq!(exp.date, "2024-01-15");
        assert_eq!(exp.amount_cents, 15000);
    }

    #[test]
    fn test_new_expense_rejects_bad_date() {
        assert!(NewExpense::new("15/01/2024", 1, "Groceries", 100).is_err());
        assert!(NewExpense::new("2024-02-30", 1, "Groceries", 100).is_err());
        assert!(NewExpense::new("", 1, "Groceries", 100).is_err());
    }

    #[test]
    fn test_new_expense_rejects_empty_description() {
        assert!(NewExpense::new("2024-01-15", 1, "", 100).is_err());
        assert!(NewExpense::new("2024-01-15", 1, "  ", 100).is_err());
    }

    #[test]
    fn test_new_expense_rejects_negative_amount() {
        assert!(NewExpense::new("2024-01-15", 1, "Groceries", -1).is_err());
    }

    #[test]
    fn test_validate_against_category_set() {
        let cats = vec![category(1, "Food"), category(2, "Transport")];
        let exp = NewExpense::new("2024-01-15", 2, "Bus fare", 200).unwrap();
        assert!(exp.validate_against(&cats).is_ok());

        let orphan = NewExpense::new("2024-01-15", 99, "Unknown", 200).unwrap();
        assert!(orphan.validate_against(&cats).is_err());
    }
}
