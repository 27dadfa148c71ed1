use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::date_utils::parse_month_key;
use crate::error::{AppError, AppResult};
use crate::models::money::format_cents;

/// Budget ceiling for one category in one calendar month.
/// At most one row exists per `(category_id, month)`; writes are upserts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBudget {
    pub category_id: i64,
    /// Month key `YYYY-MM`.
    pub month: String,
    pub budget_cents: i64,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMonthlyBudget {
    pub category_id: i64,
    pub month: String,
    pub budget_cents: i64,
}

impl NewMonthlyBudget {
    /// Validated constructor. Rejects malformed month keys and negative budgets.
    pub fn new(category_id: i64, month: &str, budget_cents: i64) -> AppResult<Self> {
        parse_month_key(month)?;
        if budget_cents < 0 {
            return Err(AppError::Validation(format!(
                "Budget must not be negative, got {}",
                format_cents(budget_cents)
            )));
        }
        Ok(Self {
            category_id,
            month: month.to_string(),
            budget_cents,
        })
    }
}

/// Typed lookup keyed by `(category_id, month)`.
/// A category with no budget row for a month has effective budget 0.
#[derive(Debug, Default)]
pub struct BudgetLookup {
    budgets: HashMap<(i64, String), i64>,
}

impl BudgetLookup {
    pub fn from_rows(rows: &[MonthlyBudget]) -> Self {
        let budgets = rows
            .iter()
            .map(|b| ((b.category_id, b.month.clone()), b.budget_cents))
            .collect();
        Self { budgets }
    }

    pub fn budget_for(&self, category_id: i64, month: &str) -> i64 {
        self.budgets
            .get(&(category_id, month.to_string()))
            .copied()
            .unwrap_or(0)
    }
}
