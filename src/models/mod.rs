pub mod category;
pub mod expense;
pub mod money;
pub mod monthly_budget;

pub use category::{Category, NewCategory};
pub use expense::{Expense, NewExpense};
pub use money::{format_cents, parse_amount_cents};
pub use monthly_budget::{BudgetLookup, MonthlyBudget, NewMonthlyBudget};
