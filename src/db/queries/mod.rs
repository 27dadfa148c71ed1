pub mod categories;
pub mod expenses;
pub mod import;
pub mod monthly_budgets;
