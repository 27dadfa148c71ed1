//! Shared test utilities for integration tests.
//!
//! Provides a `TestStore` backed by a fresh in-memory database with
//! migrations applied, plus helpers for seeding categories, expenses and
//! monthly budgets. The in-memory pool holds a single connection, so the
//! seed helpers take the caller's connection instead of checking out their
//! own.

#![allow(dead_code)]

use std::path::Path;

use foyer::db::queries::{categories, expenses, monthly_budgets};
use foyer::db::{create_in_memory_pool, migrations, DbPool};
use foyer::models::{NewCategory, NewExpense, NewMonthlyBudget};
use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub const USER: &str = "test-user";

pub struct TestStore {
    pub pool: DbPool,
}

impl TestStore {
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }
        Self { pool }
    }

    pub fn conn(&self) -> PooledConnection<SqliteConnectionManager> {
        self.pool.get().expect("Failed to get connection")
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_category(conn: &Connection, name: &str, color: &str, is_hidden: bool) -> i64 {
    let new = NewCategory::new(name, color, is_hidden).expect("Invalid category");
    categories::create_category(conn, USER, &new).expect("Failed to create category")
}

pub fn add_expense(
    conn: &Connection,
    category_id: i64,
    date: &str,
    description: &str,
    cents: i64,
) -> i64 {
    let new = NewExpense::new(date, category_id, description, cents).expect("Invalid expense");
    expenses::create_expense(conn, USER, &new).expect("Failed to create expense")
}

pub fn set_budget(conn: &Connection, category_id: i64, month: &str, cents: i64) {
    let new = NewMonthlyBudget::new(category_id, month, cents).expect("Invalid budget");
    monthly_budgets::upsert_monthly_budget(conn, USER, &new).expect("Failed to upsert budget");
}
