//! Integration tests for the CSV codec: lossless round-trips through the
//! sectioned format and the two-phase import commit.

mod common;

use common::{add_expense, create_category, set_budget, TestStore, USER};
use foyer::db::queries::{categories, expenses, import, monthly_budgets};
use foyer::error::AppError;
use foyer::models::BudgetLookup;
use foyer::services::csv_export::export_to_csv;
use foyer::services::csv_import::parse_csv;
use rusqlite::Connection;

fn export_month(conn: &Connection, month: &str) -> String {
    let cats = categories::list_categories(conn, USER).unwrap();
    let exps = expenses::list_expenses(conn, USER, month).unwrap();
    let budgets =
        BudgetLookup::from_rows(&monthly_budgets::list_monthly_budgets(conn, USER, month).unwrap());
    export_to_csv(&cats, &exps, &budgets, month).unwrap()
}

#[test]
fn test_round_trip_reconstructs_everything() {
    let source = TestStore::new();
    let source_conn = source.conn();
    let food = create_category(&source_conn, "Food, drinks", "#ff0000", false);
    let secret = create_category(&source_conn, "Secret", "#00ff00", true);
    set_budget(&source_conn, food, "2024-03", 40000);
    set_budget(&source_conn, secret, "2024-03", 5000);
    add_expense(&source_conn, food, "2024-03-02", "The \"best\" bakery", 2550);
    add_expense(&source_conn, secret, "2024-03-10", "Gift", 1000);

    let text = export_month(&source_conn, "2024-03");

    // Import into a fresh system
    let target = TestStore::new();
    let conn = target.conn();
    let parsed = parse_csv(&text).unwrap();
    assert!(parsed.errors.is_empty());

    let outcome = import::commit_import(&conn, USER, "2024-03", &parsed).unwrap();
    assert_eq!(outcome.categories_created, 2);
    assert_eq!(outcome.budgets_upserted, 2);
    assert_eq!(outcome.expenses_created, 2);

    let cats = categories::list_categories(&conn, USER).unwrap();
    assert_eq!(cats.len(), 2);
    let food_cat = cats.iter().find(|c| c.name == "Food, drinks").unwrap();
    assert_eq!(food_cat.color, "#ff0000");
    assert!(!food_cat.is_hidden);
    let secret_cat = cats.iter().find(|c| c.name == "Secret").unwrap();
    assert!(secret_cat.is_hidden);

    let budget = monthly_budgets::get_monthly_budget(&conn, food_cat.id, "2024-03")
        .unwrap()
        .unwrap();
    assert_eq!(budget.budget_cents, 40000);

    let exps = expenses::list_expenses(&conn, USER, "2024-03").unwrap();
    assert_eq!(exps.len(), 2);
    let bakery = exps
        .iter()
        .find(|e| e.description == "The \"best\" bakery")
        .unwrap();
    assert_eq!(bakery.date, "2024-03-02");
    assert_eq!(bakery.amount_cents, 2550);
    assert_eq!(bakery.category_id, food_cat.id);
}

#[test]
fn test_double_round_trip_is_stable() {
    let store = TestStore::new();
    let conn = store.conn();
    let food = create_category(&conn, "Food", "#ff0000", false);
    set_budget(&conn, food, "2024-03", 40000);
    add_expense(&conn, food, "2024-03-02", "Groceries", 15000);

    let first = export_month(&conn, "2024-03");

    let copy = TestStore::new();
    let copy_conn = copy.conn();
    let parsed = parse_csv(&first).unwrap();
    import::commit_import(&copy_conn, USER, "2024-03", &parsed).unwrap();

    let second = export_month(&copy_conn, "2024-03");
    assert_eq!(first, second);
}

#[test]
fn test_import_unknown_category_imports_zero_expenses() {
    let store = TestStore::new();
    let conn = store.conn();
    create_category(&conn, "Food", "#ff0000", false);

    // "Voyages" exists neither in the store nor in the file's own rows
    let text = "CATEGORIES\n\
        Nom,Budget,Couleur,Masquée\n\
        Food,400.00,#ff0000,false\n\
        \n\
        DEPENSES\n\
        Date,Catégorie,Description,Montant\n\
        2024-03-02,Food,Groceries,150.00\n\
        2024-03-05,Voyages,Train ticket,80.00\n";

    let parsed = parse_csv(text).unwrap();
    let err = import::commit_import(&conn, USER, "2024-03", &parsed).unwrap_err();
    match err {
        AppError::CategoryNotFound(name) => assert_eq!(name, "Voyages"),
        other => panic!("Expected CategoryNotFound, got {:?}", other),
    }

    // Zero expenses were imported from this file
    assert!(expenses::list_expenses(&conn, USER, "2024-03").unwrap().is_empty());
}

#[test]
fn test_failed_expense_phase_keeps_committed_categories() {
    let store = TestStore::new();
    let conn = store.conn();

    let text = "CATEGORIES\n\
        Nom,Budget,Couleur,Masquée\n\
        Food,400.00,#ff0000,false\n\
        \n\
        DEPENSES\n\
        Date,Catégorie,Description,Montant\n\
        2024-03-05,Voyages,Train ticket,80.00\n";

    let parsed = parse_csv(text).unwrap();
    assert!(import::commit_import(&conn, USER, "2024-03", &parsed).is_err());

    // Phase one committed and is not rolled back by the core
    let cats = categories::list_categories(&conn, USER).unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Food");
    let budget = monthly_budgets::get_monthly_budget(&conn, cats[0].id, "2024-03")
        .unwrap()
        .unwrap();
    assert_eq!(budget.budget_cents, 40000);
}

#[test]
fn test_expenses_resolve_against_file_categories_after_phase_one() {
    // The file defines a category that is new to the target system; its
    // expenses become resolvable once phase one has committed it.
    let store = TestStore::new();
    let conn = store.conn();

    let text = "CATEGORIES\n\
        Nom,Budget,Couleur,Masquée\n\
        Loisirs,120.00,#0000ff,false\n\
        \n\
        DEPENSES\n\
        Date,Catégorie,Description,Montant\n\
        2024-03-09,Loisirs,Cinema,12.50\n";

    let parsed = parse_csv(text).unwrap();
    let outcome = import::commit_import(&conn, USER, "2024-03", &parsed).unwrap();
    assert_eq!(outcome.categories_created, 1);
    assert_eq!(outcome.expenses_created, 1);
}

#[test]
fn test_import_existing_category_updates_budget_only() {
    let store = TestStore::new();
    let conn = store.conn();
    let food = create_category(&conn, "Food", "#ff0000", false);
    set_budget(&conn, food, "2024-03", 10000);

    let text = "CATEGORIES\n\
        Nom,Budget,Couleur,Masquée\n\
        Food,400.00,#123456,true\n\
        \n\
        DEPENSES\n\
        Date,Catégorie,Description,Montant\n";

    let parsed = parse_csv(text).unwrap();
    let outcome = import::commit_import(&conn, USER, "2024-03", &parsed).unwrap();
    assert_eq!(outcome.categories_created, 0);
    assert_eq!(outcome.budgets_upserted, 1);

    // The upsert overwrote the budget; the existing category row kept its
    // own color and visibility.
    let budget = monthly_budgets::get_monthly_budget(&conn, food, "2024-03")
        .unwrap()
        .unwrap();
    assert_eq!(budget.budget_cents, 40000);
    let cat = categories::get_category(&conn, food).unwrap().unwrap();
    assert_eq!(cat.color, "#ff0000");
    assert!(!cat.is_hidden);
}

#[test]
fn test_malformed_rows_recovered_and_reported() {
    let store = TestStore::new();
    let conn = store.conn();

    let text = "CATEGORIES\n\
        Nom,Budget,Couleur,Masquée\n\
        Food,400.00,#ff0000,false\n\
        Broken,not-a-number,#ff0000,false\n\
        \n\
        DEPENSES\n\
        Date,Catégorie,Description,Montant\n\
        2024-03-02,Food,Groceries,150.00\n\
        2024-03-03,Food,Missing amount\n";

    let parsed = parse_csv(text).unwrap();
    assert_eq!(parsed.errors.len(), 2);

    let outcome = import::commit_import(&conn, USER, "2024-03", &parsed).unwrap();
    assert_eq!(outcome.categories_created, 1);
    assert_eq!(outcome.expenses_created, 1);
}
