use std::fs;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use foyer::config::Config;
use foyer::date_utils::{current_month_key, month_label};
use foyer::db::queries::{categories, expenses, import, monthly_budgets};
use foyer::db::{create_pool, migrations};
use foyer::error::AppResult;
use foyer::models::{format_cents, BudgetLookup};
use foyer::services::csv_export::{export_filename, export_to_csv};
use foyer::services::csv_import::parse_csv;
use foyer::services::summary::compute_summary;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foyer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[&str]) -> AppResult<()> {
    let config = Config::from_env();
    let pool = create_pool(&config.database_path)?;
    let conn = pool.get()?;
    migrations::run_migrations(&conn, &config.migrations_path)?;

    match args {
        ["summary"] => print_summary(&conn, &config.user_id, &current_month_key()),
        ["summary", month] => print_summary(&conn, &config.user_id, month),
        ["export"] => export(&conn, &config.user_id, &current_month_key(), None),
        ["export", month] => export(&conn, &config.user_id, month, None),
        ["export", month, file] => export(&conn, &config.user_id, month, Some(*file)),
        ["import", file] => import_file(&conn, &config.user_id, &current_month_key(), file),
        ["import", file, month] => import_file(&conn, &config.user_id, month, file),
        _ => {
            eprintln!("foyer {}", foyer::VERSION);
            eprintln!("Usage: foyer summary [YYYY-MM]");
            eprintln!("       foyer export [YYYY-MM] [FILE]");
            eprintln!("       foyer import FILE [YYYY-MM]");
            Ok(())
        }
    }
}

fn load_month(
    conn: &rusqlite::Connection,
    user_id: &str,
    month: &str,
) -> AppResult<(
    Vec<foyer::models::Category>,
    Vec<foyer::models::Expense>,
    BudgetLookup,
)> {
    let cats = categories::list_categories(conn, user_id)?;
    let exps = expenses::list_expenses(conn, user_id, month)?;
    let budgets = BudgetLookup::from_rows(&monthly_budgets::list_monthly_budgets(
        conn, user_id, month,
    )?);
    Ok((cats, exps, budgets))
}

fn print_summary(conn: &rusqlite::Connection, user_id: &str, month: &str) -> AppResult<()> {
    let (cats, exps, budgets) = load_month(conn, user_id, month)?;
    let summary = compute_summary(&cats, &exps, &budgets, month);

    println!("{}", month_label(month)?);
    println!();
    for row in &summary.categories {
        let marker = if row.is_over_budget {
            " OVER"
        } else if row.is_hidden {
            " (hidden)"
        } else {
            ""
        };
        println!(
            "  {:<20} {:>10} / {:>10}  ({:>5.1}%){}",
            row.name,
            format_cents(row.spent_cents),
            format_cents(row.budget_cents),
            row.progress_percent,
            marker
        );
    }
    println!();
    println!(
        "  Total: {} spent of {} budgeted, {} remaining ({:.0}%)",
        format_cents(summary.total_spent_cents),
        format_cents(summary.total_budget_cents),
        format_cents(summary.total_remaining_cents),
        summary.progress_percent
    );
    Ok(())
}

fn export(
    conn: &rusqlite::Connection,
    user_id: &str,
    month: &str,
    file: Option<&str>,
) -> AppResult<()> {
    let (cats, exps, budgets) = load_month(conn, user_id, month)?;
    let text = export_to_csv(&cats, &exps, &budgets, month)?;
    let path = file.map(str::to_string).unwrap_or_else(export_filename);
    fs::write(&path, text)?;
    println!("Exported {} to {}", month, path);
    Ok(())
}

fn import_file(
    conn: &rusqlite::Connection,
    user_id: &str,
    month: &str,
    file: &str,
) -> AppResult<()> {
    let text = fs::read_to_string(file)?;
    let parsed = parse_csv(&text)?;
    for error in &parsed.errors {
        eprintln!("Skipped: {}", error);
    }
    let outcome = import::commit_import(conn, user_id, month, &parsed)?;
    println!(
        "Imported {} categories, {} budgets, {} expenses into {}",
        outcome.categories_created, outcome.budgets_upserted, outcome.expenses_created, month
    );
    Ok(())
}
