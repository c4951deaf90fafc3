// Sales reporting CLI
//
// Usage:
//   sales-reports import <csv-path>
//   sales-reports report [--desc] [--sort-key <column>] [--csv | --json]
//
// The database location comes from SALES_DB (default: ./sales.db).

use anyhow::{bail, Result};
use std::env;
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use sales_reports::{
    fetch_sales_summary, insert_sales, load_sales_csv, open_database, setup_database,
    verify_count, AverageSalesByEmployee, DataTable, DbConfig, ProductSalesByEmployee,
    ReportBuilder, TotalSalesByEmployee, COL_EMPLOYEE_NAME,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = DbConfig::from_env();
    let args: Vec<String> = env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("import") => run_import(&config, &args[1..]),
        Some("report") => run_report(&config, &args[1..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sales-reports import <csv-path>");
    eprintln!("  sales-reports report [--desc] [--sort-key <column>] [--csv | --json]");
}

// ============================================================================
// IMPORT MODE
// ============================================================================

fn run_import(config: &DbConfig, args: &[String]) -> Result<()> {
    let Some(csv_path) = args.first() else {
        bail!("import requires a CSV path");
    };

    println!("Loading CSV...");
    let records = load_sales_csv(Path::new(csv_path))?;
    println!("✓ Loaded {} sales records", records.len());

    println!("Setting up database at {}...", config.path.display());
    let conn = open_database(config)?;
    setup_database(&conn)?;

    println!("Inserting sales...");
    let inserted = insert_sales(&conn, &records)?;
    let total = verify_count(&conn)?;

    println!(
        "✓ Inserted {} new sales ({} duplicates skipped), {} total in database",
        inserted,
        records.len() - inserted,
        total
    );
    Ok(())
}

// ============================================================================
// REPORT MODE
// ============================================================================

enum OutputFormat {
    Text,
    Csv,
    Json,
}

fn run_report(config: &DbConfig, args: &[String]) -> Result<()> {
    let mut ascending = true;
    let mut sort_key = COL_EMPLOYEE_NAME.to_string();
    let mut format = OutputFormat::Text;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--desc" => ascending = false,
            "--sort-key" => match iter.next() {
                Some(key) => sort_key = key.clone(),
                None => bail!("--sort-key requires a column name"),
            },
            "--csv" => format = OutputFormat::Csv,
            "--json" => format = OutputFormat::Json,
            other => bail!("unknown report option '{}'", other),
        }
    }

    let conn = open_database(config)?;
    let summary = fetch_sales_summary(&conn)?;

    let mut builder = ReportBuilder::new();
    builder
        .set_source(summary)
        .set_combined_sort(&sort_key, ascending);
    builder.register(Box::new(TotalSalesByEmployee))?;
    builder.register(Box::new(AverageSalesByEmployee))?;
    builder.register(Box::new(ProductSalesByEmployee))?;

    let reports = builder.build()?;

    for (name, report) in &reports {
        match format {
            OutputFormat::Text => {
                println!("\n=== {} ===", name);
                print_text_table(report);
            }
            OutputFormat::Csv => {
                println!("# {}", name);
                write_csv(report)?;
            }
            OutputFormat::Json => {
                println!("\"{}\":", name);
                println!("{}", serde_json::to_string_pretty(report)?);
            }
        }
    }
    Ok(())
}

fn print_text_table(table: &DataTable) {
    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.len()).collect();
    for row in table.rows() {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.to_string().len());
        }
    }

    for (i, column) in table.columns().iter().enumerate() {
        print!("{:<width$}  ", column, width = widths[i]);
    }
    println!();
    for (_, width) in table.columns().iter().zip(&widths) {
        print!("{}  ", "-".repeat(*width));
    }
    println!();
    for row in table.rows() {
        for (i, cell) in row.iter().enumerate() {
            print!("{:<width$}  ", cell.to_string(), width = widths[i]);
        }
        println!();
    }
}

fn write_csv(table: &DataTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
