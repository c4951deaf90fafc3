// Database layer - sales schema, CSV import, and the summary queries
//
// One configuration object is built at process startup and passed to
// whatever opens the connection; no hidden process-wide handle.

use crate::entities::{Category, City, Country, Customer, Employee, Product, Sale};
use crate::summary::{CustomerLocationInfo, SalesRecord};
use crate::table::DataTable;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Where the database lives.
///
/// Read once from the environment (or given explicitly), then passed to
/// every component that issues queries.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig { path: path.into() }
    }

    /// `SALES_DB` from the environment, defaulting to `sales.db` in the
    /// working directory.
    pub fn from_env() -> Self {
        let path = env::var("SALES_DB").unwrap_or_else(|_| "sales.db".to_string());
        DbConfig { path: path.into() }
    }
}

pub fn open_database(config: &DbConfig) -> Result<Connection> {
    let conn = Connection::open(&config.path)
        .with_context(|| format!("failed to open database at {}", config.path.display()))?;
    Ok(conn)
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS countries (
            CountryID INTEGER PRIMARY KEY,
            CountryName TEXT NOT NULL,
            CountryCode TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS cities (
            CityID INTEGER PRIMARY KEY,
            CityName TEXT NOT NULL,
            CountryID INTEGER NOT NULL REFERENCES countries(CountryID)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            CategoryID INTEGER PRIMARY KEY,
            CategoryName TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            ProductID INTEGER PRIMARY KEY,
            ProductName TEXT NOT NULL,
            Price REAL NOT NULL DEFAULT 0,
            CategoryID INTEGER REFERENCES categories(CategoryID),
            Class TEXT,
            ModifyDate TEXT,
            Resistant TEXT,
            IsAllergic INTEGER NOT NULL DEFAULT 0,
            VitalityDays INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            CustomerID INTEGER PRIMARY KEY,
            FirstName TEXT NOT NULL,
            MiddleInitial TEXT,
            LastName TEXT NOT NULL,
            CityID INTEGER REFERENCES cities(CityID),
            Address TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS employees (
            EmployeeID INTEGER PRIMARY KEY,
            FirstName TEXT NOT NULL,
            MiddleInitial TEXT,
            LastName TEXT NOT NULL,
            BirthDate TEXT,
            Gender TEXT,
            CityID INTEGER REFERENCES cities(CityID),
            HireDate TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sales (
            SalesID INTEGER PRIMARY KEY,
            SalesPersonID INTEGER NOT NULL REFERENCES employees(EmployeeID),
            CustomerID INTEGER NOT NULL REFERENCES customers(CustomerID),
            ProductID INTEGER NOT NULL REFERENCES products(ProductID),
            Quantity INTEGER NOT NULL,
            Discount REAL NOT NULL DEFAULT 0,
            TotalPrice REAL NOT NULL,
            SalesDate TEXT,
            TransactionNumber TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sales_salesperson ON sales(SalesPersonID)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sales_customer ON sales(CustomerID)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sales_product ON sales(ProductID)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CSV IMPORT
// ============================================================================

pub fn load_sales_csv(csv_path: &Path) -> Result<Vec<SalesRecord>> {
    let mut reader = csv::Reader::from_path(csv_path).context("failed to open CSV file")?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: SalesRecord = result.context("failed to deserialize sales record")?;
        records.push(record);
    }

    debug!(records = records.len(), "loaded sales CSV");
    Ok(records)
}

/// Insert flat sales records, creating the referenced product, customer,
/// and employee rows as needed. Idempotent on `SalesID`; returns how many
/// sales were newly inserted.
pub fn insert_sales(conn: &Connection, records: &[SalesRecord]) -> Result<usize> {
    let mut product_stmt = conn.prepare(
        "INSERT OR IGNORE INTO products (ProductID, ProductName) VALUES (?1, ?2)",
    )?;
    let mut customer_stmt = conn.prepare(
        "INSERT OR IGNORE INTO customers (CustomerID, FirstName, LastName) VALUES (?1, ?2, ?3)",
    )?;
    let mut employee_stmt = conn.prepare(
        "INSERT OR IGNORE INTO employees (EmployeeID, FirstName, LastName) VALUES (?1, ?2, ?3)",
    )?;
    let mut sale_stmt = conn.prepare(
        "INSERT OR IGNORE INTO sales
            (SalesID, SalesPersonID, CustomerID, ProductID, Quantity, TotalPrice)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    let mut inserted = 0;
    let mut duplicates = 0;

    for record in records {
        // Referenced rows first so the sale's foreign keys resolve.
        product_stmt.execute(params![record.product_id, record.product_name])?;

        let (first, last) = split_display_name(&record.customer_name);
        customer_stmt.execute(params![record.customer_id, first, last])?;

        let (first, last) = split_display_name(&record.employee_name);
        employee_stmt.execute(params![record.employee_id, first, last])?;

        let changed = sale_stmt.execute(params![
            record.sale_id,
            record.employee_id,
            record.customer_id,
            record.product_id,
            record.quantity,
            record.total_price,
        ])?;
        if changed == 0 {
            duplicates += 1;
        } else {
            inserted += 1;
        }
    }

    info!(inserted, duplicates, "sales import finished");
    Ok(inserted)
}

// Flat exports carry one display-name field; keep the first token as the
// first name and the rest as the last name.
fn split_display_name(name: &str) -> (String, String) {
    match name.trim().split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))?;
    Ok(count)
}

// ============================================================================
// SUMMARY QUERIES
// ============================================================================

/// Display-name expression used by the summary queries; skips the middle
/// initial when absent and trims the empty-last-name case.
const NAME_EXPR: &str = "TRIM({a}.FirstName
    || CASE WHEN {a}.MiddleInitial IS NULL OR {a}.MiddleInitial = ''
            THEN '' ELSE ' ' || {a}.MiddleInitial || '.' END
    || ' ' || {a}.LastName)";

fn name_expr(alias: &str) -> String {
    NAME_EXPR.replace("{a}", alias)
}

/// The flat sales summary: every sale joined with its product, customer,
/// and selling employee. This is the tabular source the report strategies
/// consume.
pub fn fetch_sales_summary(conn: &Connection) -> Result<DataTable> {
    let sql = format!(
        "SELECT s.SalesID,
                s.ProductID,
                p.ProductName,
                s.Quantity,
                s.TotalPrice,
                s.CustomerID,
                COALESCE({customer_name}, 'Unknown') AS CustomerName,
                s.SalesPersonID AS EmployeeID,
                {employee_name} AS EmployeeName
         FROM sales s
         JOIN products p ON s.ProductID = p.ProductID
         JOIN customers c ON s.CustomerID = c.CustomerID
         JOIN employees e ON s.SalesPersonID = e.EmployeeID
         ORDER BY s.SalesID",
        customer_name = name_expr("c"),
        employee_name = name_expr("e"),
    );

    let mut stmt = conn.prepare(&sql)?;
    let records: Vec<SalesRecord> = stmt
        .query_map([], |row| SalesRecord::from_row(row))?
        .collect::<rusqlite::Result<_>>()
        .context("failed to read sales summary")?;

    debug!(rows = records.len(), "fetched sales summary");
    Ok(SalesRecord::to_table(&records))
}

/// Customers joined with their city and country.
pub fn fetch_customer_locations(conn: &Connection) -> Result<Vec<CustomerLocationInfo>> {
    let mut stmt = conn.prepare(
        "SELECT c.CustomerID,
                c.FirstName,
                c.MiddleInitial,
                c.LastName,
                COALESCE(c.Address, '') AS Address,
                ci.CityName,
                co.CountryName
         FROM customers c
         JOIN cities ci ON c.CityID = ci.CityID
         JOIN countries co ON ci.CountryID = co.CountryID
         ORDER BY c.CustomerID",
    )?;
    let locations = stmt
        .query_map([], |row| CustomerLocationInfo::from_row(row))?
        .collect::<rusqlite::Result<_>>()
        .context("failed to read customer locations")?;
    Ok(locations)
}

// ============================================================================
// ENTITY ACCESS
// ============================================================================

pub fn insert_country(conn: &Connection, country: &Country) -> Result<()> {
    conn.execute(
        "INSERT INTO countries (CountryID, CountryName, CountryCode) VALUES (?1, ?2, ?3)",
        params![country.country_id, country.country_name, country.country_code],
    )?;
    Ok(())
}

pub fn insert_city(conn: &Connection, city: &City) -> Result<()> {
    conn.execute(
        "INSERT INTO cities (CityID, CityName, CountryID) VALUES (?1, ?2, ?3)",
        params![city.city_id, city.city_name, city.country_id],
    )?;
    Ok(())
}

pub fn insert_category(conn: &Connection, category: &Category) -> Result<()> {
    conn.execute(
        "INSERT INTO categories (CategoryID, CategoryName) VALUES (?1, ?2)",
        params![category.category_id, category.category_name],
    )?;
    Ok(())
}

pub fn insert_product(conn: &Connection, product: &Product) -> Result<()> {
    conn.execute(
        "INSERT INTO products
            (ProductID, ProductName, Price, CategoryID, Class, ModifyDate,
             Resistant, IsAllergic, VitalityDays)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            product.product_id,
            product.product_name,
            product.price,
            product.category_id,
            product.prod_class,
            product.modify_date,
            product.resistant,
            product.is_allergic,
            product.vitality_days,
        ],
    )?;
    Ok(())
}

pub fn insert_customer(conn: &Connection, customer: &Customer) -> Result<()> {
    conn.execute(
        "INSERT INTO customers
            (CustomerID, FirstName, MiddleInitial, LastName, CityID, Address)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            customer.customer_id,
            customer.first_name,
            customer.middle_initial,
            customer.last_name,
            customer.city_id,
            customer.address,
        ],
    )?;
    Ok(())
}

pub fn insert_employee(conn: &Connection, employee: &Employee) -> Result<()> {
    conn.execute(
        "INSERT INTO employees
            (EmployeeID, FirstName, MiddleInitial, LastName, BirthDate,
             Gender, CityID, HireDate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            employee.employee_id,
            employee.first_name,
            employee.middle_initial,
            employee.last_name,
            employee.birth_date,
            employee.gender,
            employee.city_id,
            employee.hire_date,
        ],
    )?;
    Ok(())
}

pub fn insert_sale(conn: &Connection, sale: &Sale) -> Result<()> {
    conn.execute(
        "INSERT INTO sales
            (SalesID, SalesPersonID, CustomerID, ProductID, Quantity,
             Discount, TotalPrice, SalesDate, TransactionNumber)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            sale.sale_id,
            sale.salesperson_id,
            sale.customer_id,
            sale.product_id,
            sale.quantity,
            sale.discount,
            sale.total_price,
            sale.sales_date,
            sale.transaction_number,
        ],
    )?;
    Ok(())
}

pub fn get_countries(conn: &Connection) -> Result<Vec<Country>> {
    let mut stmt = conn.prepare(
        "SELECT CountryID, CountryName, CountryCode FROM countries ORDER BY CountryID",
    )?;
    let rows = stmt
        .query_map([], |row| Country::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

pub fn get_cities(conn: &Connection) -> Result<Vec<City>> {
    let mut stmt =
        conn.prepare("SELECT CityID, CityName, CountryID FROM cities ORDER BY CityID")?;
    let rows = stmt
        .query_map([], |row| City::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

pub fn get_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT CategoryID, CategoryName FROM categories ORDER BY CategoryID")?;
    let rows = stmt
        .query_map([], |row| Category::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

pub fn get_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT ProductID, ProductName, Price, CategoryID, Class, ModifyDate,
                Resistant, IsAllergic, VitalityDays
         FROM products ORDER BY ProductID",
    )?;
    let rows = stmt
        .query_map([], |row| Product::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

pub fn get_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT CustomerID, FirstName, MiddleInitial, LastName, CityID,
                COALESCE(Address, '') AS Address
         FROM customers ORDER BY CustomerID",
    )?;
    let rows = stmt
        .query_map([], |row| Customer::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

pub fn get_employees(conn: &Connection) -> Result<Vec<Employee>> {
    let mut stmt = conn.prepare(
        "SELECT EmployeeID, FirstName, MiddleInitial, LastName, BirthDate,
                Gender, CityID, HireDate
         FROM employees ORDER BY EmployeeID",
    )?;
    let rows = stmt
        .query_map([], |row| Employee::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

pub fn get_sales(conn: &Connection) -> Result<Vec<Sale>> {
    let mut stmt = conn.prepare(
        "SELECT SalesID, SalesPersonID, CustomerID, ProductID, Quantity,
                Discount, TotalPrice, SalesDate, TransactionNumber
         FROM sales ORDER BY SalesID",
    )?;
    let rows = stmt
        .query_map([], |row| Sale::from_row(row))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(rows)
}

// ============================================================================
// TESTS
// ============================================================================
