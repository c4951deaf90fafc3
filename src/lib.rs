// Sales Reports - Core Library
// Exposes all modules for use in the CLI and tests

pub mod builder;
pub mod db;
pub mod entities;
pub mod error;
pub mod strategy;
pub mod summary;
pub mod table;

// Re-export commonly used types
pub use builder::{ReportBuilder, COMBINED_REPORT};
pub use db::{
    fetch_customer_locations, fetch_sales_summary, get_categories, get_cities, get_countries,
    get_customers, get_employees, get_products, get_sales, insert_category, insert_city,
    insert_country, insert_customer, insert_employee, insert_product, insert_sale, insert_sales,
    load_sales_csv, open_database, setup_database, verify_count, DbConfig,
};
pub use entities::{Category, City, Country, Customer, Employee, Product, Sale};
pub use error::{ReportError, ReportResult};
pub use strategy::{
    AverageSalesByEmployee, ProductSalesByEmployee, ReportStrategy, TotalSalesByEmployee,
    COL_AVERAGE_SALES, COL_EMPLOYEE_KEY, COL_EMPLOYEE_NAME, COL_PRODUCTS_SOLD, COL_TOTAL_SALES,
};
pub use summary::{CustomerLocationInfo, SalesRecord};
pub use table::{DataTable, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
