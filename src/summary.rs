// Flat query-row projections - the bridge between SQL rows and the report core

use crate::table::{DataTable, Value};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

// ============================================================================
// SALES RECORD
// ============================================================================

/// One line of the flat sales summary: a sale joined with its product,
/// customer, and selling employee. This is the row shape of the tabular
/// source — both the CSV import format and the output of
/// `fetch_sales_summary`. Field names in serialized form are the fixed
/// column literals the strategies match on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SalesRecord {
    #[serde(rename = "SalesID")]
    pub sale_id: i64,

    #[serde(rename = "ProductID")]
    pub product_id: i64,

    #[serde(rename = "ProductName")]
    pub product_name: String,

    #[serde(rename = "Quantity")]
    pub quantity: i64,

    #[serde(rename = "TotalPrice")]
    pub total_price: f64,

    #[serde(rename = "CustomerID")]
    pub customer_id: i64,

    #[serde(rename = "CustomerName")]
    pub customer_name: String,

    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,

    #[serde(rename = "EmployeeName")]
    pub employee_name: String,
}

impl SalesRecord {
    /// Column order of the summary query and of `to_table`.
    pub const COLUMNS: [&'static str; 9] = [
        "SalesID",
        "ProductID",
        "ProductName",
        "Quantity",
        "TotalPrice",
        "CustomerID",
        "CustomerName",
        "EmployeeID",
        "EmployeeName",
    ];

    /// Map a summary query row (selected in `COLUMNS` order).
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SalesRecord {
            sale_id: row.get(0)?,
            product_id: row.get(1)?,
            product_name: row.get(2)?,
            quantity: row.get(3)?,
            total_price: row.get(4)?,
            customer_id: row.get(5)?,
            customer_name: row.get(6)?,
            employee_id: row.get(7)?,
            employee_name: row.get(8)?,
        })
    }

    /// Build the tabular source for the report pipeline.
    pub fn to_table(records: &[SalesRecord]) -> DataTable {
        let mut table = DataTable::with_headers(&Self::COLUMNS);
        for r in records {
            table.push_row(vec![
                Value::Int(r.sale_id),
                Value::Int(r.product_id),
                Value::Text(r.product_name.clone()),
                Value::Int(r.quantity),
                Value::Float(r.total_price),
                Value::Int(r.customer_id),
                Value::Text(r.customer_name.clone()),
                Value::Int(r.employee_id),
                Value::Text(r.employee_name.clone()),
            ]);
        }
        table
    }
}

// ============================================================================
// CUSTOMER LOCATION
// ============================================================================

/// A customer joined with their city and country.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomerLocationInfo {
    pub customer_id: i64,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub address: String,
    pub city_name: String,
    pub country_name: String,
}

impl CustomerLocationInfo {
    /// Map a location query row: CustomerID, FirstName, MiddleInitial,
    /// LastName, Address, CityName, CountryName.
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(CustomerLocationInfo {
            customer_id: row.get(0)?,
            first_name: row.get(1)?,
            middle_initial: row.get(2)?,
            last_name: row.get(3)?,
            address: row.get(4)?,
            city_name: row.get(5)?,
            country_name: row.get(6)?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
SalesID,ProductID,ProductName,Quantity,TotalPrice,CustomerID,CustomerName,EmployeeID,EmployeeName
1,101,Laptop,1,100,201,John Doe,1,Alice Smith
2,102,Mouse,2,200,202,Jane Smith,2,Bob Johnson
";

    #[test]
    fn test_csv_header_mapping() {
        let mut reader = csv::Reader::from_reader(SAMPLE_CSV.as_bytes());
        let records: Vec<SalesRecord> =
            reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sale_id, 1);
        assert_eq!(records[0].employee_name, "Alice Smith");
        assert_eq!(records[1].total_price, 200.0);
    }

    #[test]
    fn test_to_table_columns_and_cells() {
        let mut reader = csv::Reader::from_reader(SAMPLE_CSV.as_bytes());
        let records: Vec<SalesRecord> =
            reader.deserialize().collect::<Result<_, _>>().unwrap();

        let table = SalesRecord::to_table(&records);
        assert_eq!(table.columns(), &SalesRecord::COLUMNS);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, "TotalPrice"), Some(&Value::Float(100.0)));
        assert_eq!(table.value(1, "EmployeeID"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_to_table_of_no_records_is_empty_with_headers() {
        let table = SalesRecord::to_table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.columns(), &SalesRecord::COLUMNS);
    }
}
