// Report strategies - per-employee aggregations over the sales table
//
// Every strategy reads the same flat sales table and produces a three-column
// report: the employee key, the display name, and one metric. The variants
// differ only in which input column they reduce and how.

use crate::error::ReportResult;
use crate::table::{round2, DataTable, Value};
use std::collections::HashMap;
use tracing::debug;

// Output column labels, shared by the strategies and the combined report.
pub const COL_EMPLOYEE_KEY: &str = "EmployeeKey";
pub const COL_EMPLOYEE_NAME: &str = "EmployeeName";
pub const COL_TOTAL_SALES: &str = "TotalSales";
pub const COL_AVERAGE_SALES: &str = "AverageSales";
pub const COL_PRODUCTS_SOLD: &str = "ProductsSoldCount";

// ============================================================================
// STRATEGY CONTRACT
// ============================================================================

/// A pluggable per-employee aggregation.
///
/// `generate_report` is a pure transformation: it reads the source table and
/// returns a fresh report, sorted by `sort_key` (a column of the *output*
/// table) in the requested direction. A missing input column or sort key is
/// a `SchemaMismatch`; an empty source yields an empty report with the
/// correct headers.
pub trait ReportStrategy {
    /// Name used to key this strategy's entry in the build result.
    fn name(&self) -> &'static str;

    fn generate_report(
        &self,
        table: &DataTable,
        sort_key: &str,
        ascending: bool,
    ) -> ReportResult<DataTable>;
}

// ============================================================================
// GROUPING
// ============================================================================

/// One employee's slice of the source table: the id, the first-seen display
/// name (the name is functionally dependent on the id and not re-validated),
/// and the metric cells in row order.
struct EmployeeGroup {
    key: Value,
    name: Value,
    metrics: Vec<Value>,
}

/// Group the source rows by `EmployeeID`, collecting `metric_column` cells.
/// Groups come back in first-seen order, which is what makes the later
/// stable sort tie-break deterministic.
fn group_by_employee(table: &DataTable, metric_column: &str) -> ReportResult<Vec<EmployeeGroup>> {
    let id_idx = table.require_column("EmployeeID")?;
    let name_idx = table.require_column("EmployeeName")?;
    let metric_idx = table.require_column(metric_column)?;

    let mut groups: Vec<EmployeeGroup> = Vec::new();
    let mut slots: HashMap<Value, usize> = HashMap::new();

    for row in table.rows() {
        let key = row[id_idx].clone();
        let slot = match slots.get(&key) {
            Some(&i) => i,
            None => {
                groups.push(EmployeeGroup {
                    key: key.clone(),
                    name: row[name_idx].clone(),
                    metrics: Vec::new(),
                });
                slots.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].metrics.push(row[metric_idx].clone());
    }

    Ok(groups)
}

/// Assemble the fixed-shape output table and apply the requested sort.
fn report_from_groups(
    groups: Vec<EmployeeGroup>,
    metric_label: &str,
    reduce: impl Fn(&[Value]) -> Value,
    sort_key: &str,
    ascending: bool,
) -> ReportResult<DataTable> {
    let mut out = DataTable::with_headers(&[COL_EMPLOYEE_KEY, COL_EMPLOYEE_NAME, metric_label]);
    for group in groups {
        let metric = reduce(&group.metrics);
        out.push_row(vec![group.key, group.name, metric]);
    }
    out.sort_by(sort_key, ascending)?;
    Ok(out)
}

// Null cells carry no contribution and are skipped by every reduction.

fn sum_metric(metrics: &[Value]) -> Value {
    Value::Float(metrics.iter().filter_map(Value::as_f64).sum())
}

fn mean_metric(metrics: &[Value]) -> Value {
    let present: Vec<f64> = metrics.iter().filter_map(Value::as_f64).collect();
    if present.is_empty() {
        return Value::Null;
    }
    Value::Float(round2(present.iter().sum::<f64>() / present.len() as f64))
}

fn count_metric(metrics: &[Value]) -> Value {
    Value::Int(metrics.iter().filter(|v| !v.is_null()).count() as i64)
}

// ============================================================================
// STRATEGY VARIANTS
// ============================================================================

/// Total sales per employee: the sum of `TotalPrice` over each employee's
/// sale lines, reported as `TotalSales`.
pub struct TotalSalesByEmployee;

impl ReportStrategy for TotalSalesByEmployee {
    fn name(&self) -> &'static str {
        "TotalSalesByEmployee"
    }

    fn generate_report(
        &self,
        table: &DataTable,
        sort_key: &str,
        ascending: bool,
    ) -> ReportResult<DataTable> {
        debug!(rows = table.row_count(), "generating total sales report");
        let groups = group_by_employee(table, "TotalPrice")?;
        report_from_groups(groups, COL_TOTAL_SALES, sum_metric, sort_key, ascending)
    }
}

/// Average sale per employee: the arithmetic mean of `TotalPrice`, rounded
/// to 2 decimal places, reported as `AverageSales`.
pub struct AverageSalesByEmployee;

impl ReportStrategy for AverageSalesByEmployee {
    fn name(&self) -> &'static str {
        "AverageSalesByEmployee"
    }

    fn generate_report(
        &self,
        table: &DataTable,
        sort_key: &str,
        ascending: bool,
    ) -> ReportResult<DataTable> {
        debug!(rows = table.row_count(), "generating average sales report");
        let groups = group_by_employee(table, "TotalPrice")?;
        report_from_groups(groups, COL_AVERAGE_SALES, mean_metric, sort_key, ascending)
    }
}

/// Products sold per employee: the count of `ProductID` occurrences (one
/// per sale line), reported as `ProductsSoldCount`.
pub struct ProductSalesByEmployee;

impl ReportStrategy for ProductSalesByEmployee {
    fn name(&self) -> &'static str {
        "ProductSalesByEmployee"
    }

    fn generate_report(
        &self,
        table: &DataTable,
        sort_key: &str,
        ascending: bool,
    ) -> ReportResult<DataTable> {
        debug!(rows = table.row_count(), "generating product count report");
        let groups = group_by_employee(table, "ProductID")?;
        report_from_groups(groups, COL_PRODUCTS_SOLD, count_metric, sort_key, ascending)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ReportError;

    /// Five sale lines across three employees, mirroring the shape the
    /// summary query produces.
    pub(crate) fn sample_sales_table() -> DataTable {
        let mut t = DataTable::with_headers(&[
            "SalesID",
            "ProductID",
            "ProductName",
            "Quantity",
            "TotalPrice",
            "CustomerID",
            "CustomerName",
            "EmployeeID",
            "EmployeeName",
        ]);
        let rows: Vec<(i64, i64, &str, i64, f64, i64, &str, i64, &str)> = vec![
            (1, 101, "Laptop", 1, 100.0, 201, "John Doe", 1, "Alice Smith"),
            (2, 102, "Mouse", 2, 200.0, 202, "Jane Smith", 2, "Bob Johnson"),
            (3, 103, "Keyboard", 1, 150.0, 203, "Alice Brown", 1, "Alice Smith"),
            (4, 104, "Monitor", 3, 300.0, 204, "Bob White", 3, "Charlie Brown"),
            (5, 105, "Printer", 1, 250.0, 205, "Charlie Green", 2, "Bob Johnson"),
        ];
        for (sid, pid, pname, qty, price, cid, cname, eid, ename) in rows {
            t.push_row(vec![
                Value::Int(sid),
                Value::Int(pid),
                Value::from(pname),
                Value::Int(qty),
                Value::Float(price),
                Value::Int(cid),
                Value::from(cname),
                Value::Int(eid),
                Value::from(ename),
            ]);
        }
        t
    }

    fn metric_by_key(report: &DataTable, metric: &str) -> Vec<(Value, Value)> {
        let keys = report.column_values(COL_EMPLOYEE_KEY).unwrap();
        let metrics = report.column_values(metric).unwrap();
        keys.into_iter()
            .cloned()
            .zip(metrics.into_iter().cloned())
            .collect()
    }

    #[test]
    fn test_total_sales_by_employee() {
        let report = TotalSalesByEmployee
            .generate_report(&sample_sales_table(), COL_EMPLOYEE_NAME, true)
            .unwrap();

        assert_eq!(
            report.columns(),
            &[COL_EMPLOYEE_KEY, COL_EMPLOYEE_NAME, COL_TOTAL_SALES]
        );
        assert_eq!(report.row_count(), 3); // one row per distinct employee

        let totals = metric_by_key(&report, COL_TOTAL_SALES);
        assert!(totals.contains(&(Value::Int(1), Value::Float(250.0))));
        assert!(totals.contains(&(Value::Int(2), Value::Float(450.0))));
        assert!(totals.contains(&(Value::Int(3), Value::Float(300.0))));
    }

    #[test]
    fn test_average_sales_by_employee() {
        let report = AverageSalesByEmployee
            .generate_report(&sample_sales_table(), COL_EMPLOYEE_NAME, true)
            .unwrap();

        let averages = metric_by_key(&report, COL_AVERAGE_SALES);
        assert!(averages.contains(&(Value::Int(1), Value::Float(125.0))));
        assert!(averages.contains(&(Value::Int(2), Value::Float(225.0))));
        assert!(averages.contains(&(Value::Int(3), Value::Float(300.0))));
    }

    #[test]
    fn test_product_sales_by_employee() {
        let report = ProductSalesByEmployee
            .generate_report(&sample_sales_table(), COL_EMPLOYEE_NAME, true)
            .unwrap();

        assert_eq!(
            report.columns(),
            &[COL_EMPLOYEE_KEY, COL_EMPLOYEE_NAME, COL_PRODUCTS_SOLD]
        );

        let counts = metric_by_key(&report, COL_PRODUCTS_SOLD);
        assert!(counts.contains(&(Value::Int(1), Value::Int(2))));
        assert!(counts.contains(&(Value::Int(2), Value::Int(2))));
        assert!(counts.contains(&(Value::Int(3), Value::Int(1))));
    }

    #[test]
    fn test_descending_sort_on_metric() {
        let report = TotalSalesByEmployee
            .generate_report(&sample_sales_table(), COL_TOTAL_SALES, false)
            .unwrap();

        let totals = report.column_values(COL_TOTAL_SALES).unwrap();
        for pair in totals.windows(2) {
            assert!(
                pair[0].compare(pair[1]) != std::cmp::Ordering::Less,
                "totals must be non-increasing"
            );
        }
        assert_eq!(report.value(0, COL_TOTAL_SALES), Some(&Value::Float(450.0)));
    }

    #[test]
    fn test_ascending_sort_by_name() {
        let report = ProductSalesByEmployee
            .generate_report(&sample_sales_table(), COL_EMPLOYEE_NAME, true)
            .unwrap();

        let names = report.column_values(COL_EMPLOYEE_NAME).unwrap();
        assert_eq!(
            names,
            vec![
                &Value::from("Alice Smith"),
                &Value::from("Bob Johnson"),
                &Value::from("Charlie Brown")
            ]
        );
    }

    #[test]
    fn test_empty_source_yields_empty_report_with_headers() {
        let empty = DataTable::with_headers(&[
            "EmployeeID",
            "EmployeeName",
            "TotalPrice",
            "ProductID",
        ]);

        let report = TotalSalesByEmployee
            .generate_report(&empty, COL_EMPLOYEE_NAME, true)
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(
            report.columns(),
            &[COL_EMPLOYEE_KEY, COL_EMPLOYEE_NAME, COL_TOTAL_SALES]
        );
    }

    #[test]
    fn test_missing_employee_id_is_schema_mismatch() {
        let mut t = DataTable::with_headers(&["EmployeeName", "ProductID"]);
        t.push_row(vec![Value::from("Alice Smith"), Value::Int(101)]);

        let err = ProductSalesByEmployee
            .generate_report(&t, COL_EMPLOYEE_NAME, true)
            .unwrap_err();
        assert_eq!(err, ReportError::missing_column("EmployeeID"));
    }

    #[test]
    fn test_missing_sort_key_is_schema_mismatch() {
        let err = TotalSalesByEmployee
            .generate_report(&sample_sales_table(), "NoSuchColumn", true)
            .unwrap_err();
        assert_eq!(err, ReportError::missing_column("NoSuchColumn"));
    }

    #[test]
    fn test_strategy_does_not_mutate_source() {
        let source = sample_sales_table();
        let before = source.clone();
        AverageSalesByEmployee
            .generate_report(&source, COL_EMPLOYEE_NAME, true)
            .unwrap();
        assert_eq!(source, before);
    }
}
