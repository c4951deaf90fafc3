// Report builder - runs registered strategies and merges their outputs
//
// Usage:
//     let mut builder = ReportBuilder::new();
//     builder.set_source(sales).set_combined_sort(COL_EMPLOYEE_NAME, true);
//     builder.register(Box::new(TotalSalesByEmployee))?;
//     builder.register(Box::new(AverageSalesByEmployee))?;
//     builder.register(Box::new(ProductSalesByEmployee))?;
//     let reports = builder.build()?;

use crate::error::{ReportError, ReportResult};
use crate::strategy::{ReportStrategy, COL_EMPLOYEE_KEY, COL_EMPLOYEE_NAME};
use crate::table::DataTable;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Key of the merged report in the build result.
pub const COMBINED_REPORT: &str = "CombinedReport";

// ============================================================================
// REPORT BUILDER
// ============================================================================

/// Orchestrates the registered strategies over one source table and folds
/// their reports into a combined table keyed by employee.
///
/// Not thread-safe; callers wanting concurrent report generation use
/// independent builders over their own copies of the source.
pub struct ReportBuilder {
    source: Option<DataTable>,
    strategies: Vec<Box<dyn ReportStrategy>>,
    combined_sort_key: Option<String>,
    combined_sort_ascending: bool,
}

impl std::fmt::Debug for ReportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportBuilder")
            .field("source", &self.source)
            .field("strategy_count", &self.strategies.len())
            .field("combined_sort_key", &self.combined_sort_key)
            .field("combined_sort_ascending", &self.combined_sort_ascending)
            .finish()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        ReportBuilder {
            source: None,
            strategies: Vec::new(),
            combined_sort_key: None,
            combined_sort_ascending: true,
        }
    }

    /// Replace the source table. Prior registrations are kept.
    pub fn set_source(&mut self, table: DataTable) -> &mut Self {
        self.source = Some(table);
        self
    }

    /// Configure the sort applied to every report and the combined table.
    /// `key` must name a column of the eventual output tables; this is only
    /// checked when `build` runs. Unset, reports sort by `EmployeeName`
    /// ascending.
    pub fn set_combined_sort(&mut self, key: &str, ascending: bool) -> &mut Self {
        self.combined_sort_key = Some(key.to_string());
        self.combined_sort_ascending = ascending;
        self
    }

    /// Append a strategy to the pipeline. A source table must exist first.
    pub fn register(&mut self, strategy: Box<dyn ReportStrategy>) -> ReportResult<&mut Self> {
        if self.source.is_none() {
            return Err(ReportError::ConfigurationError(
                "a source table must be set before registering reports".to_string(),
            ));
        }
        debug!(strategy = strategy.name(), "registered report strategy");
        self.strategies.push(strategy);
        Ok(self)
    }

    /// Run every registered strategy and merge the results.
    ///
    /// Returns one entry per strategy (keyed by its name) plus
    /// `"CombinedReport"`: the per-strategy tables outer-joined on the
    /// employee key, name columns coalesced, sorted by the configured key.
    /// Re-runnable; each call recomputes from the current configuration.
    pub fn build(&self) -> ReportResult<BTreeMap<String, DataTable>> {
        let source = self.source.as_ref().ok_or_else(|| {
            ReportError::ConfigurationError("no source table has been set".to_string())
        })?;
        if self.strategies.is_empty() {
            return Err(ReportError::ConfigurationError(
                "no report strategies are registered".to_string(),
            ));
        }

        let sort_key = self.combined_sort_key.as_deref().unwrap_or(COL_EMPLOYEE_NAME);
        let ascending = self.combined_sort_ascending;

        let mut reports = BTreeMap::new();
        let mut combined: Option<DataTable> = None;

        for strategy in &self.strategies {
            let report = strategy.generate_report(source, sort_key, ascending)?;
            info!(
                strategy = strategy.name(),
                rows = report.row_count(),
                "report generated"
            );

            combined = Some(match combined {
                None => report.clone(),
                Some(acc) => acc.outer_join(&report, COL_EMPLOYEE_KEY)?,
            });
            reports.insert(strategy.name().to_string(), report);
        }

        let mut combined = combined.expect("at least one strategy ran");
        self.clean_combined(&mut combined)?;
        reports.insert(COMBINED_REPORT.to_string(), combined);

        Ok(reports)
    }

    /// Post-merge cleanup: repeated joins leave one suffixed employee-name
    /// column per contributing report. Coalesce them left-to-right into the
    /// canonical column, drop the rest, and apply the final sort.
    fn clean_combined(&self, combined: &mut DataTable) -> ReportResult<()> {
        let name_columns: Vec<String> = combined
            .columns()
            .iter()
            .filter(|c| c.starts_with(COL_EMPLOYEE_NAME))
            .cloned()
            .collect();

        if name_columns.len() > 1 {
            combined.coalesce_columns(&name_columns[0], &name_columns[1..])?;
        }

        let sort_key = self.combined_sort_key.as_deref().unwrap_or(COL_EMPLOYEE_NAME);
        combined.sort_by(sort_key, self.combined_sort_ascending)
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::tests::sample_sales_table;
    use crate::strategy::{
        AverageSalesByEmployee, ProductSalesByEmployee, TotalSalesByEmployee, COL_TOTAL_SALES,
    };
    use crate::table::Value;
    use std::collections::BTreeSet;

    fn configured_builder() -> ReportBuilder {
        let mut builder = ReportBuilder::new();
        builder
            .set_source(sample_sales_table())
            .set_combined_sort(COL_EMPLOYEE_NAME, true);
        builder.register(Box::new(TotalSalesByEmployee)).unwrap();
        builder.register(Box::new(AverageSalesByEmployee)).unwrap();
        builder.register(Box::new(ProductSalesByEmployee)).unwrap();
        builder
    }

    #[test]
    fn test_build_returns_one_entry_per_strategy_plus_combined() {
        let reports = configured_builder().build().unwrap();

        assert_eq!(reports.len(), 4);
        for name in [
            "TotalSalesByEmployee",
            "AverageSalesByEmployee",
            "ProductSalesByEmployee",
            COMBINED_REPORT,
        ] {
            let report = reports.get(name).unwrap_or_else(|| panic!("missing {}", name));
            assert!(!report.is_empty(), "report '{}' is empty", name);
        }
    }

    #[test]
    fn test_combined_report_shape_and_order() {
        let reports = configured_builder().build().unwrap();
        let combined = &reports[COMBINED_REPORT];

        assert_eq!(
            combined.columns(),
            &[
                "EmployeeKey",
                "EmployeeName",
                "TotalSales",
                "AverageSales",
                "ProductsSoldCount"
            ]
        );

        // Sorted ascending by the canonical name column
        let names = combined.column_values(COL_EMPLOYEE_NAME).unwrap();
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
    fn test_combined_contains_union_of_employee_keys() {
        let reports = configured_builder().build().unwrap();

        let mut union: BTreeSet<String> = BTreeSet::new();
        for (name, report) in &reports {
            if name == COMBINED_REPORT {
                continue;
            }
            for v in report.column_values(COL_EMPLOYEE_KEY).unwrap() {
                union.insert(v.to_string());
            }
        }

        let combined_keys: BTreeSet<String> = reports[COMBINED_REPORT]
            .column_values(COL_EMPLOYEE_KEY)
            .unwrap()
            .into_iter()
            .map(|v| v.to_string())
            .collect();

        assert_eq!(combined_keys, union);
    }

    #[test]
    fn test_build_is_idempotent() {
        let builder = configured_builder();
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_register_before_source_is_configuration_error() {
        let mut builder = ReportBuilder::new();
        let err = builder.register(Box::new(TotalSalesByEmployee)).unwrap_err();
        assert!(matches!(err, ReportError::ConfigurationError(_)));
    }

    #[test]
    fn test_build_without_source_is_configuration_error() {
        let builder = ReportBuilder::new();
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ReportError::ConfigurationError(_)));
    }

    #[test]
    fn test_build_without_strategies_is_configuration_error() {
        let mut builder = ReportBuilder::new();
        builder.set_source(sample_sales_table());
        let err = builder.build().unwrap_err();
        assert!(matches!(err, ReportError::ConfigurationError(_)));
    }

    #[test]
    fn test_set_source_keeps_registrations() {
        let mut builder = configured_builder();
        builder.set_source(sample_sales_table());
        let reports = builder.build().unwrap();
        assert_eq!(reports.len(), 4);
    }

    /// Totals restricted to one employee id. Its report misses the other
    /// employees entirely, so the combined outer join must null-fill them
    /// and the cleanup must take their names from the other reports.
    struct SingleEmployeeTotals(i64);

    impl ReportStrategy for SingleEmployeeTotals {
        fn name(&self) -> &'static str {
            "SingleEmployeeTotals"
        }

        fn generate_report(
            &self,
            table: &DataTable,
            sort_key: &str,
            ascending: bool,
        ) -> crate::error::ReportResult<DataTable> {
            let full = TotalSalesByEmployee.generate_report(table, sort_key, ascending)?;
            let mut filtered = DataTable::new(full.columns().to_vec());
            let key_idx = full.require_column(COL_EMPLOYEE_KEY)?;
            for row in full.rows() {
                if row[key_idx] == Value::Int(self.0) {
                    filtered.push_row(row.clone());
                }
            }
            Ok(filtered)
        }
    }

    #[test]
    fn test_name_coalescing_fills_nulls_from_later_reports() {
        let mut builder = ReportBuilder::new();
        builder
            .set_source(sample_sales_table())
            .set_combined_sort(COL_EMPLOYEE_NAME, true);
        // First report only knows employee 1; names for 2 and 3 arrive
        // through the second report's suffixed name column.
        builder.register(Box::new(SingleEmployeeTotals(1))).unwrap();
        builder.register(Box::new(ProductSalesByEmployee)).unwrap();

        let reports = builder.build().unwrap();
        let combined = &reports[COMBINED_REPORT];

        assert_eq!(combined.row_count(), 3);
        let name_columns: Vec<&String> = combined
            .columns()
            .iter()
            .filter(|c| c.starts_with(COL_EMPLOYEE_NAME))
            .collect();
        assert_eq!(name_columns, vec![COL_EMPLOYEE_NAME]);

        for row in 0..combined.row_count() {
            let name = combined.value(row, COL_EMPLOYEE_NAME).unwrap();
            assert!(!name.is_null(), "row {} lost its employee name", row);
        }

        // Employee 1 is the only one with a total; the others are null-filled.
        let totals = combined.column_values(COL_TOTAL_SALES).unwrap();
        assert_eq!(totals.iter().filter(|v| !v.is_null()).count(), 1);
    }
}
