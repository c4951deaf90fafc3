// In-memory tabular data - the input and output shape of every report

use crate::error::{ReportError, ReportResult};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// VALUE
// ============================================================================

/// A single table cell.
///
/// Column names are matched exactly (case-sensitive); cell contents are one
/// of four scalar shapes. `Null` marks a metric with no contribution for a
/// row, e.g. the null-filled side of an outer join.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the cell, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Ordering used by table sorts: numbers first (compared numerically,
    /// so `Int(2)` and `Float(2.0)` tie), then text, nulls last.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => match (self, other) {
                (Value::Text(a), Value::Text(b)) => a.cmp(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::Text(_) => 1,
            Value::Null => 2,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

// Group and join keys are hashed. Keys are ids and names, never NaN, so
// bitwise float hashing (with -0.0 normalized) agrees with equality.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Int(n) => {
                1u8.hash(state);
                n.hash(state);
            }
            Value::Float(x) => {
                2u8.hash(state);
                (x + 0.0).to_bits().hash(state);
            }
            Value::Text(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Round to 2 decimal places (used for averages).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ============================================================================
// DATA TABLE
// ============================================================================

/// Ordered named columns over row-major data.
///
/// Both the tabular source fed to the strategies and every report they
/// produce are `DataTable`s. Rows stay contiguous; sorting re-lays them out
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Create an empty table with the given column headers.
    pub fn new(columns: Vec<String>) -> Self {
        DataTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_headers(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Value>) {
        assert_eq!(row.len(), self.columns.len(), "row width mismatch");
        self.rows.push(row);
    }

    /// Position of a column, matched exactly (case-sensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or `SchemaMismatch` if absent.
    pub fn require_column(&self, name: &str) -> ReportResult<usize> {
        self.column_index(name)
            .ok_or_else(|| ReportError::missing_column(name))
    }

    /// Cell at (row, column name), if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All cells of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> ReportResult<Vec<&Value>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> ReportResult<()> {
        let idx = self.require_column(from)?;
        self.columns[idx] = to.to_string();
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> ReportResult<()> {
        let idx = self.require_column(name)?;
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(())
    }

    /// Stable sort by one column. Ties keep their current relative order in
    /// either direction.
    pub fn sort_by(&mut self, column: &str, ascending: bool) -> ReportResult<()> {
        let idx = self.require_column(column)?;
        self.rows.sort_by(|a, b| {
            let ord = a[idx].compare(&b[idx]);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Ok(())
    }

    /// Full outer join with `other` on the `key` column.
    ///
    /// The result keeps every key from both sides; columns from both sides
    /// are retained and the side lacking a match is null-filled. A right
    /// column whose name is already taken gets a `_2`, `_3`, ... suffix.
    /// Left rows keep their order, then unmatched right rows follow in
    /// their own order.
    pub fn outer_join(&self, other: &DataTable, key: &str) -> ReportResult<DataTable> {
        let left_key = self.require_column(key)?;
        let right_key = other.require_column(key)?;

        let mut columns = self.columns.clone();
        // (index in `other`, output position is implied by push order)
        let mut right_cols: Vec<usize> = Vec::new();
        for (i, name) in other.columns.iter().enumerate() {
            if i == right_key {
                continue;
            }
            columns.push(unique_name(&columns, name));
            right_cols.push(i);
        }

        let mut right_index: HashMap<&Value, Vec<usize>> = HashMap::new();
        for (i, row) in other.rows.iter().enumerate() {
            right_index.entry(&row[right_key]).or_default().push(i);
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        let mut matched = vec![false; other.rows.len()];

        for left_row in &self.rows {
            match right_index.get(&left_row[left_key]) {
                Some(hits) => {
                    for &ri in hits {
                        matched[ri] = true;
                        let mut row = left_row.clone();
                        for &ci in &right_cols {
                            row.push(other.rows[ri][ci].clone());
                        }
                        rows.push(row);
                    }
                }
                None => {
                    let mut row = left_row.clone();
                    row.extend(std::iter::repeat(Value::Null).take(right_cols.len()));
                    rows.push(row);
                }
            }
        }

        // Right-only keys, null-filled on the left side.
        for (ri, right_row) in other.rows.iter().enumerate() {
            if matched[ri] {
                continue;
            }
            let mut row = vec![Value::Null; self.columns.len()];
            row[left_key] = right_row[right_key].clone();
            for &ci in &right_cols {
                row.push(right_row[ci].clone());
            }
            rows.push(row);
        }

        Ok(DataTable { columns, rows })
    }

    /// Coalesce `sources` into `target` left-to-right (first non-null cell
    /// wins), then drop the source columns.
    pub fn coalesce_columns(&mut self, target: &str, sources: &[String]) -> ReportResult<()> {
        let target_idx = self.require_column(target)?;
        let source_idxs: Vec<usize> = sources
            .iter()
            .map(|s| self.require_column(s))
            .collect::<ReportResult<_>>()?;

        for row in &mut self.rows {
            if !row[target_idx].is_null() {
                continue;
            }
            if let Some(&idx) = source_idxs.iter().find(|&&i| !row[i].is_null()) {
                row[target_idx] = row[idx].clone();
            }
        }

        for name in sources {
            self.drop_column(name)?;
        }
        Ok(())
    }
}

/// First of `base`, `base_2`, `base_3`, ... not already present in `taken`.
fn unique_name(taken: &[String], base: &str) -> String {
    if !taken.iter().any(|c| c == base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !taken.iter().any(|c| c == &candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ============================================================================
// TESTS
// ============================================================================
