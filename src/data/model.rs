use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a sheet or CSV file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Distinct-value counts go through `BTreeSet`, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the value, for statistics and charts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Null, or a float NaN (what a blank numeric cell often decodes to).
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred column type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// Only null cells.
    Empty,
    Integer,
    /// Floats, possibly mixed with integers.
    Float,
    Bool,
    Date,
    Text,
    /// Several incompatible kinds.
    Mixed,
}

impl ColumnKind {
    fn of(value: &CellValue) -> Option<Self> {
        match value {
            _ if value.is_null() => None,
            CellValue::Integer(_) => Some(ColumnKind::Integer),
            CellValue::Float(_) => Some(ColumnKind::Float),
            CellValue::Bool(_) => Some(ColumnKind::Bool),
            CellValue::Date(_) => Some(ColumnKind::Date),
            CellValue::String(_) => Some(ColumnKind::Text),
            CellValue::Null => None,
        }
    }

    fn merge(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (Empty, k) | (k, Empty) => k,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Mixed,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Empty => "empty",
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Bool => "bool",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
            ColumnKind::Mixed => "mixed",
        }
    }
}

// ---------------------------------------------------------------------------
// FundDataset – one loaded partition
// ---------------------------------------------------------------------------

/// A loaded partition: ordered columns and rows aligned with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundDataset {
    /// Column names in source order.
    columns: Vec<String>,
    /// Each row has exactly `columns.len()` cells.
    rows: Vec<Vec<CellValue>>,
}

impl FundDataset {
    /// Build a dataset, padding short rows with nulls and truncating long ones.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        FundDataset { columns, rows }
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, each aligned with [`FundDataset::columns`].
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Mutable cells of column `col`, top to bottom.
    pub fn column_cells_mut(&mut self, col: usize) -> impl Iterator<Item = &mut CellValue> + '_ {
        self.rows.iter_mut().filter_map(move |r| r.get_mut(col))
    }

    /// Stable reorder of the rows.
    pub fn sort_rows_by_key<K: Ord>(&mut self, mut key: impl FnMut(&[CellValue]) -> K) {
        self.rows.sort_by_key(|row| key(row));
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (`row`, column `name`).
    pub fn value(&self, row: usize, name: &str) -> Option<&CellValue> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of a column, top to bottom.
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    pub fn column_kind(&self, name: &str) -> ColumnKind {
        self.column_values(name)
            .map(|values| {
                values
                    .filter_map(ColumnKind::of)
                    .fold(ColumnKind::Empty, ColumnKind::merge)
            })
            .unwrap_or(ColumnKind::Empty)
    }

    /// Distinct non-null values of a column.
    pub fn unique_values(&self, name: &str) -> BTreeSet<CellValue> {
        self.column_values(name)
            .map(|values| values.filter(|v| !v.is_null()).cloned().collect())
            .unwrap_or_default()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
