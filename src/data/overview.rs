use chrono::NaiveDate;
use serde::Serialize;

use super::layout::DatasetLayout;
use super::loader::DATE_COLUMN;
use super::model::{CellValue, ColumnKind, FundDataset};
use crate::format::safe_divide;

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Whole days between `start` and `end`.
    pub days: i64,
}

/// Per-column information: inferred type, non-null and distinct counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    /// Distinct non-null values.
    pub unique: usize,
}

/// Headline figures for one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub partition: String,
    pub row_count: usize,
    pub column_count: usize,
    pub layout: DatasetLayout,
    pub fund_count: usize,
    /// `None` without a `Date` column or when no date parsed.
    pub date_range: Option<DateRange>,
    pub columns: Vec<ColumnInfo>,
}

impl DatasetOverview {
    pub fn compute(partition: &str, dataset: &FundDataset) -> Self {
        let layout = DatasetLayout::detect(dataset);
        let fund_count = layout.fund_count(dataset);

        DatasetOverview {
            partition: partition.to_string(),
            row_count: dataset.len(),
            column_count: dataset.columns().len(),
            fund_count,
            layout,
            date_range: date_range(dataset),
            columns: column_info(dataset),
        }
    }
}

/// Earliest and latest non-null `Date`.
pub fn date_range(dataset: &FundDataset) -> Option<DateRange> {
    let mut dates = dataset.column_values(DATE_COLUMN)?.filter_map(|v| v.as_date());
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange {
        start,
        end,
        days: (end - start).num_days(),
    })
}

pub fn column_info(dataset: &FundDataset) -> Vec<ColumnInfo> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnInfo {
            name: name.clone(),
            kind: dataset.column_kind(name),
            non_null: dataset.rows().iter().filter(|r| !r[i].is_null()).count(),
            unique: dataset.unique_values(name).len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN below two values.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Summary statistics of every numeric column, nulls ignored.
pub fn describe(dataset: &FundDataset) -> Vec<NumericSummary> {
    dataset
        .columns()
        .iter()
        .filter(|name| dataset.column_kind(name).is_numeric())
        .filter_map(|name| {
            let values: Vec<f64> = dataset.column_values(name)?.filter_map(|v| v.as_f64()).collect();
            let count = values.len();
            let mean = safe_divide(values.iter().sum(), count as f64, f64::NAN);
            let variance = safe_divide(
                values.iter().map(|v| (v - mean).powi(2)).sum(),
                count.saturating_sub(1) as f64,
                f64::NAN,
            );
            Some(NumericSummary {
                column: name.clone(),
                count,
                mean,
                std: variance.sqrt(),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fund performance (wide layout)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundPerformance {
    pub fund: String,
    /// First non-null value in row order.
    pub first: Option<f64>,
    /// Last non-null value in row order.
    pub last: Option<f64>,
    /// `(last / first - 1) * 100`; NaN when a bound is missing or `first` is zero.
    pub total_return_pct: f64,
}

/// Period return of each fund column. Empty unless the layout is wide.
///
/// Rows are expected in date order, which loading guarantees. When a `Date`
/// column exists only rows with a parsed date count.
pub fn fund_performance(dataset: &FundDataset) -> Vec<FundPerformance> {
    let DatasetLayout::Wide { fund_columns } = DatasetLayout::detect(dataset) else {
        return Vec::new();
    };

    // Rows whose date did not parse are sorted last; they carry no period.
    let date_idx = dataset.column_index(DATE_COLUMN);
    let dated_rows: Vec<&Vec<CellValue>> = dataset
        .rows()
        .iter()
        .filter(|row| date_idx.map_or(true, |i| row[i].as_date().is_some()))
        .collect();

    fund_columns
        .into_iter()
        .map(|fund| {
            let values: Vec<f64> = dataset
                .column_index(&fund)
                .map(|col| dated_rows.iter().filter_map(|row| row[col].as_f64()).collect())
                .unwrap_or_default();
            let first = values.first().copied();
            let last = values.last().copied();
            let total_return_pct = match (first, last) {
                (Some(f), Some(l)) => (safe_divide(l, f, f64::NAN) - 1.0) * 100.0,
                _ => f64::NAN,
            };
            FundPerformance {
                fund,
                first,
                last,
                total_return_pct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(y, m, day).unwrap())
    }

    fn navs() -> FundDataset {
        FundDataset::new(
            vec!["Date".into(), "FCP Actions".into(), "FCP Monétaire".into()],
            vec![
                vec![d(2024, 1, 1), CellValue::Float(100.0), CellValue::Null],
                vec![d(2024, 1, 2), CellValue::Float(102.0), CellValue::Float(50.0)],
                vec![d(2024, 1, 31), CellValue::Float(110.0), CellValue::Float(51.0)],
                vec![CellValue::Null, CellValue::Null, CellValue::Null],
            ],
        )
    }

    #[test]
    fn overview_of_wide_sheet() {
        let ov = DatasetOverview::compute("Valeurs Liquidatives", &navs());
        assert_eq!(ov.row_count, 4);
        assert_eq!(ov.column_count, 3);
        assert_eq!(ov.fund_count, 2);
        let range = ov.date_range.unwrap();
        assert_eq!(range.days, 30);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let date_info = &ov.columns[0];
        assert_eq!(date_info.kind, ColumnKind::Date);
        assert_eq!(date_info.non_null, 3);
        assert_eq!(ov.columns[2].non_null, 2);
        assert_eq!(ov.columns[2].unique, 2);
    }

    #[test]
    fn no_date_column_means_no_range() {
        let ds = FundDataset::new(vec!["FCP".into()], vec![vec![CellValue::String("A".into())]]);
        assert_eq!(date_range(&ds), None);
    }

    #[test]
    fn describe_numeric_columns_only() {
        let stats = describe(&navs());
        assert_eq!(stats.len(), 2);
        let actions = &stats[0];
        assert_eq!(actions.column, "FCP Actions");
        assert_eq!(actions.count, 3);
        assert!((actions.mean - 104.0).abs() < 1e-9);
        assert!((actions.std - 5.291502622129181).abs() < 1e-9);
        assert_eq!(actions.min, 100.0);
        assert_eq!(actions.max, 110.0);
    }

    #[test]
    fn performance_uses_first_and_last_values() {
        let perf = fund_performance(&navs());
        assert_eq!(perf.len(), 2);
        assert!((perf[0].total_return_pct - 10.0).abs() < 1e-9);
        assert_eq!(perf[1].first, Some(50.0));
        assert!((perf[1].total_return_pct - 2.0).abs() < 1e-9);
    }

    #[test]
    fn performance_ignores_rows_without_a_date() {
        let ds = FundDataset::new(
            vec!["Date".into(), "FCP A".into()],
            vec![
                vec![d(2024, 1, 1), CellValue::Integer(100)],
                vec![d(2024, 1, 31), CellValue::Integer(110)],
                vec![CellValue::Null, CellValue::Integer(0)],
            ],
        );
        let perf = fund_performance(&ds);
        assert_eq!(perf[0].first, Some(100.0));
        assert_eq!(perf[0].last, Some(110.0));
        assert!((perf[0].total_return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn performance_with_zero_start_is_nan() {
        let ds = FundDataset::new(
            vec!["FCP Z".into()],
            vec![vec![CellValue::Integer(0)], vec![CellValue::Integer(5)]],
        );
        assert!(fund_performance(&ds)[0].total_return_pct.is_nan());
    }
}
