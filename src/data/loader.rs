use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use super::model::{CellValue, FundDataset};
use crate::config::{DataSourceConfig, SourceFormat, CSV_PARTITION_NAME};
use crate::error::{Error, Result};

/// Column normalised to dates and used as the sort key.
pub const DATE_COLUMN: &str = "Date";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// List the partitions of a source, in file order.
///
/// CSV files have a single synthetic partition; workbooks list their sheets.
pub fn list_partitions(config: &DataSourceConfig) -> Result<Vec<String>> {
    match config.format() {
        SourceFormat::Csv => Ok(vec![CSV_PARTITION_NAME.to_string()]),
        SourceFormat::Spreadsheet => {
            ensure_readable(config.path())?;
            let workbook = open_workbook_auto(config.path())?;
            Ok(workbook.sheet_names())
        }
    }
}

/// Read one partition and normalise its `Date` column.
///
/// `partition` is ignored for CSV sources: the whole file is one dataset.
pub fn read_partition(config: &DataSourceConfig, partition: &str) -> Result<FundDataset> {
    let mut dataset = match config.format() {
        SourceFormat::Csv => load_csv(config.path())?,
        SourceFormat::Spreadsheet => load_sheet(config.path(), partition)?,
    };
    normalize_dates(&mut dataset);

    info!(
        "loaded `{partition}` from {}: {} rows x {} columns",
        config.path().display(),
        dataset.len(),
        dataset.columns().len()
    );
    Ok(dataset)
}

fn ensure_readable(path: &Path) -> Result<()> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per line.
/// Cell types are guessed per value; ragged lines are padded with nulls.
fn load_csv(path: &Path) -> Result<FundDataset> {
    ensure_readable(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let raw_headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();
    let columns = normalize_headers(raw_headers);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > columns.len() {
            return Err(Error::Format(format!(
                "CSV line {} has {} fields but the header has {}",
                record.position().map(|p| p.line()).unwrap_or(0),
                record.len(),
                columns.len()
            )));
        }
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(FundDataset::new(columns, rows))
}

/// Spellings of a missing value in CSV exports (pandas' default set).
const CSV_MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() || CSV_MISSING_MARKERS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Read one sheet: first row is the header, the rest are observations.
fn load_sheet(path: &Path, sheet: &str) -> Result<FundDataset> {
    ensure_readable(path)?;
    let mut workbook = open_workbook_auto(path)?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(Error::UnknownPartition(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        debug!("sheet `{sheet}` is empty");
        return Ok(FundDataset::default());
    };

    let columns = normalize_headers(header_row.iter().map(|cell| header_text(cell)).collect());
    let rows = rows_iter
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(FundDataset::new(columns, rows))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Date(ndt.date()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_date(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::String(s.clone())),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        // #N/A, #DIV/0! and friends are missing values.
        Data::Error(_) => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Header normalisation
// ---------------------------------------------------------------------------

/// Name blank headers `Unnamed: <i>` and suffix duplicates with `.1`, `.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };

        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{base}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}

// ---------------------------------------------------------------------------
// Date normalisation
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse an ISO (`2024-03-31`, with optional time) or day-first
/// (`31/03/2024`, `31-03-2024`, `31.03.2024`) date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            let naive = s.trim_end_matches('Z');
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

fn coerce_date(value: &CellValue) -> CellValue {
    match value {
        CellValue::Date(d) => CellValue::Date(*d),
        CellValue::String(s) => parse_date(s).map(CellValue::Date).unwrap_or(CellValue::Null),
        _ => CellValue::Null,
    }
}

/// Coerce the `Date` column to dates and sort rows ascending by it.
///
/// Unparseable dates become null and those rows go last; no row is dropped
/// and the relative order of equal dates is kept. Datasets without a `Date`
/// column are left untouched.
pub fn normalize_dates(dataset: &mut FundDataset) {
    let Some(col) = dataset.column_index(DATE_COLUMN) else {
        return;
    };

    let mut coerced = 0usize;
    for cell in dataset.column_cells_mut(col) {
        let was_null = cell.is_null();
        *cell = coerce_date(cell);
        if !was_null && cell.is_null() {
            coerced += 1;
        }
    }
    if coerced > 0 {
        warn!("{coerced} value(s) in the `{DATE_COLUMN}` column are not dates, set to null");
    }

    dataset.sort_rows_by_key(|row| {
        let date = row[col].as_date();
        (date.is_none(), date)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_iso_and_day_first() {
        assert_eq!(parse_date("2024-03-31"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("31/03/2024"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("05-01-2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("05.01.2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-03-31 15:30:00"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("2024-03-31T00:00:00Z"), Some(d(2024, 3, 31)));
        assert_eq!(parse_date("2024-03-31T10:00:00+02:00"), Some(d(2024, 3, 31)));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("n/a"), None);
        assert_eq!(parse_date("31/31/2024"), None);
    }

    #[test]
    fn guesses_csv_cell_types() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("1.5"), CellValue::Float(1.5));
        assert_eq!(guess_cell_type("true"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("FCP Actions"), CellValue::String("FCP Actions".into()));
    }

    #[test]
    fn csv_missing_markers_are_null() {
        for marker in ["#N/A", "N/A", "NA", "NULL", "None", "nan", "<NA>"] {
            assert_eq!(guess_cell_type(marker), CellValue::Null, "{marker}");
        }
        assert_eq!(guess_cell_type("NAV"), CellValue::String("NAV".into()));
    }

    #[test]
    fn headers_are_named_and_deduplicated() {
        let headers = normalize_headers(vec![
            "Date".into(),
            "".into(),
            "FCP A".into(),
            "FCP A".into(),
            "FCP A".into(),
        ]);
        assert_eq!(headers, vec!["Date", "Unnamed: 1", "FCP A", "FCP A.1", "FCP A.2"]);
    }

    #[test]
    fn spreadsheet_errors_and_blanks_are_null() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Null);
        assert_eq!(convert_cell(&Data::String("  ".into())), CellValue::Null);
        assert_eq!(
            convert_cell(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Null
        );
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-02-29".into())),
            CellValue::Date(d(2024, 2, 29))
        );
    }

    #[test]
    fn sorts_by_date_and_keeps_bad_rows_last() {
        let mut ds = FundDataset::new(
            vec!["Date".into(), "FCP A".into()],
            vec![
                vec![CellValue::String("03/01/2024".into()), CellValue::Integer(3)],
                vec![CellValue::String("not a date".into()), CellValue::Integer(9)],
                vec![CellValue::String("2024-01-01".into()), CellValue::Integer(1)],
                vec![CellValue::Null, CellValue::Integer(8)],
                vec![CellValue::String("02/01/2024".into()), CellValue::Integer(2)],
            ],
        );
        normalize_dates(&mut ds);

        let dates: Vec<_> = ds.rows().iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            dates,
            vec![
                CellValue::Date(d(2024, 1, 1)),
                CellValue::Date(d(2024, 1, 2)),
                CellValue::Date(d(2024, 1, 3)),
                CellValue::Null,
                CellValue::Null,
            ]
        );
        let values: Vec<_> = ds.rows().iter().map(|r| r[1].clone()).collect();
        assert_eq!(
            values,
            vec![
                CellValue::Integer(1),
                CellValue::Integer(2),
                CellValue::Integer(3),
                CellValue::Integer(9),
                CellValue::Integer(8),
            ]
        );
    }

    #[test]
    fn datasets_without_date_are_untouched() {
        let mut ds = FundDataset::new(
            vec!["FCP".into()],
            vec![vec![CellValue::String("B".into())], vec![CellValue::String("A".into())]],
        );
        let before = ds.clone();
        normalize_dates(&mut ds);
        assert_eq!(ds, before);
    }
}
