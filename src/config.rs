//! Data source configuration, resolved once at process start.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::{info, warn};

/// Environment variable overriding the data file path.
pub const DATA_FILE_ENV: &str = "FCP_DATA_FILE";
pub const DEFAULT_DATA_FILE: &str = "data_fcp.xlsx";

/// Sheet opened when the caller does not pick one.
pub const DEFAULT_SHEET_NAME: &str = "Valeurs Liquidatives";
/// Synthetic partition name for CSV sources, which have no sheets.
pub const CSV_PARTITION_NAME: &str = "Data";

// Brand palette.
pub const PRIMARY_COLOR: &str = "#114B80";
pub const SECONDARY_COLOR: &str = "#567389";
pub const ACCENT_COLOR: &str = "#ACC7DF";

pub const MILLIONS_DIVISOR: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Any multi-sheet workbook calamine can open (xlsx, xlsm, xls, xlsb, ods).
    Spreadsheet,
}

impl SourceFormat {
    /// Infer the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => SourceFormat::Csv,
            _ => SourceFormat::Spreadsheet,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Spreadsheet => "Excel (XLSX)",
        }
    }
}

/// Where the data lives and how to read it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfig {
    path: PathBuf,
    format: SourceFormat,
}

impl DataSourceConfig {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = SourceFormat::from_path(&path);
        Self { path, format }
    }

    /// Resolve the source from `FCP_DATA_FILE`, falling back to
    /// [`DEFAULT_DATA_FILE`]. Never fails; a bad value is logged and ignored.
    pub fn from_env() -> Self {
        let config = Self::from_env_value(std::env::var_os(DATA_FILE_ENV));
        info!(
            "data source: {} ({})",
            config.path.display(),
            config.format.label()
        );
        config
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        let Some(raw) = value else {
            return Self::from_path(DEFAULT_DATA_FILE);
        };

        match raw.into_string() {
            Ok(s) if !s.trim().is_empty() => Self::from_path(s.trim()),
            Ok(_) => {
                warn!("{DATA_FILE_ENV} is empty, using {DEFAULT_DATA_FILE}");
                Self::from_path(DEFAULT_DATA_FILE)
            }
            Err(raw) => {
                warn!(
                    "{DATA_FILE_ENV}={} is not valid UTF-8, using {DEFAULT_DATA_FILE}",
                    raw.to_string_lossy()
                );
                Self::from_path(DEFAULT_DATA_FILE)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn is_csv(&self) -> bool {
        self.format == SourceFormat::Csv
    }

    /// Partition loaded when none is selected.
    pub fn default_partition(&self) -> &'static str {
        match self.format {
            SourceFormat::Csv => CSV_PARTITION_NAME,
            SourceFormat::Spreadsheet => DEFAULT_SHEET_NAME,
        }
    }

    /// File name for display, without the directory part.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a/b.csv")), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("B.CSV")), SourceFormat::Csv);
        assert_eq!(
            SourceFormat::from_path(Path::new("data_fcp.xlsx")),
            SourceFormat::Spreadsheet
        );
        assert_eq!(SourceFormat::from_path(Path::new("noext")), SourceFormat::Spreadsheet);
    }

    #[test]
    fn unset_variable_uses_default_file() {
        let config = DataSourceConfig::from_env_value(None);
        assert_eq!(config.path(), Path::new(DEFAULT_DATA_FILE));
        assert!(!config.is_csv());
        assert_eq!(config.default_partition(), DEFAULT_SHEET_NAME);
    }

    #[test]
    fn blank_variable_falls_back_to_default() {
        let config = DataSourceConfig::from_env_value(Some("   ".into()));
        assert_eq!(config.path(), Path::new(DEFAULT_DATA_FILE));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_variable_falls_back_to_default() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'd', b'a', 0x80, b'.', b'c', b's', b'v']);
        let config = DataSourceConfig::from_env_value(Some(raw));
        assert_eq!(config.path(), Path::new(DEFAULT_DATA_FILE));
        assert!(!config.is_csv());
    }

    #[test]
    fn variable_overrides_path_and_format() {
        let config = DataSourceConfig::from_env_value(Some("/tmp/navs.csv".into()));
        assert_eq!(config.path(), Path::new("/tmp/navs.csv"));
        assert!(config.is_csv());
        assert_eq!(config.default_partition(), CSV_PARTITION_NAME);
        assert_eq!(config.file_name(), "navs.csv");
    }
}
