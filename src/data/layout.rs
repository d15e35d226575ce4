//! Fund identity comes in two shapes: one column per fund (`FCP ...`
//! prefixed names, as in the NAV sheet) or a categorical `FCP` column
//! (flows and net assets). The shape is detected from the columns alone.

use serde::Serialize;

use super::model::FundDataset;

/// Name of the categorical fund column, and prefix of per-fund columns.
pub const FUND_MARKER: &str = "FCP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetLayout {
    /// One column per fund.
    Wide { fund_columns: Vec<String> },
    /// One row per (date, fund); the fund is named in `fund_column`.
    Long { fund_column: String },
    /// No fund identity found.
    Untagged,
}

impl DatasetLayout {
    pub fn detect(dataset: &FundDataset) -> Self {
        if dataset.has_column(FUND_MARKER) {
            return DatasetLayout::Long {
                fund_column: FUND_MARKER.to_string(),
            };
        }

        let fund_columns: Vec<String> = dataset
            .columns()
            .iter()
            .filter(|c| c.starts_with(FUND_MARKER))
            .cloned()
            .collect();

        if fund_columns.is_empty() {
            DatasetLayout::Untagged
        } else {
            DatasetLayout::Wide { fund_columns }
        }
    }

    /// Fund names: the per-fund columns, or the distinct `FCP` values.
    pub fn fund_names(&self, dataset: &FundDataset) -> Vec<String> {
        match self {
            DatasetLayout::Wide { fund_columns } => fund_columns.clone(),
            DatasetLayout::Long { fund_column } => dataset
                .unique_values(fund_column)
                .into_iter()
                .map(|v| v.to_string())
                .collect(),
            DatasetLayout::Untagged => Vec::new(),
        }
    }

    pub fn fund_count(&self, dataset: &FundDataset) -> usize {
        match self {
            DatasetLayout::Wide { fund_columns } => fund_columns.len(),
            DatasetLayout::Long { fund_column } => dataset.unique_values(fund_column).len(),
            DatasetLayout::Untagged => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatasetLayout::Wide { .. } => "wide (one column per fund)",
            DatasetLayout::Long { .. } => "long (FCP column)",
            DatasetLayout::Untagged => "no fund identifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn prefixed_columns_make_a_wide_layout() {
        let ds = FundDataset::new(
            vec!["Date".into(), "FCP Actions".into(), "FCP Obligations".into(), "Indice".into()],
            vec![],
        );
        let layout = DatasetLayout::detect(&ds);
        assert_eq!(
            layout,
            DatasetLayout::Wide {
                fund_columns: vec!["FCP Actions".into(), "FCP Obligations".into()]
            }
        );
        assert_eq!(layout.fund_count(&ds), 2);
    }

    #[test]
    fn categorical_column_wins_over_prefix() {
        let ds = FundDataset::new(
            vec!["Date".into(), "FCP".into(), "FCP Type".into()],
            vec![
                vec![CellValue::Null, CellValue::String("FCP A".into()), CellValue::Null],
                vec![CellValue::Null, CellValue::String("FCP B".into()), CellValue::Null],
                vec![CellValue::Null, CellValue::String("FCP A".into()), CellValue::Null],
                vec![CellValue::Null, CellValue::Null, CellValue::Null],
            ],
        );
        let layout = DatasetLayout::detect(&ds);
        assert_eq!(layout, DatasetLayout::Long { fund_column: "FCP".into() });
        assert_eq!(layout.fund_count(&ds), 2);
        assert_eq!(layout.fund_names(&ds), vec!["FCP A", "FCP B"]);
    }

    #[test]
    fn no_fund_identity() {
        let ds = FundDataset::new(vec!["Date".into(), "Montant".into()], vec![]);
        let layout = DatasetLayout::detect(&ds);
        assert_eq!(layout, DatasetLayout::Untagged);
        assert_eq!(layout.fund_count(&ds), 0);
    }
}
