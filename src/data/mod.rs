/// Data layer: source reading, normalisation, caching and statistics.
///
/// Architecture:
/// ```text
///  .csv / .xlsx (FCP_DATA_FILE)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  list sheets, parse one → FundDataset, sort by Date
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  memoise partitions and datasets for the process
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ layout / overview │  fund identity, headline figures, describe()
///   └──────────────────┘
/// ```

pub mod layout;
pub mod loader;
pub mod model;
pub mod overview;
pub mod store;
