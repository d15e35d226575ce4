//! Data core of the FCP dashboard: source resolution, partition listing,
//! cached dataset loading and the display helpers shared by the binaries.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod format;

pub use config::{DataSourceConfig, SourceFormat};
pub use data::model::{CellValue, FundDataset};
pub use data::store::DataStore;
pub use error::{Error, Result};
