//! Prints the overview of one partition as JSON.
//!
//! `fcp_overview [PARTITION]` reads the source named by `FCP_DATA_FILE`
//! (default `data_fcp.xlsx`); without a partition the default one is used.

use anyhow::{Context, Result};
use fcp_dashboard::data::overview::{self, DatasetOverview};
use fcp_dashboard::{DataSourceConfig, DataStore};
use serde_json::json;

fn main() -> Result<()> {
    env_logger::init();

    let store = DataStore::new(DataSourceConfig::from_env());
    let partitions = store.partitions().context("listing partitions")?;

    let partition = std::env::args()
        .nth(1)
        .unwrap_or_else(|| store.config().default_partition().to_string());
    let dataset = store
        .load(&partition)
        .with_context(|| format!("loading `{partition}`"))?;

    let report = json!({
        "source": store.config().path(),
        "format": store.config().format().label(),
        "partitions": &partitions[..],
        "overview": DatasetOverview::compute(&partition, &dataset),
        "describe": overview::describe(&dataset),
        "performance": overview::fund_performance(&dataset),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
