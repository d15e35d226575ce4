use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;

use super::loader;
use super::model::FundDataset;
use crate::config::DataSourceConfig;
use crate::error::Result;

// ---------------------------------------------------------------------------
// DataStore – memoised access to the data source
// ---------------------------------------------------------------------------

/// Hit/miss counters of the dataset cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Owns the source configuration and memoises everything read from it.
///
/// Cache contract: the partition list is read once, and each dataset is
/// read once per partition name. Entries are never evicted or refreshed;
/// they live as long as the store (in practice, the process). Edits to
/// the source file after the first read are not seen.
///
/// The locks are not held during file reads: concurrent misses on the same
/// partition each read the file and the first result inserted is kept.
pub struct DataStore {
    config: DataSourceConfig,
    partitions: Mutex<Option<Arc<[String]>>>,
    datasets: Mutex<HashMap<String, Arc<FundDataset>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DataStore {
    pub fn new(config: DataSourceConfig) -> Self {
        Self {
            config,
            partitions: Mutex::new(None),
            datasets: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &DataSourceConfig {
        &self.config
    }

    /// Partition names in file order; read from the source on first call only.
    /// A failure is not cached, so a later call reads the source again.
    pub fn partitions(&self) -> Result<Arc<[String]>> {
        if let Some(names) = self.partitions.lock().as_ref() {
            return Ok(Arc::clone(names));
        }

        let names: Arc<[String]> = loader::list_partitions(&self.config)?.into();
        info!("{} partition(s) in {}", names.len(), self.config.path().display());

        let mut slot = self.partitions.lock();
        Ok(Arc::clone(slot.get_or_insert(names)))
    }

    /// Dataset for `partition`, read from the source on first access.
    ///
    /// For CSV sources the name is only a cache key: every name maps to the
    /// whole file.
    pub fn load(&self, partition: &str) -> Result<Arc<FundDataset>> {
        if let Some(dataset) = self.datasets.lock().get(partition) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("cache hit for `{partition}`");
            return Ok(Arc::clone(dataset));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        info!("cache miss for `{partition}`, reading source");
        let dataset = Arc::new(loader::read_partition(&self.config, partition)?);

        let mut datasets = self.datasets.lock();
        let entry = datasets.entry(partition.to_string()).or_insert(dataset);
        Ok(Arc::clone(entry))
    }

    /// [`DataStore::load`] on the configured default partition.
    pub fn load_default(&self) -> Result<Arc<FundDataset>> {
        self.load(self.config.default_partition())
    }

    /// Names currently cached, sorted.
    pub fn cached_partitions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
