use std::sync::Arc;

use fcp_dashboard::data::overview::{self, DatasetOverview, FundPerformance, NumericSummary};
use fcp_dashboard::{DataStore, FundDataset};
use log::error;

pub const MIN_PREVIEW_ROWS: usize = 5;
pub const MAX_PREVIEW_ROWS: usize = 100;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cached access to the configured data source.
    pub store: DataStore,

    /// Partitions offered by the selector (empty if listing failed).
    pub partitions: Vec<String>,

    /// Currently selected partition.
    pub selected: Option<String>,

    /// Dataset of the selected partition (None until loaded).
    pub dataset: Option<Arc<FundDataset>>,

    /// Figures derived from `dataset`, recomputed on selection.
    pub overview: Option<DatasetOverview>,
    pub summaries: Vec<NumericSummary>,
    pub performance: Vec<FundPerformance>,

    /// How many rows the preview table shows.
    pub preview_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and open the first partition, as the home page does.
    pub fn new(store: DataStore) -> Self {
        let mut state = Self {
            store,
            partitions: Vec::new(),
            selected: None,
            dataset: None,
            overview: None,
            summaries: Vec::new(),
            performance: Vec::new(),
            preview_rows: 10,
            status_message: None,
        };
        state.refresh_partitions();
        if let Some(first) = state.partitions.first().cloned() {
            state.select_partition(&first);
        }
        state
    }

    /// Populate the selector. Errors are surfaced, not retried.
    pub fn refresh_partitions(&mut self) {
        match self.store.partitions() {
            Ok(names) => self.partitions = names.to_vec(),
            Err(e) => {
                error!("listing partitions failed: {e}");
                self.partitions.clear();
                self.status_message = Some(format!(
                    "Cannot open {}: {e}",
                    self.store.config().path().display()
                ));
            }
        }
    }

    /// Load a partition (cached after the first time) and derive its figures.
    pub fn select_partition(&mut self, name: &str) {
        self.selected = Some(name.to_string());

        match self.store.load(name) {
            Ok(dataset) => {
                self.overview = Some(DatasetOverview::compute(name, &dataset));
                self.summaries = overview::describe(&dataset);
                self.performance = overview::fund_performance(&dataset);
                self.dataset = Some(dataset);
                self.status_message = None;
            }
            Err(e) => {
                error!("loading `{name}` failed: {e}");
                self.dataset = None;
                self.overview = None;
                self.summaries.clear();
                self.performance.clear();
                self.status_message = Some(format!("Cannot load sheet \"{name}\": {e}"));
            }
        }
    }
}
