use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::cache;
use crate::data::error::LoadError;
use crate::data::filter::{filtered_view, init_filter_selection, FilterSelection};
use crate::data::model::{columns, CellValue, Dataset, View};
use crate::data::summary::{summarize, DashboardSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full per-session state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Path of the loaded table.
    pub data_path: Option<PathBuf>,

    /// Shared, immutable dataset (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-column filter selections.
    pub filters: FilterSelection,

    /// Indices of rows passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Derived views for the dashboard body, recomputed on every change.
    pub summary: Option<DashboardSummary>,

    /// Bar colours for the two categorical breakdowns.
    pub category_colors: Option<ColorMap>,
    pub payment_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            data_path: None,
            dataset: None,
            filters: FilterSelection::new(),
            visible_indices: Vec::new(),
            summary: None,
            category_colors: None,
            payment_colors: None,
            status_message: None,
        }
    }

    /// Load `path` through the shared cache and make it the current dataset.
    /// On failure the previous dataset is dropped and the error is shown.
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        match cache::load_cached(path) {
            Ok(dataset) => {
                self.data_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                self.data_path = Some(path.to_path_buf());
                self.dataset = None;
                self.filters.clear();
                self.visible_indices.clear();
                self.summary = None;
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Drop the cached copy of the current file and load it again.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let Some(path) = self.data_path.clone() else {
            return Ok(());
        };
        cache::global().invalidate(&path);
        self.load_path(&path)
    }

    /// Ingest a dataset, select every value of every filter and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = init_filter_selection(&dataset);
        self.category_colors = colors_for(&dataset, columns::CATEGORY);
        self.payment_colors = colors_for(&dataset, columns::PAYMENT_METHOD);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view and every derived summary.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = filtered_view(ds, &self.filters);
        self.summary = Some(summarize(&view, self.config.histogram_bins));
        self.visible_indices = view.into_rows();
        log::debug!(
            "Recomputed dashboard: {} of {} rows visible",
            self.visible_indices.len(),
            ds.len()
        );
    }

    /// The current filtered view.
    pub fn view(&self) -> Option<View<'_>> {
        let ds = self.dataset.as_deref()?;
        Some(View::from_sorted_rows(ds, &self.visible_indices))
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(ds) = &self.dataset {
            if ds.has_column(column) {
                self.filters
                    .insert(column.to_string(), ds.distinct_values(column));
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }
}

fn colors_for(dataset: &Dataset, column: &str) -> Option<ColorMap> {
    dataset
        .has_column(column)
        .then(|| ColorMap::new(&dataset.distinct_values(column)))
}
