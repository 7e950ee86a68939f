//! Dashboard configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::histogram::DEFAULT_BUCKET_COUNT;

/// Settings read from `dashboard.json` in the working directory. Every field
/// is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Table loaded at startup.
    pub data_path: PathBuf,
    /// Bucket count for the age histogram.
    pub histogram_bins: usize,
    /// Height of the scrollable data table, in points.
    pub table_max_height: f32,
    /// Initial window size, in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("customer_shopping_behavior.csv"),
            histogram_bins: DEFAULT_BUCKET_COUNT,
            table_max_height: 320.0,
            window_size: [1280.0, 900.0],
        }
    }
}

impl DashboardConfig {
    pub const FILE_NAME: &'static str = "dashboard.json";

    /// Read the config at `path`. A missing file gives the defaults; an
    /// unreadable or malformed one is logged and also gives the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }
}
