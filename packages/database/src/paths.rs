#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the dashboard's input data.
//!
//! All paths default to files inside a single `data/` directory relative
//! to the working directory the server is started from.

use std::path::{Path, PathBuf};

use accident_map_geography::boundaries::DEFAULT_NAME_PROPERTY;
use serde::Deserialize;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Lat/lon + population reference table (CSV).
    pub reference_table: PathBuf,
    /// Per-accident record table (CSV).
    pub accidents: PathBuf,
    /// District boundary `FeatureCollection` (`GeoJSON`).
    pub boundaries: PathBuf,
    /// Boundary feature property that holds the district name.
    pub boundary_name_property: String,
}

impl DataPaths {
    /// Returns the default file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            reference_table: dir.join("lat_lon_districts.csv"),
            accidents: dir.join("accidents.csv"),
            boundaries: dir.join("lad.json"),
            boundary_name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(Path::new(DEFAULT_DATA_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_live_in_data_dir() {
        let paths = DataPaths::default();
        assert_eq!(paths.accidents, Path::new("data").join("accidents.csv"));
        assert_eq!(paths.boundaries, Path::new("data").join("lad.json"));
        assert_eq!(paths.boundary_name_property, "district_name");
    }
}
