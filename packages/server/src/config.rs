//! Dashboard configuration.
//!
//! Loaded from an optional TOML file. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration against
//! the `data/` directory.
//!
//! ```toml
//! default_year = "2018"
//! default_metric = "vehicle_age"
//! nation_label = "England"
//!
//! [data]
//! accidents = "data/accidents.csv"
//!
//! [map]
//! zoom = 6.0
//! ```

use std::path::{Path, PathBuf};

use accident_map_accident_models::{Metric, YearFilter};
use accident_map_analytics::cache::DEFAULT_CAPACITY;
use accident_map_database::paths::DataPaths;
use accident_map_render::map::MapOptions;
use accident_map_render::table::DEFAULT_NATION_LABEL;
use serde::Deserialize;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

/// Environment variable overriding the mapbox token.
pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Errors that can occur while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Input file locations.
    pub data: DataPaths,
    /// Basemap settings.
    pub map: MapOptions,
    /// Year shown when the dashboard opens.
    pub default_year: YearFilter,
    /// Metric shown when the dashboard opens.
    pub default_metric: Metric,
    /// Heading of the national column of the summary table.
    pub nation_label: String,
    /// Number of aggregation results kept in memory.
    pub cache_capacity: usize,
    /// Directory of the built frontend.
    pub static_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: DataPaths::default(),
            map: MapOptions::default(),
            default_year: YearFilter::Sum,
            default_metric: Metric::DriverAge,
            nation_label: DEFAULT_NATION_LABEL.to_string(),
            cache_capacity: DEFAULT_CAPACITY,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

impl DashboardConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not valid TOML or a
    /// field has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads the configuration from `path`, or from the file named by
    /// `DASHBOARD_CONFIG`, or falls back to the defaults. Environment
    /// overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let mut config = match path.or(from_env.as_deref()) {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::load(path)?
            }
            None => {
                log::debug!("No configuration file given, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(std::env::var(MAPBOX_TOKEN_ENV).ok());
        Ok(config)
    }

    /// Applies the mapbox token from the environment, if set.
    pub fn apply_env_overrides(&mut self, mapbox_token: Option<String>) {
        if let Some(token) = mapbox_token.filter(|t| !t.trim().is_empty()) {
            self.map.access_token = Some(token);
        }
    }

    /// Points every data path at the default file names inside `dir`,
    /// keeping the configured boundary name property.
    pub fn use_data_dir(&mut self, dir: &Path) {
        let name_property = std::mem::take(&mut self.data.boundary_name_property);
        self.data = DataPaths {
            boundary_name_property: name_property,
            ..DataPaths::in_dir(dir)
        };
    }
}
