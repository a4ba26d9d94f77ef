//! Lat/lon + population reference table loader.
//!
//! One row per district: name, latitude, longitude, population and a
//! precomposed hover label. Header names are matched against a few known
//! spellings and surrounding whitespace is trimmed (the published file has
//! a trailing space after `Latitude`).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::GeoError;

/// A parsed reference table row.
///
/// Coordinates and population are optional here; the registry fills gaps
/// from the boundary file where it can.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceEntry {
    /// District name.
    #[serde(alias = "Name", alias = "District", alias = "district_name")]
    pub name: String,
    /// Centroid latitude.
    #[serde(
        alias = "Latitude",
        alias = "lat",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub latitude: Option<f64>,
    /// Centroid longitude.
    #[serde(
        alias = "Longitude",
        alias = "lon",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub longitude: Option<f64>,
    /// Resident population.
    #[serde(alias = "Population", default, deserialize_with = "csv::invalid_option")]
    pub population: Option<u64>,
    /// Precomposed hover label.
    #[serde(alias = "Hover", default)]
    pub hover: Option<String>,
}

impl ReferenceEntry {
    /// Returns `(latitude, longitude)` if both are present and finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Parses the reference table from any reader.
///
/// Rows with an empty name are skipped.
///
/// # Errors
///
/// Returns [`GeoError::Csv`] if the CSV is malformed or a row cannot be
/// deserialized.
pub fn read_reference_table<R: Read>(reader: R) -> Result<Vec<ReferenceEntry>, GeoError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.deserialize::<ReferenceEntry>() {
        let entry = result?;
        if entry.name.is_empty() {
            log::debug!("Skipping reference row with empty district name");
            continue;
        }
        entries.push(entry);
    }

    log::info!("Parsed {} district reference rows", entries.len());
    Ok(entries)
}

/// Reads the reference table from a CSV file on disk.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be opened or parsed.
pub fn load_reference_table(path: &Path) -> Result<Vec<ReferenceEntry>, GeoError> {
    let file = std::fs::File::open(path)?;
    read_reference_table(file)
}
