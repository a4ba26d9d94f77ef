#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory accident dataset for the accident map.
//!
//! The [`Dataset`] bundles the district registry, the accident record table
//! and the district boundaries. It is loaded once at startup, never
//! mutated afterwards, and handed to every consumer explicitly (usually
//! behind an `Arc`).

pub mod accidents;
pub mod paths;

use std::collections::BTreeSet;

use accident_map_accident_models::{AccidentRecord, YearFilter};
use accident_map_geography::registry::DistrictRegistry;
use accident_map_geography::{GeoError, boundaries, reference};
use accident_map_geography_models::DistrictBoundary;

use crate::paths::DataPaths;

/// Errors that can occur while loading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading a source file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Loading district geography failed.
    #[error("Geography error: {0}")]
    Geography(#[from] GeoError),
}

/// Read-only accident data shared by all renderers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    registry: DistrictRegistry,
    records: Vec<AccidentRecord>,
    boundaries: Vec<DistrictBoundary>,
}

impl Dataset {
    #[must_use]
    pub const fn new(
        registry: DistrictRegistry,
        records: Vec<AccidentRecord>,
        boundaries: Vec<DistrictBoundary>,
    ) -> Self {
        Self {
            registry,
            records,
            boundaries,
        }
    }

    /// Loads the boundary file, the reference table and the accident
    /// table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any of the three files cannot be read or
    /// parsed.
    pub fn load(paths: &DataPaths) -> Result<Self, DbError> {
        log::info!("Loading district boundaries from {}", paths.boundaries.display());
        let boundaries =
            boundaries::load_boundaries(&paths.boundaries, &paths.boundary_name_property)?;

        log::info!(
            "Loading district reference table from {}",
            paths.reference_table.display()
        );
        let entries = reference::load_reference_table(&paths.reference_table)?;
        let registry = DistrictRegistry::build(entries, &boundaries);

        log::info!("Loading accident records from {}", paths.accidents.display());
        let (records, _report) = accidents::load_accidents(&paths.accidents)?;

        let unknown = records
            .iter()
            .filter(|r| !registry.contains(&r.district_name))
            .count();
        if unknown > 0 {
            log::warn!(
                "{unknown} accident records reference districts missing from the registry"
            );
        }

        Ok(Self::new(registry, records, boundaries))
    }

    #[must_use]
    pub const fn registry(&self) -> &DistrictRegistry {
        &self.registry
    }

    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    #[must_use]
    pub fn boundaries(&self) -> &[DistrictBoundary] {
        &self.boundaries
    }

    /// Records that pass the year filter.
    pub fn records_in(&self, year: YearFilter) -> impl Iterator<Item = &AccidentRecord> {
        self.records.iter().filter(move |r| year.includes(r.year))
    }

    /// Distinct calendar years present in the accident table.
    #[must_use]
    pub fn years(&self) -> BTreeSet<u16> {
        self.records.iter().map(|r| r.year).collect()
    }
}
