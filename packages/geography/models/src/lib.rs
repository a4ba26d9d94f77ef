#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District and district boundary types.
//!
//! A [`District`] is the unit of selection and aggregation. A
//! [`DistrictBoundary`] is one feature of the boundary file together with
//! the per-year accident counts it carries, used to color the map.

use std::collections::BTreeMap;

use accident_map_accident_models::YearFilter;
use serde::{Deserialize, Serialize};

/// Divisor that turns a population into a "per 100,000 people" ratio.
pub const PER_POPULATION: f64 = 100_000.0;

/// A local-authority district as loaded from the lat/lon reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    /// Unique district name.
    pub name: String,
    /// Resident population.
    pub population: u64,
    /// Centroid latitude.
    pub latitude: f64,
    /// Centroid longitude.
    pub longitude: f64,
    /// Precomposed hover label shown on the map.
    pub display_label: String,
}

/// One district polygon from the boundary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictBoundary {
    /// District name (joins to [`District::name`]).
    pub name: String,
    /// Population recorded on the feature.
    pub population: u64,
    /// Accident counts keyed by calendar year.
    pub accidents_by_year: BTreeMap<u16, u64>,
    /// Accident count over all years.
    pub accidents_total: u64,
    /// Polygon centroid as `(latitude, longitude)`, when computable.
    pub centroid: Option<(f64, f64)>,
    /// The raw `GeoJSON` feature, forwarded verbatim to the map layer.
    pub feature: serde_json::Value,
}

impl DistrictBoundary {
    /// Accident count for the given year filter. Years absent from the
    /// feature count as zero.
    #[must_use]
    pub fn accident_count(&self, year: YearFilter) -> u64 {
        match year {
            YearFilter::Year(y) => self.accidents_by_year.get(&y).copied().unwrap_or(0),
            YearFilter::Sum => self.accidents_total,
        }
    }

    /// Accidents per 100,000 residents for the given year filter. A zero
    /// population yields `0.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accidents_per_100k(&self, year: YearFilter) -> f64 {
        if self.population == 0 {
            return 0.0;
        }
        self.accident_count(year) as f64 / self.population as f64 * PER_POPULATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary() -> DistrictBoundary {
        DistrictBoundary {
            name: "Leeds".to_string(),
            population: 500_000,
            accidents_by_year: BTreeMap::from([(2016, 1000), (2017, 1500)]),
            accidents_total: 2500,
            centroid: None,
            feature: serde_json::Value::Null,
        }
    }

    #[test]
    fn counts_by_year_and_sum() {
        let b = boundary();
        assert_eq!(b.accident_count(YearFilter::Year(2016)), 1000);
        assert_eq!(b.accident_count(YearFilter::Year(2020)), 0);
        assert_eq!(b.accident_count(YearFilter::Sum), 2500);
    }

    #[test]
    fn rate_per_100k() {
        let b = boundary();
        assert!((b.accidents_per_100k(YearFilter::Year(2016)) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_population_has_zero_rate() {
        let mut b = boundary();
        b.population = 0;
        assert!(b.accidents_per_100k(YearFilter::Sum).abs() < f64::EPSILON);
    }
}
