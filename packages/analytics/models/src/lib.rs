#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and summary statistic result types.
//!
//! These are derived values: they are recomputed from the dataset for a
//! given selection and year and never persisted.

use accident_map_accident_models::{Metric, Severity, YearFilter};
use serde::{Deserialize, Serialize};

/// One x-axis bucket of a comparison chart.
///
/// Buckets order by `key`: the numeric value for numeric metrics (age,
/// engine capacity, hour) or the category code for categorical metrics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Sort key and numeric x value.
    pub key: i64,
    /// Axis label.
    pub label: String,
}

/// Count and rate for one (bucket, severity) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityPoint {
    pub bucket: Bucket,
    pub severity: Severity,
    /// Raw number of accidents.
    pub count: u64,
    /// Accidents per 100,000 people.
    pub rate: f64,
}

/// Count and rate for one bucket over all severities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotal {
    pub bucket: Bucket,
    pub count: u64,
    pub rate: f64,
}

/// Grouped counts for one population (the selection or the nation).
///
/// Buckets without accidents are absent from both `points` and `totals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Population the rates are normalized by.
    pub population: u64,
    /// `population / 100000`.
    pub population_ratio: f64,
    /// Number of records that passed the metric's display filter.
    pub record_count: u64,
    /// Per (bucket, severity) groups, ordered by bucket then severity.
    pub points: Vec<SeverityPoint>,
    /// Per bucket groups, ordered by bucket.
    pub totals: Vec<BucketTotal>,
}

impl Series {
    /// Returns the point for a bucket key and severity, if present.
    #[must_use]
    pub fn point(&self, key: i64, severity: Severity) -> Option<&SeverityPoint> {
        self.points
            .iter()
            .find(|p| p.bucket.key == key && p.severity == severity)
    }

    /// Returns the total for a bucket key, if present.
    #[must_use]
    pub fn total(&self, key: i64) -> Option<&BucketTotal> {
        self.totals.iter().find(|t| t.bucket.key == key)
    }
}

/// Output of the aggregation engine for one (selection, year, metric).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub metric: Metric,
    pub year: YearFilter,
    /// Groups for the selected districts.
    pub selection: Series,
    /// Groups for the whole nation, when national comparison is enabled.
    pub national: Option<Series>,
}

/// Summary statistics for one group of accidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    /// Number of accidents.
    pub accident_count: u64,
    /// Accidents with a male driver.
    pub male_count: u64,
    /// Accidents with a female driver.
    pub female_count: u64,
    /// `male_count / (accident_count / 100)`; `None` without accidents.
    pub percentage_male: Option<f64>,
    /// `female_count / (accident_count / 100)`; `None` without accidents.
    pub percentage_female: Option<f64>,
    /// Mean driver age over records with a known age.
    pub mean_driver_age: Option<f64>,
    /// Mean vehicle age over records with a known age.
    pub mean_vehicle_age: Option<f64>,
}

/// Summary statistics for the selection next to the national totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryComparison {
    pub year: YearFilter,
    pub selection: GroupStats,
    pub nation: GroupStats,
    /// Selection's accident count as a percentage of the national count.
    pub selection_share: Option<f64>,
}
