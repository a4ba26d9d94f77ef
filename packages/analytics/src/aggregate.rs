//! Grouped, population-normalized accident counts.
//!
//! Pipeline: filter records to the selected districts and the year, map
//! each record to its metric bucket (dropping values the metric excludes),
//! count per (bucket, severity) and per bucket, and divide by the
//! population ratio. The national series runs the same pipeline over every
//! record and the national population.

use std::collections::{BTreeMap, BTreeSet};

use accident_map_accident_models::{AccidentRecord, Metric, Severity, YearFilter};
use accident_map_analytics_models::{AggregationResult, Bucket, BucketTotal, Series, SeverityPoint};
use accident_map_database::Dataset;
use accident_map_geography::registry::DistrictRegistry;
use chrono::Timelike as _;

/// Vehicles older than this are left out of the vehicle age chart.
pub const MAX_VEHICLE_AGE: u16 = 40;

/// Engines larger than this are left out of the engine capacity chart.
pub const MAX_ENGINE_CAPACITY_CC: u32 = 8000;

const PER_POPULATION: f64 = 100_000.0;

/// `population / 100000`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_ratio(population: u64) -> f64 {
    population as f64 / PER_POPULATION
}

/// Maps a record to its bucket for `metric`.
///
/// Returns `None` when the value is missing or falls outside the range the
/// chart displays:
///
/// * vehicle age above [`MAX_VEHICLE_AGE`]
/// * engine capacity above [`MAX_ENGINE_CAPACITY_CC`]
/// * the unknown sentinels of propulsion, sex and drive hand (already
///   decoded to `None` at load time)
#[must_use]
pub fn bucket_for(record: &AccidentRecord, metric: Metric) -> Option<Bucket> {
    match metric {
        Metric::DriverAge => record.age_of_driver.map(numeric_bucket),
        Metric::VehicleAge => record
            .age_of_vehicle
            .filter(|age| *age <= MAX_VEHICLE_AGE)
            .map(numeric_bucket),
        Metric::EngineCapacity => record
            .engine_capacity_cc
            .filter(|cc| *cc <= MAX_ENGINE_CAPACITY_CC)
            .map(numeric_bucket),
        Metric::TimeOfDay => record.time_of_day.map(|t| Bucket {
            key: i64::from(t.hour()),
            label: format!("{:02}:00", t.hour()),
        }),
        Metric::Propulsion => record
            .propulsion
            .map(|p| code_bucket(p as i64, p.label())),
        Metric::SexOfDriver => record
            .sex_of_driver
            .map(|s| code_bucket(s as i64, s.label())),
        Metric::UrbanOrRural => record
            .area_type
            .map(|a| code_bucket(a as i64, a.label())),
        Metric::DriveHand => record
            .drive_hand
            .map(|d| code_bucket(d as i64, d.label())),
    }
}

fn numeric_bucket<T: Into<i64> + Copy + std::fmt::Display>(value: T) -> Bucket {
    Bucket {
        key: value.into(),
        label: value.to_string(),
    }
}

fn code_bucket(key: i64, label: &str) -> Bucket {
    Bucket {
        key,
        label: label.to_string(),
    }
}

/// Aggregates accidents of the selected districts for one metric and year.
///
/// Callers are expected to short-circuit empty selections to a placeholder
/// before calling this. With `compare_national`, the same groups are
/// computed over the whole dataset and normalized by the national
/// population.
#[must_use]
pub fn aggregate(
    dataset: &Dataset,
    selection: &BTreeSet<String>,
    year: YearFilter,
    metric: Metric,
    compare_national: bool,
) -> AggregationResult {
    let registry = dataset.registry();

    let selected = dataset
        .records_in(year)
        .filter(|r| selection.contains(&r.district_name));
    let selection_series = build_series(
        selected,
        metric,
        selection_population(registry, selection),
    );

    let national = compare_national.then(|| {
        build_series(
            dataset.records_in(year),
            metric,
            registry.national_population(),
        )
    });

    log::debug!(
        "Aggregated {metric} for {} districts ({year}): {} selected records",
        selection.len(),
        selection_series.record_count
    );

    AggregationResult {
        metric,
        year,
        selection: selection_series,
        national,
    }
}

fn selection_population(registry: &DistrictRegistry, selection: &BTreeSet<String>) -> u64 {
    registry.population_of(selection.iter().map(String::as_str))
}

/// Counts records per (bucket, severity) and per bucket and normalizes the
/// counts by `population`. A zero population yields zero rates.
fn build_series<'a>(
    records: impl Iterator<Item = &'a AccidentRecord>,
    metric: Metric,
    population: u64,
) -> Series {
    let mut by_severity: BTreeMap<(Bucket, Severity), u64> = BTreeMap::new();
    let mut by_bucket: BTreeMap<Bucket, u64> = BTreeMap::new();
    let mut record_count = 0u64;

    for record in records {
        let Some(bucket) = bucket_for(record, metric) else {
            continue;
        };
        record_count += 1;
        *by_bucket.entry(bucket.clone()).or_default() += 1;
        *by_severity.entry((bucket, record.severity)).or_default() += 1;
    }

    let ratio = population_ratio(population);
    #[allow(clippy::cast_precision_loss)]
    let rate = |count: u64| {
        if ratio > 0.0 {
            count as f64 / ratio
        } else {
            0.0
        }
    };

    let points = by_severity
        .into_iter()
        .map(|((bucket, severity), count)| SeverityPoint {
            bucket,
            severity,
            count,
            rate: rate(count),
        })
        .collect();

    let totals = by_bucket
        .into_iter()
        .map(|(bucket, count)| BucketTotal {
            bucket,
            count,
            rate: rate(count),
        })
        .collect();

    Series {
        population,
        population_ratio: ratio,
        record_count,
        points,
        totals,
    }
}
