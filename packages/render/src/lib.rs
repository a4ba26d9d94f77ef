#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Figure rendering for the accident map dashboard.
//!
//! Every renderer is a pure function of the dataset, the selection state
//! and the user's choices. The output is a Plotly-compatible figure (or a
//! table) serialized to JSON and drawn by the frontend.

pub mod chart;
pub mod color;
pub mod figure;
pub mod map;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeMap;

    use accident_map_accident_models::{
        AccidentRecord, AreaType, DriveHand, Propulsion, Severity, SexOfDriver,
    };
    use accident_map_database::Dataset;
    use accident_map_geography::registry::DistrictRegistry;
    use accident_map_geography_models::{District, DistrictBoundary};

    pub fn record(district: &str, year: u16, severity: Severity) -> AccidentRecord {
        AccidentRecord {
            accident_index: format!("{district}-{year}"),
            district_name: district.to_string(),
            year,
            age_of_driver: Some(30),
            age_of_vehicle: Some(5),
            engine_capacity_cc: Some(1600),
            time_of_day: None,
            propulsion: Some(Propulsion::Petrol),
            sex_of_driver: Some(SexOfDriver::Male),
            area_type: Some(AreaType::Urban),
            drive_hand: Some(DriveHand::Right),
            severity,
        }
    }

    pub fn boundary(name: &str, population: u64, counts: &[(u16, u64)]) -> DistrictBoundary {
        let accidents_by_year: BTreeMap<u16, u64> = counts.iter().copied().collect();
        DistrictBoundary {
            name: name.to_string(),
            population,
            accidents_total: accidents_by_year.values().sum(),
            accidents_by_year,
            centroid: None,
            feature: serde_json::json!({
                "type": "Feature",
                "properties": {"district_name": name},
                "geometry": null,
            }),
        }
    }

    /// Leeds (500k), Bristol (400k) and York (100k, no accidents in 2016).
    pub fn dataset(records: Vec<AccidentRecord>) -> Dataset {
        let boundaries = vec![
            boundary("Leeds", 500_000, &[(2016, 1000), (2017, 1500)]),
            boundary("Bristol", 400_000, &[(2016, 400), (2017, 200)]),
            boundary("York", 100_000, &[(2016, 0), (2017, 50)]),
        ];
        let registry = DistrictRegistry::new(boundaries.iter().map(|b| District {
            name: b.name.clone(),
            population: b.population,
            latitude: 53.0,
            longitude: -1.5,
            display_label: format!("{}<br>population {}", b.name, b.population),
        }));
        Dataset::new(registry, records, boundaries)
    }
}
