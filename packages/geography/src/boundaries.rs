//! District boundary file loader.
//!
//! The boundary file is a `GeoJSON` `FeatureCollection` with one polygon
//! feature per district. Each feature carries the district name, its
//! population and accident counts as properties:
//!
//! * `number_of_accidents_<year>` for each individual year
//! * `number_of_accidents` for all years combined

use std::collections::BTreeMap;
use std::path::Path;

use accident_map_geography_models::DistrictBoundary;
use geo::Centroid;
use geojson::{Feature, GeoJson};

use crate::GeoError;

/// Property holding the district name unless configured otherwise.
pub const DEFAULT_NAME_PROPERTY: &str = "district_name";

const POPULATION_PROPERTY: &str = "population";
const TOTAL_COUNT_PROPERTY: &str = "number_of_accidents";
const YEAR_COUNT_PREFIX: &str = "number_of_accidents_";

/// Parses a boundary `FeatureCollection` from a string.
///
/// Features without a string name property are skipped with a warning.
/// Missing count properties count as zero; if the all-years property is
/// absent it is derived from the per-year counts.
///
/// # Errors
///
/// Returns [`GeoError`] if the input is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_boundaries(
    geojson_str: &str,
    name_property: &str,
) -> Result<Vec<DistrictBoundary>, GeoError> {
    let geojson: GeoJson = geojson_str.parse()?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::Conversion {
            message: "Boundary file is not a GeoJSON FeatureCollection".to_string(),
        });
    };

    let mut boundaries = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;

    for feature in collection.features {
        let Some(name) = feature
            .property(name_property)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string)
        else {
            skipped += 1;
            continue;
        };

        boundaries.push(boundary_from_feature(name, feature)?);
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} boundary features without a '{name_property}' property");
    }

    log::info!("Parsed {} district boundaries", boundaries.len());
    Ok(boundaries)
}

/// Reads and parses the boundary file at `path`.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read or parsed.
pub fn load_boundaries(path: &Path, name_property: &str) -> Result<Vec<DistrictBoundary>, GeoError> {
    let contents = std::fs::read_to_string(path)?;
    parse_boundaries(&contents, name_property)
}

fn boundary_from_feature(name: String, feature: Feature) -> Result<DistrictBoundary, GeoError> {
    let population = feature
        .property(POPULATION_PROPERTY)
        .and_then(count_value)
        .unwrap_or_else(|| {
            log::warn!("Boundary '{name}' has no usable population property");
            0
        });

    let mut accidents_by_year = BTreeMap::new();
    let mut accidents_total = None;

    for (key, value) in feature.properties_iter() {
        if key == TOTAL_COUNT_PROPERTY {
            accidents_total = count_value(value);
        } else if let Some(year) = key
            .strip_prefix(YEAR_COUNT_PREFIX)
            .and_then(|y| y.parse::<u16>().ok())
        {
            accidents_by_year.insert(year, count_value(value).unwrap_or(0));
        }
    }

    let accidents_total = accidents_total.unwrap_or_else(|| accidents_by_year.values().sum());
    let centroid = feature.geometry.as_ref().and_then(geometry_centroid);
    let feature = serde_json::to_value(&feature)?;

    Ok(DistrictBoundary {
        name,
        population,
        accidents_by_year,
        accidents_total,
        centroid,
        feature,
    })
}

/// Reads a non-negative count from a number or numeric string property.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_value(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Centroid of a polygon geometry as `(latitude, longitude)`.
fn geometry_centroid(geometry: &geojson::Geometry) -> Option<(f64, f64)> {
    let geo_geom: geo::Geometry<f64> = geometry.clone().try_into().ok()?;
    let point = geo_geom.centroid()?;
    Some((point.y(), point.x()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "district_name": "Leeds",
                    "population": 500000,
                    "number_of_accidents_2016": 1000,
                    "number_of_accidents_2017": 1200.0,
                    "number_of_accidents": 2200
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-2.0, 53.0], [-1.0, 53.0], [-1.0, 54.0], [-2.0, 54.0], [-2.0, 53.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "district_name": "York",
                    "population": "210000",
                    "number_of_accidents_2016": 30,
                    "number_of_accidents_2017": 40
                },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "population": 10 },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn parses_counts_and_population() {
        let boundaries = parse_boundaries(COLLECTION, DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(boundaries.len(), 2);

        let leeds = &boundaries[0];
        assert_eq!(leeds.name, "Leeds");
        assert_eq!(leeds.population, 500_000);
        assert_eq!(leeds.accidents_by_year.get(&2017), Some(&1200));
        assert_eq!(leeds.accidents_total, 2200);
    }

    #[test]
    fn derives_total_when_missing() {
        let boundaries = parse_boundaries(COLLECTION, DEFAULT_NAME_PROPERTY).unwrap();
        let york = &boundaries[1];
        assert_eq!(york.population, 210_000);
        assert_eq!(york.accidents_total, 70);
        assert_eq!(york.centroid, None);
    }

    #[test]
    fn computes_polygon_centroid() {
        let boundaries = parse_boundaries(COLLECTION, DEFAULT_NAME_PROPERTY).unwrap();
        let (lat, lon) = boundaries[0].centroid.unwrap();
        assert!((lat - 53.5).abs() < 1e-9);
        assert!((lon - -1.5).abs() < 1e-9);
    }

    #[test]
    fn keeps_raw_feature_for_map_layer() {
        let boundaries = parse_boundaries(COLLECTION, DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(boundaries[0].feature["type"], "Feature");
        assert_eq!(boundaries[0].feature["properties"]["district_name"], "Leeds");
    }

    #[test]
    fn rejects_non_collection() {
        let point = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(parse_boundaries(point, DEFAULT_NAME_PROPERTY).is_err());
    }
}
