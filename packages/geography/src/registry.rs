//! In-memory registry of all known districts.
//!
//! The registry is the single authority on which district names exist.
//! It is built once at startup from the reference table, completed with
//! districts that only appear in the boundary file, and then shared
//! read-only.

use std::collections::BTreeMap;

use accident_map_geography_models::{District, DistrictBoundary};

use crate::reference::ReferenceEntry;

/// All known districts keyed by their unique name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistrictRegistry {
    districts: BTreeMap<String, District>,
}

impl DistrictRegistry {
    /// Creates a registry from a list of districts. If a name occurs more
    /// than once, the first occurrence wins.
    #[must_use]
    pub fn new(districts: impl IntoIterator<Item = District>) -> Self {
        let mut map = BTreeMap::new();
        for district in districts {
            if map.contains_key(&district.name) {
                log::warn!("Duplicate district '{}' ignored", district.name);
                continue;
            }
            map.insert(district.name.clone(), district);
        }
        Self { districts: map }
    }

    /// Builds the registry from reference table rows, filling missing
    /// coordinates and population from the boundary file.
    ///
    /// Districts that only exist in the boundary file are added with their
    /// polygon centroid and their name as display label. Districts with no
    /// coordinates from either source are dropped.
    #[must_use]
    pub fn build(entries: Vec<ReferenceEntry>, boundaries: &[DistrictBoundary]) -> Self {
        let by_name: BTreeMap<&str, &DistrictBoundary> =
            boundaries.iter().map(|b| (b.name.as_str(), b)).collect();

        let mut districts = Vec::with_capacity(entries.len().max(boundaries.len()));
        let mut dropped = 0usize;

        for entry in entries {
            let boundary = by_name.get(entry.name.as_str()).copied();
            let Some((latitude, longitude)) = entry
                .coordinates()
                .or_else(|| boundary.and_then(|b| b.centroid))
            else {
                dropped += 1;
                continue;
            };
            let population = entry
                .population
                .or_else(|| boundary.map(|b| b.population))
                .unwrap_or(0);
            let display_label = entry
                .hover
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| entry.name.clone());

            districts.push(District {
                name: entry.name,
                population,
                latitude,
                longitude,
                display_label,
            });
        }

        let mut registry = Self::new(districts);

        for boundary in boundaries {
            if registry.contains(&boundary.name) {
                continue;
            }
            let Some((latitude, longitude)) = boundary.centroid else {
                dropped += 1;
                continue;
            };
            registry.districts.insert(
                boundary.name.clone(),
                District {
                    name: boundary.name.clone(),
                    population: boundary.population,
                    latitude,
                    longitude,
                    display_label: boundary.name.clone(),
                },
            );
        }

        if dropped > 0 {
            log::warn!("Dropped {dropped} districts without coordinates");
        }
        log::info!("District registry holds {} districts", registry.len());

        registry
    }

    /// Looks up a district by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&District> {
        self.districts.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.districts.contains_key(name)
    }

    /// Iterates over all districts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &District> {
        self.districts.values()
    }

    /// Iterates over all district names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.districts.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    /// Total population of every district in the registry.
    #[must_use]
    pub fn national_population(&self) -> u64 {
        self.districts.values().map(|d| d.population).sum()
    }

    /// Total population of the named districts. Unknown names contribute
    /// nothing.
    pub fn population_of<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> u64 {
        names
            .into_iter()
            .filter_map(|name| self.districts.get(name))
            .map(|d| d.population)
            .sum()
    }

    /// Resolves a user-typed fragment to exactly one district name.
    ///
    /// An exact name match wins. Otherwise the fragment must be a substring
    /// of exactly one district name. Empty, unmatched and ambiguous
    /// fragments resolve to `None`.
    #[must_use]
    pub fn resolve_fragment(&self, fragment: &str) -> Option<&str> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return None;
        }

        if let Some((name, _)) = self.districts.get_key_value(fragment) {
            return Some(name.as_str());
        }

        let mut matches = self.names().filter(|name| name.contains(fragment));
        let first = matches.next()?;
        if matches.next().is_some() {
            log::debug!("Fragment '{fragment}' is ambiguous, ignoring");
            return None;
        }
        Some(first)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn district(name: &str, population: u64) -> District {
        District {
            name: name.to_string(),
            population,
            latitude: 53.0,
            longitude: -1.5,
            display_label: name.to_string(),
        }
    }

    fn registry() -> DistrictRegistry {
        DistrictRegistry::new([
            district("Leeds", 500_000),
            district("Bristol, City of", 460_000),
            district("Bradford", 540_000),
            district("Kingston upon Hull, City of", 260_000),
        ])
    }

    #[test]
    fn exact_match_wins() {
        let registry = DistrictRegistry::new([district("York", 1), district("North Yorkshire", 2)]);
        assert_eq!(registry.resolve_fragment("York"), Some("York"));
    }

    #[test]
    fn unique_substring_resolves() {
        assert_eq!(registry().resolve_fragment("Bristol"), Some("Bristol, City of"));
        assert_eq!(registry().resolve_fragment("  Leeds "), Some("Leeds"));
    }

    #[test]
    fn ambiguous_or_unknown_fragments_are_ignored() {
        let registry = registry();
        assert_eq!(registry.resolve_fragment("City of"), None);
        assert_eq!(registry.resolve_fragment("Atlantis"), None);
        assert_eq!(registry.resolve_fragment("   "), None);
    }

    #[test]
    fn duplicate_names_keep_first() {
        let registry = DistrictRegistry::new([district("Leeds", 1), district("Leeds", 2)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Leeds").unwrap().population, 1);
    }

    #[test]
    fn population_of_all_equals_national() {
        let registry = registry();
        let all = registry.population_of(registry.names());
        assert_eq!(all, registry.national_population());
        assert_eq!(all, 1_760_000);
        assert_eq!(registry.population_of(["Leeds", "Nowhere"]), 500_000);
    }

    #[test]
    fn build_fills_gaps_from_boundaries() {
        let boundary = |name: &str, population: u64| DistrictBoundary {
            name: name.to_string(),
            population,
            accidents_by_year: BTreeMap::new(),
            accidents_total: 0,
            centroid: Some((51.45, -2.58)),
            feature: serde_json::Value::Null,
        };
        let entries = vec![
            ReferenceEntry {
                name: "Bristol".to_string(),
                latitude: None,
                longitude: None,
                population: None,
                hover: None,
            },
            ReferenceEntry {
                name: "Nowhere".to_string(),
                latitude: None,
                longitude: None,
                population: Some(5),
                hover: None,
            },
        ];

        let registry =
            DistrictRegistry::build(entries, &[boundary("Bristol", 460_000), boundary("Bath", 90_000)]);

        assert_eq!(registry.len(), 2);
        let bristol = registry.get("Bristol").unwrap();
        assert_eq!(bristol.population, 460_000);
        assert!((bristol.latitude - 51.45).abs() < f64::EPSILON);
        assert_eq!(bristol.display_label, "Bristol");
        assert!(registry.contains("Bath"));
        assert!(!registry.contains("Nowhere"));
    }
}
