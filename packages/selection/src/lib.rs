#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District selection state.
//!
//! The selection is the single source of truth consumed by the map, the
//! comparison charts and the summary table. It changes on exactly three
//! events: a lasso gesture on the map (replaces the whole set), and the
//! add / remove buttons next to the district text input (insert or delete
//! one name). Nothing else, including year or metric changes, touches it.
//!
//! All operations are pure: they take the current state and return the
//! next one. The caller owns the state and triggers re-rendering.

pub mod hover;

use std::collections::BTreeSet;

use accident_map_geography::registry::DistrictRegistry;
use serde::{Deserialize, Serialize};

/// Current set of selected districts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "districts", rename_all = "snake_case")]
pub enum SelectionState {
    /// No selection event has happened yet.
    #[default]
    Pristine,
    /// A selection event left nothing selected.
    Cleared,
    /// One or more districts are selected. Never empty.
    Active(BTreeSet<String>),
}

impl SelectionState {
    /// Builds a state from a set of names; an empty set becomes
    /// [`Self::Cleared`].
    #[must_use]
    pub fn from_names(names: BTreeSet<String>) -> Self {
        if names.is_empty() {
            Self::Cleared
        } else {
            Self::Active(names)
        }
    }

    /// Selected names, empty unless [`Self::Active`].
    #[must_use]
    pub fn districts(&self) -> Vec<&str> {
        match self {
            Self::Active(names) => names.iter().map(String::as_str).collect(),
            Self::Pristine | Self::Cleared => Vec::new(),
        }
    }

    /// The selected set, if any district is selected.
    #[must_use]
    pub const fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Active(names) => Some(names),
            Self::Pristine | Self::Cleared => None,
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.as_set().is_some_and(|names| names.contains(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.as_set().map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !matches!(self, Self::Active(_))
    }
}

/// One point captured by a lasso gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LassoPoint {
    /// Structured district identity attached to the point.
    #[serde(default, alias = "customdata")]
    pub district: Option<String>,
    /// Hover text of the point (`"<name><br>..."`).
    #[serde(default)]
    pub text: Option<String>,
}

impl LassoPoint {
    /// The district this point belongs to: the structured identity when
    /// present, otherwise the name decoded from the hover text.
    #[must_use]
    pub fn district_name(&self) -> Option<&str> {
        self.district
            .as_deref()
            .map(str::trim)
            .or_else(|| self.text.as_deref().map(hover::decode_district))
            .filter(|name| !name.is_empty())
    }
}

/// Result of a lasso gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LassoPayload {
    /// Points inside the lasso.
    #[serde(default)]
    pub points: Vec<LassoPoint>,
}

/// Applies selection events against the district registry.
#[derive(Debug, Clone, Copy)]
pub struct SelectionManager<'a> {
    registry: &'a DistrictRegistry,
}

impl<'a> SelectionManager<'a> {
    #[must_use]
    pub const fn new(registry: &'a DistrictRegistry) -> Self {
        Self { registry }
    }

    /// Replaces the selection with the districts inside a lasso.
    ///
    /// Point order and duplicates do not matter. Names unknown to the
    /// registry are dropped. A lasso with no recognisable districts yields
    /// [`SelectionState::Cleared`].
    #[must_use]
    pub fn apply_lasso(&self, payload: &LassoPayload) -> SelectionState {
        let mut names = BTreeSet::new();

        for point in &payload.points {
            let Some(name) = point.district_name() else {
                continue;
            };
            if self.registry.contains(name) {
                names.insert(name.to_string());
            } else {
                log::debug!("Lasso point names unknown district '{name}'");
            }
        }

        log::debug!(
            "Lasso selected {} districts from {} points",
            names.len(),
            payload.points.len()
        );

        SelectionState::from_names(names)
    }

    /// Adds the district the fragment resolves to. Unresolvable fragments
    /// and names already selected leave the state unchanged.
    #[must_use]
    pub fn add(&self, state: &SelectionState, fragment: &str) -> SelectionState {
        let Some(name) = self.registry.resolve_fragment(fragment) else {
            return state.clone();
        };
        if state.contains(name) {
            return state.clone();
        }

        let mut names = state.as_set().cloned().unwrap_or_default();
        names.insert(name.to_string());
        SelectionState::Active(names)
    }

    /// Removes the district the fragment resolves to. Unresolvable
    /// fragments and names not selected leave the state unchanged.
    /// Removing the last district yields [`SelectionState::Cleared`].
    #[must_use]
    pub fn remove(&self, state: &SelectionState, fragment: &str) -> SelectionState {
        let Some(name) = self.registry.resolve_fragment(fragment) else {
            return state.clone();
        };
        let Some(current) = state.as_set().filter(|names| names.contains(name)) else {
            return state.clone();
        };

        let mut names = current.clone();
        names.remove(name);
        SelectionState::from_names(names)
    }
}
