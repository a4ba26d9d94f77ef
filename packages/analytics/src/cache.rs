//! Memoized aggregation.
//!
//! Every renderer that needs grouped counts asks for them independently.
//! The dataset never changes after load, so results keyed by
//! (selection, year, metric, national comparison) stay valid for the life
//! of the process. The cache is bounded; the oldest entry is evicted first.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, RwLock};

use accident_map_accident_models::{Metric, YearFilter};
use accident_map_analytics_models::AggregationResult;
use accident_map_database::Dataset;

use crate::aggregate::aggregate;

/// Default number of cached aggregation results.
pub const DEFAULT_CAPACITY: usize = 256;

/// Cache key for one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AggregationKey {
    pub selection: BTreeSet<String>,
    pub year: YearFilter,
    pub metric: Metric,
    pub compare_national: bool,
}

#[derive(Debug, Default)]
struct Entries {
    results: BTreeMap<AggregationKey, Arc<AggregationResult>>,
    insertion_order: VecDeque<AggregationKey>,
}

/// Bounded memo of [`aggregate`] results, safe to share between threads.
#[derive(Debug)]
pub struct AggregationCache {
    capacity: usize,
    entries: RwLock<Entries>,
}

impl Default for AggregationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AggregationCache {
    /// Creates a cache holding at most `capacity` results (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Returns the cached result for the key, computing and storing it on a
    /// miss. A poisoned lock degrades to computing without caching.
    pub fn get_or_compute(
        &self,
        dataset: &Dataset,
        selection: &BTreeSet<String>,
        year: YearFilter,
        metric: Metric,
        compare_national: bool,
    ) -> Arc<AggregationResult> {
        let key = AggregationKey {
            selection: selection.clone(),
            year,
            metric,
            compare_national,
        };

        if let Ok(entries) = self.entries.read()
            && let Some(hit) = entries.results.get(&key)
        {
            log::trace!("Aggregation cache hit for {metric} ({year})");
            return Arc::clone(hit);
        }

        let result = Arc::new(aggregate(dataset, selection, year, metric, compare_national));

        if let Ok(mut entries) = self.entries.write() {
            if !entries.results.contains_key(&key) {
                while entries.results.len() >= self.capacity {
                    let Some(oldest) = entries.insertion_order.pop_front() else {
                        break;
                    };
                    entries.results.remove(&oldest);
                }
                entries.insertion_order.push_back(key.clone());
            }
            entries.results.insert(key, Arc::clone(&result));
        }

        result
    }

    /// Number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |e| e.results.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
