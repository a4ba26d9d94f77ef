#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine for the accident map.
//!
//! Given a set of selected districts and a year filter, [`aggregate`]
//! groups accidents by a chart [`Metric`](accident_map_accident_models::Metric)
//! bucket and severity and normalizes the counts per 100,000 people, for
//! the selection and optionally for the nation. [`summary::summarize`]
//! computes the numbers behind the summary table. [`cache::AggregationCache`]
//! memoizes aggregation results, since every renderer asks for them
//! independently.

pub mod aggregate;
pub mod cache;
pub mod summary;

pub use aggregate::{aggregate, bucket_for, population_ratio};
