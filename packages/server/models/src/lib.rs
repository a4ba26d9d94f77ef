#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the accident map server.
//!
//! These types are serialized to JSON for the REST API. Figures and tables
//! are passed through from the render crate as-is; this crate only holds
//! the envelope types the frontend controls are built from.

use accident_map_accident_models::{Metric, YearFilter};
use accident_map_selection::SelectionState;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// One entry of the year selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiYearOption {
    /// Text shown in the selector.
    pub label: String,
    /// Value sent back as the `year` query parameter.
    pub value: YearFilter,
}

/// One entry of the metric dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetricOption {
    pub label: String,
    /// Value sent back as the `metric` query parameter.
    pub value: Metric,
}

/// Choices for the dashboard controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Years on record, oldest first, followed by the all-years sum.
    pub years: Vec<ApiYearOption>,
    /// Year selected when the dashboard opens.
    pub default_year: YearFilter,
    pub metrics: Vec<ApiMetricOption>,
    /// Heading of the national column in the summary table.
    pub nation_label: String,
}

/// The selection as shown in the "Selected districts" tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSelection {
    pub state: SelectionState,
    /// Selected district names in display order.
    pub districts: Vec<String>,
    /// Hint shown instead of the list when nothing is selected.
    pub message: Option<String>,
}

/// Body of the add / remove endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRequest {
    /// Text typed into the district input; matched against district names.
    #[serde(alias = "value")]
    pub fragment: String,
}

/// Query parameters for the map and summary endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearQueryParams {
    /// A four-digit year or `sum`. Defaults to the configured year.
    pub year: Option<String>,
}

/// Query parameters for the chart endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQueryParams {
    /// A four-digit year or `sum`. Defaults to the configured year.
    pub year: Option<String>,
    /// Metric wire name. Defaults to the configured metric.
    pub metric: Option<String>,
    /// Whether to compare the selection against the nation.
    pub national: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_request_accepts_value_alias() {
        let request: FragmentRequest = serde_json::from_str(r#"{"value": "Leeds"}"#).unwrap();
        assert_eq!(request.fragment, "Leeds");
    }

    #[test]
    fn options_serialize_wire_values() {
        let options = ApiOptions {
            years: vec![
                ApiYearOption {
                    label: "2018".to_string(),
                    value: YearFilter::Year(2018),
                },
                ApiYearOption {
                    label: "2016-2020".to_string(),
                    value: YearFilter::Sum,
                },
            ],
            default_year: YearFilter::Sum,
            metrics: vec![ApiMetricOption {
                label: Metric::DriverAge.label().to_string(),
                value: Metric::DriverAge,
            }],
            nation_label: "England".to_string(),
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["years"][0]["value"], "2018");
        assert_eq!(json["years"][1]["value"], "sum");
        assert_eq!(json["defaultYear"], "sum");
        assert_eq!(json["metrics"][0]["value"], "driver_age");
        assert_eq!(json["nationLabel"], "England");
    }
}
