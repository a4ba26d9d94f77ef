//! District heatmap.
//!
//! Each boundary polygon becomes a filled mapbox layer colored by its
//! accidents per 100,000 residents. An invisible scatter trace on the
//! district centroids carries the hover text and the district identity
//! that lasso gestures report back.

use std::collections::{BTreeMap, BTreeSet};

use accident_map_accident_models::YearFilter;
use accident_map_database::Dataset;
use accident_map_geography_models::DistrictBoundary;
use accident_map_selection::{SelectionState, hover};
use serde::{Deserialize, Serialize};

use crate::color::{BUCKETS, ColorRamp, SELECTED_COLOR};
use crate::figure::{
    Annotation, Figure, Font, LayerFill, Layout, MapCenter, MapLayer, MapPointTrace, Mapbox,
    Margin, Marker, Trace,
};

/// Hover title preceding a district's rate.
pub const HOVER_TITLE: &str = "Accidents per 100,000 people: ";

const LEGEND_X: f64 = 0.95;
const LEGEND_TOP: f64 = 0.85;
const LEGEND_SPAN: f64 = 0.25;

/// Basemap settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct MapOptions {
    /// Mapbox access token; the frontend's own token is used when absent.
    pub access_token: Option<String>,
    pub style: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    /// Opacity of the district fill layers.
    pub opacity: f64,
    pub outline_color: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            access_token: None,
            style: "mapbox://styles/mapbox/light-v10".to_string(),
            center_lat: 55.0,
            center_lon: -3.9,
            zoom: 5.3,
            opacity: 0.8,
            outline_color: "#afafaf".to_string(),
        }
    }
}

/// Map figure together with the heading shown above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub title: String,
    pub figure: Figure,
}

#[must_use]
pub fn map_title(year: YearFilter) -> String {
    match year {
        YearFilter::Year(year) => {
            format!("Heatmap of population adjusted accident rate per district for {year}")
        }
        YearFilter::Sum => "heatmap of population adjusted accident rate of last 5 years".to_string(),
    }
}

/// Largest per-100k value the ramp has to cover.
///
/// For a single year this is the maximum over every individual year on
/// record, so colors stay comparable when the year changes. For the sum
/// it is the maximum of the all-years column.
#[must_use]
pub fn observed_maximum(boundaries: &[DistrictBoundary], year: YearFilter) -> f64 {
    let filters: Vec<YearFilter> = match year {
        YearFilter::Year(_) => boundaries
            .iter()
            .flat_map(|b| b.accidents_by_year.keys().copied())
            .collect::<BTreeSet<u16>>()
            .into_iter()
            .map(YearFilter::Year)
            .collect(),
        YearFilter::Sum => vec![YearFilter::Sum],
    };

    boundaries
        .iter()
        .flat_map(|b| filters.iter().map(|f| b.accidents_per_100k(*f)))
        .fold(0.0, f64::max)
}

/// Renders the heatmap for `year`, tinting the selected districts.
#[must_use]
pub fn render_map(
    dataset: &Dataset,
    selection: &SelectionState,
    year: YearFilter,
    options: &MapOptions,
) -> MapView {
    let boundaries = dataset.boundaries();
    let ramp = ColorRamp::from_observed(observed_maximum(boundaries, year));

    let layers = boundaries
        .iter()
        .map(|boundary| {
            let color = if selection.contains(&boundary.name) {
                SELECTED_COLOR.to_string()
            } else {
                ramp.color(boundary.accidents_per_100k(year))
            };
            MapLayer {
                sourcetype: "geojson".to_string(),
                source: boundary.feature.clone(),
                layer_type: "fill".to_string(),
                color,
                opacity: options.opacity,
                fill: LayerFill {
                    outlinecolor: options.outline_color.clone(),
                },
            }
        })
        .collect();

    log::debug!(
        "Rendering map for {year}: {} districts, ramp max {}",
        boundaries.len(),
        ramp.max()
    );

    MapView {
        title: map_title(year),
        figure: Figure {
            data: vec![Trace::Scattermapbox(hover_points(dataset, year))],
            layout: Layout {
                mapbox: Some(Mapbox {
                    accesstoken: options.access_token.clone(),
                    style: options.style.clone(),
                    center: MapCenter {
                        lat: options.center_lat,
                        lon: options.center_lon,
                    },
                    zoom: options.zoom,
                    layers,
                }),
                hovermode: Some("closest".to_string()),
                dragmode: Some("lasso".to_string()),
                margin: Some(Margin::default()),
                annotations: legend(&ramp),
                ..Layout::default()
            },
        },
    }
}

fn hover_points(dataset: &Dataset, year: YearFilter) -> MapPointTrace {
    let by_name: BTreeMap<&str, &DistrictBoundary> = dataset
        .boundaries()
        .iter()
        .map(|b| (b.name.as_str(), b))
        .collect();

    let mut trace = MapPointTrace {
        hoverinfo: "text".to_string(),
        marker: Marker {
            color: Some("white".to_string()),
            size: Some(5.0),
            opacity: Some(0.0),
        },
        ..MapPointTrace::default()
    };

    for district in dataset.registry().iter() {
        let value = by_name.get(district.name.as_str()).map_or_else(
            || "n/a".to_string(),
            |b| format!("{:.0}", b.accidents_per_100k(year)),
        );
        trace.lat.push(district.latitude);
        trace.lon.push(district.longitude);
        trace
            .text
            .push(hover::encode_hover(&district.display_label, HOVER_TITLE, &value));
        trace.customdata.push(district.name.clone());
    }

    trace
}

fn legend(ramp: &ColorRamp) -> Vec<Annotation> {
    let black = || Some(Font::color("#000000"));

    let mut annotations = vec![Annotation {
        text: "<b>Number of car accidents<br>per 100,000 people</b>".to_string(),
        x: LEGEND_X,
        y: 0.95,
        xref: Some("paper".to_string()),
        yref: Some("paper".to_string()),
        showarrow: Some(false),
        align: Some("right".to_string()),
        font: black(),
        ..Annotation::default()
    }];

    for (index, (bound, color)) in (0u32..).zip(ramp.boundaries()) {
        annotations.push(Annotation {
            text: format!("{bound:.0}"),
            x: LEGEND_X,
            y: LEGEND_TOP - f64::from(index) / f64::from(BUCKETS) * LEGEND_SPAN,
            xref: Some("paper".to_string()),
            yref: Some("paper".to_string()),
            arrowcolor: Some(color),
            arrowwidth: Some(5.0),
            arrowhead: Some(0),
            ax: Some(-60.0),
            ay: Some(0.0),
            font: black(),
            ..Annotation::default()
        });
    }

    annotations
}
