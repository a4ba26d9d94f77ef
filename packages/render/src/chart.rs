//! Comparison charts for the selected districts.
//!
//! Without national comparison the chart stacks one bar trace per severity
//! (severe, moderate, light). With it, two traces compare the selection's
//! per-bucket totals against the nation's. Engine capacity is drawn as a
//! binned histogram instead of bars.

use std::collections::BTreeSet;

use accident_map_accident_models::{Metric, Severity, YearFilter};
use accident_map_analytics::cache::AggregationCache;
use accident_map_analytics_models::{AggregationResult, Bucket, Series};
use accident_map_database::Dataset;
use accident_map_selection::SelectionState;

use crate::figure::{
    Axis, AxisValue, Figure, Font, HistogramTrace, Layout, Legend, Margin, Marker, Title, Trace,
    XyTrace,
};

/// Title of the figure shown before anything is selected.
pub const PLACEHOLDER_TITLE: &str = "Click-drag on the map to select districts";

pub const BACKGROUND_COLOR: &str = "#e3e3e3";
pub const GRID_COLOR: &str = "#787878";
pub const TEXT_COLOR: &str = "#000000";

pub const SELECTION_COLOR: &str = "#1a76ff";
pub const NATION_COLOR: &str = "#d62728";

pub const SELECTION_NAME: &str = "Selected districts";
pub const NATION_NAME: &str = "Total nation";

pub const Y_AXIS_TITLE: &str = "Accidents per 100,000 people";
pub const SEVERITY_LEGEND_TITLE: &str = "Accident Severity";
pub const COMPARISON_LEGEND_TITLE: &str = "Population";

/// Number of histogram bins for engine capacity.
pub const HISTOGRAM_BINS: u32 = 200;

const MARGIN: Margin = Margin {
    t: 75,
    r: 50,
    b: 100,
    l: 50,
};

/// Static figure shown while no district is selected.
#[must_use]
pub fn placeholder() -> Figure {
    Figure {
        data: vec![Trace::Scatter(XyTrace {
            x: vec![AxisValue::Number(0)],
            y: vec![0.0],
            ..XyTrace::default()
        })],
        layout: Layout {
            title: Some(Title::new(PLACEHOLDER_TITLE)),
            paper_bgcolor: Some(BACKGROUND_COLOR.to_string()),
            plot_bgcolor: Some(BACKGROUND_COLOR.to_string()),
            font: Some(Font::color(TEXT_COLOR)),
            margin: Some(Margin { l: 75, ..MARGIN }),
            ..Layout::default()
        },
    }
}

/// Chart heading, e.g. "Accidents per age of driver for 2018". The sum
/// spans the first to the last year on record.
#[must_use]
pub fn chart_title(metric: Metric, year: YearFilter, years: &BTreeSet<u16>) -> String {
    let period = match year {
        YearFilter::Year(year) => year.to_string(),
        YearFilter::Sum => match (years.first(), years.last()) {
            (Some(first), Some(last)) if first != last => format!("{first}-{last}"),
            (Some(only), _) => only.to_string(),
            _ => "all years".to_string(),
        },
    };
    format!("{} for {period}", metric.label())
}

/// Renders the chart for the current selection, or the placeholder when
/// nothing is selected. Aggregations go through `cache`.
#[must_use]
pub fn render_chart(
    dataset: &Dataset,
    cache: &AggregationCache,
    selection: &SelectionState,
    year: YearFilter,
    metric: Metric,
    show_national: bool,
) -> Figure {
    let Some(names) = selection.as_set() else {
        return placeholder();
    };
    let result = cache.get_or_compute(dataset, names, year, metric, show_national);
    chart_figure(&result, show_national, &dataset.years())
}

/// Turns an aggregation into a figure.
#[must_use]
pub fn chart_figure(result: &AggregationResult, show_national: bool, years: &BTreeSet<u16>) -> Figure {
    let metric = result.metric;

    let (data, legend_title, barmode) = match result.national.as_ref().filter(|_| show_national) {
        Some(national) => (
            vec![
                totals_trace(metric, &result.selection, SELECTION_NAME, SELECTION_COLOR),
                totals_trace(metric, national, NATION_NAME, NATION_COLOR),
            ],
            COMPARISON_LEGEND_TITLE,
            if metric.is_histogram() { "overlay" } else { "group" },
        ),
        None => {
            if show_national {
                log::warn!("National comparison requested without national series for {metric}");
            }
            (
                Severity::STACK_ORDER
                    .iter()
                    .map(|severity| severity_trace(metric, &result.selection, *severity))
                    .collect(),
                SEVERITY_LEGEND_TITLE,
                "stack",
            )
        }
    };

    let axis_font = || Some(Font::color(TEXT_COLOR));

    let mut xaxis = Axis {
        title: Some(Title::new(metric.axis_title())),
        tickfont: axis_font(),
        gridcolor: Some(GRID_COLOR.to_string()),
        ..Axis::default()
    };
    if !metric.is_numeric() {
        xaxis.categoryorder = Some("array".to_string());
        xaxis.categoryarray = category_labels(result);
    }

    Figure {
        data,
        layout: Layout {
            title: Some(Title {
                text: chart_title(metric, result.year, years),
                font: Some(Font::color(TEXT_COLOR)),
            }),
            paper_bgcolor: Some(BACKGROUND_COLOR.to_string()),
            plot_bgcolor: Some(BACKGROUND_COLOR.to_string()),
            font: Some(Font::color(TEXT_COLOR)),
            margin: Some(MARGIN),
            xaxis: Some(xaxis),
            yaxis: Some(Axis {
                title: Some(Title::new(Y_AXIS_TITLE)),
                tickfont: axis_font(),
                gridcolor: Some(GRID_COLOR.to_string()),
                ..Axis::default()
            }),
            legend: Some(Legend {
                title: Title::new(legend_title),
            }),
            barmode: Some(barmode.to_string()),
            ..Layout::default()
        },
    }
}

fn x_value(metric: Metric, bucket: &Bucket) -> AxisValue {
    if metric.is_numeric() {
        AxisValue::Number(bucket.key)
    } else {
        AxisValue::Label(bucket.label.clone())
    }
}

/// Category labels in bucket order across both series.
fn category_labels(result: &AggregationResult) -> Vec<String> {
    let buckets: BTreeSet<&Bucket> = result
        .selection
        .totals
        .iter()
        .chain(result.national.iter().flat_map(|n| n.totals.iter()))
        .map(|t| &t.bucket)
        .collect();
    buckets.into_iter().map(|b| b.label.clone()).collect()
}

fn trace(metric: Metric, name: &str, color: &str, x: Vec<AxisValue>, y: Vec<f64>) -> Trace {
    if metric.is_histogram() {
        Trace::Histogram(HistogramTrace {
            name: Some(name.to_string()),
            x,
            y,
            histfunc: "sum".to_string(),
            nbinsx: HISTOGRAM_BINS,
            marker: Some(Marker::color(color)),
        })
    } else {
        Trace::Bar(XyTrace {
            name: Some(name.to_string()),
            x,
            y,
            marker: Some(Marker::color(color)),
            textposition: Some("outside".to_string()),
        })
    }
}

fn severity_trace(metric: Metric, series: &Series, severity: Severity) -> Trace {
    let (x, y) = series
        .points
        .iter()
        .filter(|p| p.severity == severity)
        .map(|p| (x_value(metric, &p.bucket), p.rate))
        .unzip();
    trace(metric, severity.as_ref(), severity.color(), x, y)
}

fn totals_trace(metric: Metric, series: &Series, name: &str, color: &str) -> Trace {
    let (x, y) = series
        .totals
        .iter()
        .map(|t| (x_value(metric, &t.bucket), t.rate))
        .unzip();
    trace(metric, name, color, x, y)
}
