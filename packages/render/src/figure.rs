//! Declarative figure description consumed by the Plotly frontend.
//!
//! Only the attributes the dashboard sets are modelled. Unset optional
//! attributes are omitted from the JSON so Plotly falls back to its own
//! defaults.

use serde::{Deserialize, Serialize};

/// A complete figure: traces plus layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// One trace, tagged by its Plotly trace type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(XyTrace),
    Bar(XyTrace),
    Histogram(HistogramTrace),
    Scattermapbox(MapPointTrace),
}

/// An x value: numeric for value metrics, a label for categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(i64),
    Label(String),
}

/// Scatter or bar trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XyTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
}

/// Histogram trace over pre-counted values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistogramTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Vec<AxisValue>,
    pub y: Vec<f64>,
    pub histfunc: String,
    pub nbinsx: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

/// Invisible hover points placed on the district centroids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPointTrace {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub text: Vec<String>,
    /// District identity, returned verbatim by lasso events.
    pub customdata: Vec<String>,
    pub hoverinfo: String,
    pub marker: Marker,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Marker {
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Mapbox>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Title {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
}

impl Font {
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub r: u32,
    pub b: u32,
    pub l: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    /// `"array"` to order categories by [`Self::categoryarray`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categoryarray: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mapbox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    pub style: String,
    pub center: MapCenter,
    pub zoom: f64,
    pub layers: Vec<MapLayer>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// A filled `GeoJSON` polygon drawn under the hover points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapLayer {
    pub sourcetype: String,
    pub source: serde_json::Value,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub color: String,
    pub opacity: f64,
    pub fill: LayerFill,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerFill {
    pub outlinecolor: String,
}

/// A text annotation. Legend swatches are drawn as arrows with zero
/// length in `y`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showarrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrowcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrowwidth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrowhead: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traces_serialize_with_plotly_type_tag() {
        let trace = Trace::Bar(XyTrace {
            name: Some("light".to_string()),
            x: vec![AxisValue::Number(30), AxisValue::Label("Petrol".to_string())],
            y: vec![1.0, 2.0],
            marker: Some(Marker::color("#ffbf00")),
            textposition: None,
        });
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["x"][0], 30);
        assert_eq!(json["x"][1], "Petrol");
        assert_eq!(json["marker"]["color"], "#ffbf00");
        assert!(json.get("textposition").is_none());
    }

    #[test]
    fn unset_layout_fields_are_omitted() {
        let layout = Layout {
            title: Some(Title::new("Hello")),
            ..Layout::default()
        };
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json, serde_json::json!({"title": {"text": "Hello"}}));
    }

    #[test]
    fn map_layer_type_is_renamed() {
        let layer = MapLayer {
            layer_type: "fill".to_string(),
            ..MapLayer::default()
        };
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["type"], "fill");
        assert!(json.get("layer_type").is_none());
    }
}
