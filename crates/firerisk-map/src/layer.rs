use serde::Serialize;
use serde_json::{Map, Value, json};

/// Leaflet path options for one polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub fill_color: String,
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    pub fill_opacity: f64,
}

/// One polygon with its style and tooltip rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledFeature {
    pub geometry: Value,
    pub properties: Map<String, Value>,
    pub style: PathStyle,
    /// `(field, value)` pairs shown in the tooltip, in order.
    pub tooltip: Vec<(String, String)>,
}

impl StyledFeature {
    /// GeoJSON `Feature` with the style and rendered tooltip attached as
    /// `style` and `tooltip` members.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": self.geometry,
            "properties": self.properties,
            "style": self.style,
            "tooltip": tooltip_html(&self.tooltip),
        })
    }
}

/// A named GeoJSON overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonLayer {
    pub name: String,
    pub features: Vec<StyledFeature>,
}

impl GeoJsonLayer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: vec![],
        }
    }

    #[must_use]
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "name": self.name,
            "features": self.features.iter().map(StyledFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}

fn tooltip_html(rows: &[(String, String)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(field, value)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_html(field),
                escape_html(value)
            )
        })
        .collect();
    format!("<table>{rows}</table>")
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
