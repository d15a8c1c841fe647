//! Standalone HTML rendering of a [`MapView`].
//!
//! The page loads Leaflet from a CDN and embeds every layer as GeoJSON. Each
//! feature carries its own `style` and pre-escaped `tooltip`, so the script
//! only has to hand them to Leaflet.

use serde_json::Value;

use crate::{layer::escape_html, view::MapView};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

impl MapView {
    /// Renders the map as a self-contained HTML page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let options = &self.options;
        let layers = Value::Array(self.layers().iter().map(|l| l.to_geojson()).collect());
        let fit_bounds = serde_json::to_value(options.fit_bounds).unwrap_or(Value::Null);
        let map_options = serde_json::to_value(options).unwrap_or(Value::Null);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="{css}">
    <script src="{js}"></script>
    <style>
        html, body {{ margin: 0; padding: 0; }}
        #map {{ width: {width}; height: {height}; }}
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
        const map = L.map("map", {map_options});
        L.tileLayer({tile_url}, {{ attribution: {tile_attribution} }}).addTo(map);
        map.fitBounds({fit_bounds});
        for (const layer of {layers}) {{
            L.geoJSON(layer, {{
                style: (feature) => feature.style,
                onEachFeature: (feature, path) => path.bindTooltip(feature.tooltip, {{ sticky: true }}),
            }}).addTo(map);
        }}
    </script>
</body>
</html>
"#,
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            width = escape_html(&options.width),
            height = escape_html(&options.height),
            map_options = script_json(&map_options),
            tile_url = script_json(&Value::String(options.tile_url.clone())),
            tile_attribution = script_json(&Value::String(options.tile_attribution.clone())),
            fit_bounds = script_json(&fit_bounds),
            layers = script_json(&layers),
        )
    }
}

/// JSON that is safe to embed inside a `<script>` element.
fn script_json(value: &Value) -> String {
    value
        .to_string()
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
