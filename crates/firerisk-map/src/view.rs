use serde::Serialize;

use crate::layer::GeoJsonLayer;

/// A `[latitude, longitude]` pair, serialized the way Leaflet expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng(pub f64, pub f64);

/// South-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds(pub LatLng, pub LatLng);

// Calibrated for the island of Montreal.
pub const CENTER: LatLng = LatLng(45.55, -73.6);
pub const ZOOM_START: u8 = 11;
pub const MIN_ZOOM: u8 = 10;
pub const MAX_BOUNDS: Bounds = Bounds(LatLng(45.35, -74.0), LatLng(45.75, -73.2));
pub const FIT_BOUNDS: Bounds = Bounds(LatLng(45.4, -73.9), LatLng(45.7, -73.4));

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    /// Panning and zooming are clamped to these bounds.
    pub max_bounds: Bounds,
    /// Bounds shown when the map first loads.
    #[serde(skip)]
    pub fit_bounds: Bounds,
    #[serde(skip)]
    pub width: String,
    #[serde(skip)]
    pub height: String,
    #[serde(skip)]
    pub tile_url: String,
    #[serde(skip)]
    pub tile_attribution: String,
}

/// A map and its overlay layers, ready to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub options: MapOptions,
    layers: Vec<GeoJsonLayer>,
}

impl MapView {
    #[must_use]
    pub fn new(options: MapOptions) -> Self {
        Self {
            options,
            layers: vec![],
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[GeoJsonLayer] {
        &self.layers
    }

    /// Appends a layer on top of the existing ones.
    pub fn add_layer(&mut self, layer: GeoJsonLayer) -> &mut Self {
        self.layers.push(layer);
        self
    }
}

/// A fresh map of Montreal with no overlay.
///
/// ```
/// # use firerisk_map::view::{create_base_map, CENTER};
/// let map = create_base_map();
/// assert_eq!(map.options.center, CENTER);
/// assert!(map.layers().is_empty());
/// ```
#[must_use]
pub fn create_base_map() -> MapView {
    MapView::new(MapOptions {
        center: CENTER,
        zoom: ZOOM_START,
        min_zoom: MIN_ZOOM,
        max_bounds: MAX_BOUNDS,
        fit_bounds: FIT_BOUNDS,
        width: "100%".to_owned(),
        height: "580px".to_owned(),
        tile_url: TILE_URL.to_owned(),
        tile_attribution: TILE_ATTRIBUTION.to_owned(),
    })
}
