//! Risk and plain-grid overlays.

use std::collections::BTreeMap;

use firerisk_data::{
    grid::GridGeometry,
    history::{GRID_ID, RISK_NEXT_MONTH},
    risk::{RiskAnnotatedGrid, RiskLevel},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    layer::{GeoJsonLayer, PathStyle, StyledFeature},
    view::MapView,
};

pub const LOW_RISK_COLOR: &str = "#fecc5c";
pub const HIGH_RISK_COLOR: &str = "#bd0026";
/// Fill for risk levels missing from a [`ColorScale`].
pub const FALLBACK_COLOR: &str = "#cccccc";

const RISK_LAYER_NAME: &str = "Fire Risk";
const RISK_STROKE: &str = "black";
const RISK_WEIGHT: f64 = 0.5;
const RISK_FILL_OPACITY: f64 = 0.7;

const GRID_LAYER_NAME: &str = "Fire Risk Grid";
const GRID_STROKE: &str = "#000000";
const GRID_WEIGHT: f64 = 1.0;
const GRID_FILL_OPACITY: f64 = 0.3;

/// Fill color per risk level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScale {
    colors: BTreeMap<RiskLevel, String>,
}

impl ColorScale {
    /// A scale with no entries; every level renders with [`FALLBACK_COLOR`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, level: RiskLevel, color: impl Into<String>) -> Self {
        self.colors.insert(level, color.into());
        self
    }

    #[must_use]
    pub fn color(&self, level: RiskLevel) -> &str {
        self.colors.get(&level).map_or(FALLBACK_COLOR, String::as_str)
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::empty()
            .with(RiskLevel::Low, LOW_RISK_COLOR)
            .with(RiskLevel::High, HIGH_RISK_COLOR)
    }
}

/// Adds one risk layer for `grid` on top of `map` and returns it.
///
/// Layers accumulate: overlaying the same view twice yields two layers, so
/// each render should start from a fresh base map.
///
/// ```
/// # use firerisk_data::{frame::LabelVector, grid::GridGeometry, risk::annotate};
/// # use firerisk_map::{choropleth::{overlay, ColorScale}, view::create_base_map};
/// let grid = GridGeometry::default();
/// let risk = annotate(&LabelVector::new(), &grid);
/// let map = overlay(create_base_map(), &risk, &ColorScale::default());
/// assert_eq!(map.layers().len(), 1);
/// ```
#[must_use]
pub fn overlay(mut map: MapView, grid: &RiskAnnotatedGrid<'_>, colors: &ColorScale) -> MapView {
    let mut layer = GeoJsonLayer::new(RISK_LAYER_NAME);
    layer.features = grid
        .cells()
        .iter()
        .map(|cell| StyledFeature {
            geometry: cell.geometry().clone(),
            properties: cell.properties(),
            style: PathStyle {
                fill_color: colors.color(cell.risk).to_owned(),
                color: RISK_STROKE.to_owned(),
                weight: RISK_WEIGHT,
                fill_opacity: RISK_FILL_OPACITY,
            },
            tooltip: vec![
                (GRID_ID.to_owned(), cell.id().to_string()),
                (RISK_NEXT_MONTH.to_owned(), cell.risk.to_string()),
            ],
        })
        .collect();

    debug!(features = layer.features.len(), "added risk overlay");
    map.add_layer(layer);
    map
}

/// Adds the bare grid, without risk data, on top of `map`.
#[must_use]
pub fn overlay_grid(mut map: MapView, grid: &GridGeometry) -> MapView {
    let mut layer = GeoJsonLayer::new(GRID_LAYER_NAME);
    layer.features = grid
        .cells()
        .iter()
        .map(|cell| {
            let mut properties = cell.properties.clone();
            properties.insert(GRID_ID.to_owned(), Value::String(cell.id.to_string()));
            StyledFeature {
                geometry: cell.geometry.clone(),
                properties,
                style: PathStyle {
                    fill_color: LOW_RISK_COLOR.to_owned(),
                    color: GRID_STROKE.to_owned(),
                    weight: GRID_WEIGHT,
                    fill_opacity: GRID_FILL_OPACITY,
                },
                tooltip: vec![(GRID_ID.to_owned(), cell.id.to_string())],
            }
        })
        .collect();

    debug!(features = layer.features.len(), "added grid overlay");
    map.add_layer(layer);
    map
}

#[cfg(test)]
mod tests {
    use firerisk_data::{frame::LabelVector, grid::GridCell, grid_id::GridId, risk::annotate};
    use serde_json::{Map, json};

    use super::*;
    use crate::view::create_base_map;

    fn grid() -> GridGeometry {
        GridGeometry::new(
            ["G1", "G2", "G3"]
                .iter()
                .map(|id| GridCell {
                    id: GridId::new(id),
                    geometry: json!({ "type": "Polygon", "coordinates": [] }),
                    properties: Map::new(),
                })
                .collect(),
        )
    }

    fn labels() -> LabelVector {
        [("G1", 1), ("G2", 0), ("G3", 4)].into_iter().collect()
    }

    #[test]
    fn test_risk_colors() {
        let grid = grid();
        let risk = annotate(&labels(), &grid);
        let map = overlay(create_base_map(), &risk, &ColorScale::default());

        let fills: Vec<_> = map.layers()[0]
            .features
            .iter()
            .map(|f| f.style.fill_color.as_str())
            .collect();
        assert_eq!(fills, [HIGH_RISK_COLOR, LOW_RISK_COLOR, FALLBACK_COLOR]);

        let style = &map.layers()[0].features[0].style;
        assert_eq!(style.color, "black");
        assert!((style.weight - 0.5).abs() < f64::EPSILON);
        assert!((style.fill_opacity - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_high_color_falls_back() {
        let grid = grid();
        let risk = annotate(&labels(), &grid);
        let colors = ColorScale::empty().with(RiskLevel::Low, "#ffffb2");
        let map = overlay(create_base_map(), &risk, &colors);

        let first = &map.layers()[0].features[0];
        assert_eq!(first.style.fill_color, FALLBACK_COLOR);
        assert_eq!(map.layers()[0].features[1].style.fill_color, "#ffffb2");
    }

    #[test]
    fn test_tooltip_has_id_and_risk() {
        let grid = grid();
        let risk = annotate(&labels(), &grid);
        let map = overlay(create_base_map(), &risk, &ColorScale::default());
        let feature = &map.layers()[0].features[0];

        assert_eq!(
            feature.tooltip,
            [
                ("GRID_ID".to_owned(), "G1".to_owned()),
                ("RISK_NEXT_MONTH".to_owned(), "high".to_owned())
            ]
        );
        assert_eq!(feature.properties["GRID_ID"], "G1");
    }

    #[test]
    fn test_overlay_stacks_layers() {
        let grid = grid();
        let risk = annotate(&labels(), &grid);
        let colors = ColorScale::default();
        let map = overlay(overlay(create_base_map(), &risk, &colors), &risk, &colors);
        assert_eq!(map.layers().len(), 2);
    }

    #[test]
    fn test_plain_grid() {
        let map = overlay_grid(create_base_map(), &grid());
        let layer = &map.layers()[0];

        assert_eq!(layer.name, "Fire Risk Grid");
        assert_eq!(layer.features.len(), 3);
        let feature = &layer.features[2];
        assert_eq!(feature.tooltip, [("GRID_ID".to_owned(), "G3".to_owned())]);
        assert!((feature.style.fill_opacity - 0.3).abs() < f64::EPSILON);
        assert_eq!(feature.style.color, "#000000");
    }
}
