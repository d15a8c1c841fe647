//! Spatial grid geometry loaded from a GeoJSON feature collection.
//!
//! Geometry is kept as raw GeoJSON and is never inspected or validated; the
//! pipeline only needs it to hand back to the renderer.

use std::io;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{grid_id::GridId, history::GRID_ID};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GridLoadError {
    #[display("failed to parse grid GeoJSON")]
    #[from]
    Json(serde_json::Error),
    #[display("grid feature #{index} has no usable 'GRID_ID' property")]
    MissingId {
        index: usize,
    },
}

/// One polygon unit of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub id: GridId,
    pub geometry: Value,
    /// Properties as read from the source file.
    pub properties: Map<String, Value>,
}

/// The full grid, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridGeometry {
    cells: Vec<GridCell>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Value,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

impl GridGeometry {
    #[must_use]
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    /// Parses a GeoJSON `FeatureCollection` whose features carry a
    /// `GRID_ID` property.
    pub fn from_reader<R>(reader: R) -> Result<Self, GridLoadError>
    where
        R: io::Read,
    {
        let collection: FeatureCollection = serde_json::from_reader(reader)?;
        let cells = collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let properties = feature.properties.unwrap_or_default();
                let id = properties
                    .get(GRID_ID)
                    .and_then(GridId::from_json)
                    .ok_or(GridLoadError::MissingId { index })?;
                Ok(GridCell {
                    id,
                    geometry: feature.geometry,
                    properties,
                })
            })
            .collect::<Result<Vec<_>, GridLoadError>>()?;

        debug!(cells = cells.len(), "parsed grid geometry");
        Ok(Self { cells })
    }

    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_feature_collection() {
        let geojson = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "GRID_ID": 7, "AREA": 1.5 },
                    "geometry": { "type": "Polygon", "coordinates": [[[-73.6, 45.5], [-73.5, 45.5], [-73.5, 45.6], [-73.6, 45.5]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "GRID_ID": "G2" },
                    "geometry": null
                }
            ]
        })
        .to_string();

        let grid = GridGeometry::from_reader(geojson.as_bytes()).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.cells()[0].id, GridId::new("7"));
        assert_eq!(grid.cells()[0].properties["AREA"], json!(1.5));
        assert_eq!(grid.cells()[0].geometry["type"], json!("Polygon"));
        assert_eq!(grid.cells()[1].id, GridId::new("G2"));
        assert!(grid.cells()[1].geometry.is_null());
    }

    #[test]
    fn test_missing_id() {
        let geojson = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"NAME":"x"},"geometry":null}]}"#;
        let err = GridGeometry::from_reader(geojson.as_bytes()).unwrap_err();
        assert!(matches!(err, GridLoadError::MissingId { index: 0 }));
    }

    #[test]
    fn test_not_geojson() {
        let err = GridGeometry::from_reader("[]".as_bytes()).unwrap_err();
        assert!(matches!(err, GridLoadError::Json(_)));
    }
}
