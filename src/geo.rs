//! Typed model for the slice of GeoJSON the region geometry file uses.
//!
//! `regions.geojson` is a FeatureCollection of Polygon / MultiPolygon
//! features whose properties carry the region `code` and `nom`. Nothing else
//! is needed, so nothing else is modeled.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    pub code: String,
    pub nom: String,
}

/// GeoJSON positions may carry an altitude, so each position is parsed as a
/// plain Vec<f64> and truncated to (lon, lat) during ring extraction.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// One region's outline, ready for projection: every ring (outer and holes)
/// of every polygon, as (lon, lat) pairs.
#[derive(Debug, Clone)]
pub struct RegionShape {
    pub code: String,
    pub name: String,
    pub rings: Vec<Vec<(f64, f64)>>,
}

impl Geometry {
    /// Flattens the polygon nesting into a ring list, dropping malformed
    /// positions with fewer than two coordinates.
    pub fn rings(&self) -> Vec<Vec<(f64, f64)>> {
        fn ring(positions: &[Vec<f64>]) -> Vec<(f64, f64)> {
            positions
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| (p[0], p[1]))
                .collect()
        }

        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.iter().map(|r| ring(r)).collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter().map(|r| ring(r)))
                .collect(),
        }
    }
}

impl Feature {
    pub fn into_shape(self) -> RegionShape {
        let rings = self.geometry.rings();
        RegionShape {
            code: self.properties.code,
            name: self.properties.nom,
            rings,
        }
    }
}
