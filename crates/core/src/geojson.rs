//! Minimal `GeoJSON` feature model
//!
//! Threats are published as `Polygon` features and drone routes as `LineString` features,
//! both with flat property maps. Only the two geometry types the engine emits are
//! modelled.

use serde::{Deserialize, Serialize};

/// Round a published value to `decimals` places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Geometry of a feature; coordinates are `[lon, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    LineString { coordinates: Vec<[f64; 2]> },
}

impl Geometry {
    /// Single-ring polygon
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        Self::Polygon {
            coordinates: vec![ring],
        }
    }

    /// Two-point line
    pub fn line(from: [f64; 2], to: [f64; 2]) -> Self {
        Self::LineString {
            coordinates: vec![from, to],
        }
    }

    /// Outer ring of a polygon; `None` for other geometries
    pub fn exterior(&self) -> Option<&[[f64; 2]]> {
        match self {
            Self::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
            Self::LineString { .. } => None,
        }
    }
}

/// Feature with typed properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature<P> {
    pub geometry: Geometry,
    pub properties: P,
}

/// Ordered collection of features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature<P>> {
        self.features.iter()
    }
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, P> IntoIterator for &'a FeatureCollection<P> {
    type Item = &'a Feature<P>;
    type IntoIter = std::slice::Iter<'a, Feature<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
