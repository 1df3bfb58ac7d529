//! Geographic bounding box

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Axis-aligned lon/lat box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a validated bounding box
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let bbox = Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check that all bounds are finite and `min < max` on both axes
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_lat >= self.max_lat || self.min_lon >= self.max_lon {
            return Err(EngineError::InvalidBoundingBox {
                min_lon: self.min_lon,
                min_lat: self.min_lat,
                max_lon: self.max_lon,
                max_lat: self.max_lat,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Inclusive containment test
    #[inline]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    /// Center point as `(lat, lon)`
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.min_lat, self.max_lat),
            f64::midpoint(self.min_lon, self.max_lon),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bbox() {
        let bbox = BoundingBox::new(-124.5, 36.0, -118.0, 39.5).unwrap();
        assert_eq!(bbox.lat_span(), 3.5);
        assert_eq!(bbox.lon_span(), 6.5);
        assert!(bbox.contains(-121.0, 38.0));
        assert!(!bbox.contains(-117.0, 38.0));
        assert_eq!(bbox.center(), (37.75, -121.25));
    }

    #[test]
    fn test_inverted_bbox_rejected() {
        assert!(BoundingBox::new(-118.0, 36.0, -124.5, 39.5).is_err());
        assert!(BoundingBox::new(-124.5, 39.5, -118.0, 36.0).is_err());
        // Degenerate (zero-width) boxes are rejected too
        assert!(BoundingBox::new(-120.0, 36.0, -120.0, 39.5).is_err());
    }

    #[test]
    fn test_non_finite_bbox_rejected() {
        assert!(BoundingBox::new(f64::NAN, 36.0, -118.0, 39.5).is_err());
        assert!(BoundingBox::new(-124.5, 36.0, f64::INFINITY, 39.5).is_err());
    }
}
