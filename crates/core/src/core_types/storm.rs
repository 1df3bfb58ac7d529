//! Moving storm cells
//!
//! A storm cell is a circular lightning hazard drifting in a straight line along a
//! great circle. Positions are projected in whole-hour steps.

use crate::geo::destination_point;
use serde::{Deserialize, Serialize};

/// Convective cell with constant speed and heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StormCell {
    pub id: String,
    pub center_lat: f64,
    pub center_lon: f64,
    /// Footprint radius (km)
    pub radius_km: f64,
    /// Ground speed (km/h)
    pub speed_kmh: f64,
    /// Direction of travel (degrees clockwise from north)
    pub bearing_deg: f64,
}

impl StormCell {
    /// Center position `(lat, lon)` after `hours` of travel
    pub fn project(&self, hours: f64) -> (f64, f64) {
        destination_point(
            self.center_lat,
            self.center_lon,
            self.bearing_deg,
            self.speed_kmh * hours,
        )
    }
}
