//! Engine configuration
//!
//! All weights, thresholds and routing parameters live in one immutable [`EngineConfig`]
//! value that is passed into every engine call; nothing is read from global state.
//! Every section deserializes with defaults, so a JSON file only needs the keys it
//! overrides:
//!
//! ```
//! use stormwatch_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "horizon_hours": 3 }"#).unwrap();
//! assert_eq!(config.horizon_hours, 3);
//! assert_eq!(config.threat_threshold, 0.44);
//! ```

use crate::core_types::BoundingBox;
use crate::error::{EngineError, Result};
use crate::geo::LAND_POLYGON;
use crate::routing::AssignmentStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default region: Northern California, site of the August 2020 lightning siege
pub const DEFAULT_BBOX: BoundingBox = BoundingBox {
    min_lon: -124.5,
    min_lat: 36.0,
    max_lon: -118.0,
    max_lat: 39.5,
};

/// Start of the default replay window
pub const DEFAULT_START: &str = "2020-08-15T00:00:00Z";

/// End of the default replay window
pub const DEFAULT_END: &str = "2020-08-19T23:00:00Z";

/// Weights combining the three layers into severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerWeights {
    pub fuel: f64,
    pub atmospheric: f64,
    pub consequence: f64,
}

impl Default for LayerWeights {
    fn default() -> Self {
        Self {
            fuel: 0.4,
            atmospheric: 0.4,
            consequence: 0.2,
        }
    }
}

/// Fuel layer sub-weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelWeights {
    pub ndvi: f64,
    pub slope: f64,
    pub fuel_type: f64,
}

impl Default for FuelWeights {
    fn default() -> Self {
        Self {
            ndvi: 0.5,
            slope: 0.3,
            fuel_type: 0.2,
        }
    }
}

/// Atmospheric layer sub-weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphericWeights {
    pub cape: f64,
    pub dewpoint_depression: f64,
    pub cloud_base: f64,
    pub low_rh: f64,
    pub precip_efficiency: f64,
}

impl Default for AtmosphericWeights {
    fn default() -> Self {
        Self {
            cape: 0.3,
            dewpoint_depression: 0.25,
            cloud_base: 0.2,
            low_rh: 0.2,
            precip_efficiency: 0.05,
        }
    }
}

/// Consequence layer sub-weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsequenceWeights {
    pub population: f64,
    pub infrastructure: f64,
}

impl Default for ConsequenceWeights {
    fn default() -> Self {
        Self {
            population: 0.6,
            infrastructure: 0.4,
        }
    }
}

/// Descending priority-score cut-offs for response labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    /// Cells whose consequence score is below this are always labelled low
    pub min_consequence: f64,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            critical: 0.485,
            high: 0.465,
            medium: 0.448,
            min_consequence: 0.05,
        }
    }
}

/// Drone dispatch parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Number of leading threats considered as targets
    pub top_n: usize,
    pub drone_count: usize,
    pub speed_kmh: f64,
    pub range_km: f64,
    pub solver: AssignmentStrategy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            drone_count: 5,
            speed_kmh: 120.0,
            range_km: 200.0,
            solver: AssignmentStrategy::Optimal,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid_resolution_deg: f64,
    /// Forecast hours checked for storm collisions (1..=horizon)
    pub horizon_hours: u32,
    /// Minimum severity for a cell to be checked against storms
    pub threat_threshold: f64,
    pub simulate_step_hours: i64,
    pub layer_weights: LayerWeights,
    pub fuel: FuelWeights,
    pub atmospheric: AtmosphericWeights,
    pub consequence: ConsequenceWeights,
    pub priority: PriorityThresholds,
    pub routing: RoutingConfig,
    /// Closed `[lon, lat]` ring; cells not fully inside are dropped
    pub land_polygon: Vec<[f64; 2]>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_resolution_deg: 0.05,
            horizon_hours: 6,
            threat_threshold: 0.44,
            simulate_step_hours: 6,
            layer_weights: LayerWeights::default(),
            fuel: FuelWeights::default(),
            atmospheric: AtmosphericWeights::default(),
            consequence: ConsequenceWeights::default(),
            priority: PriorityThresholds::default(),
            routing: RoutingConfig::default(),
            land_polygon: LAND_POLYGON.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigLoad(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigLoad(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    /// Check values that would make the engine misbehave
    pub fn validate(&self) -> Result<()> {
        if !self.grid_resolution_deg.is_finite() || self.grid_resolution_deg <= 0.0 {
            return Err(EngineError::InvalidResolution(self.grid_resolution_deg));
        }
        if self.simulate_step_hours <= 0 {
            return Err(EngineError::InvalidStep(self.simulate_step_hours));
        }
        if !self.routing.speed_kmh.is_finite() || self.routing.speed_kmh <= 0.0 {
            return Err(EngineError::InvalidConfig {
                name: "routing.speed_kmh",
                reason: format!("must be finite and positive, got {}", self.routing.speed_kmh),
            });
        }
        if self.routing.range_km.is_nan() || self.routing.range_km < 0.0 {
            return Err(EngineError::InvalidConfig {
                name: "routing.range_km",
                reason: format!("must be non-negative, got {}", self.routing.range_km),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = EngineConfig::default();
        assert_eq!(config.grid_resolution_deg, 0.05);
        assert_eq!(config.horizon_hours, 6);
        assert_eq!(config.routing.top_n, 20);
        assert_eq!(config.routing.drone_count, 5);
        assert_eq!(config.priority.critical, 0.485);
        assert_eq!(config.land_polygon.len(), 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = EngineConfig::from_json_str(
            r#"{ "routing": { "drone_count": 2, "solver": "greedy" }, "fuel": { "ndvi": 0.7 } }"#,
        )
        .unwrap();
        assert_eq!(config.routing.drone_count, 2);
        assert_eq!(config.routing.solver, AssignmentStrategy::Greedy);
        assert_eq!(config.routing.range_km, 200.0);
        assert_eq!(config.fuel.ndvi, 0.7);
        assert_eq!(config.fuel.slope, 0.3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "simulate_step_hours": 0 }"#),
            Err(EngineError::InvalidStep(0))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "grid_resolution_deg": -1.0 }"#),
            Err(EngineError::InvalidResolution(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "routing": { "speed_kmh": 0.0 } }"#),
            Err(EngineError::InvalidConfig { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(EngineError::ConfigLoad(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = EngineConfig::load("/nonexistent/stormwatch.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigLoad(_)));
    }
}
