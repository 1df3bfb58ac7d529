//! Drone dispatch
//!
//! Drones are spread round-robin over depots (`drone-1` at the first depot, `drone-2` at
//! the second, ...). The leading threats of a ranked collection become targets at their
//! cell centroids, and a pluggable [`AssignmentSolver`] matches drones to targets on
//! great-circle distance. Targets beyond the flight range cost `1e9 + distance`, so the
//! solver only uses them when nothing else is left; such pairs are then dropped.
//!
//! An empty fleet or threat list yields no routes rather than an error. An empty depot
//! list launches from the default bases.

mod greedy;
mod hungarian;
mod solver;

pub use greedy::GreedySolver;
pub use hungarian::HungarianSolver;
pub use solver::{create_assignment_solver, AssignmentSolver, AssignmentStrategy};

use crate::config::RoutingConfig;
use crate::error::{EngineError, Result};
use crate::geo::{haversine_km, ring_centroid};
use crate::geojson::{round_to, Feature, FeatureCollection, Geometry};
use crate::threat::ThreatCollection;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Cost floor for targets beyond range
pub const OUT_OF_RANGE_PENALTY: f64 = 1e9;

/// Drone base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Depot {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Northern California air-tanker bases
    pub fn defaults() -> Vec<Depot> {
        vec![
            Depot::new("McClellan Air Tanker Base", 38.67, -121.40),
            Depot::new("Moffett Federal Airfield", 37.41, -122.05),
            Depot::new("Ukiah Airport", 39.13, -123.20),
            Depot::new("Fresno Yosemite Intl", 36.77, -119.72),
            Depot::new("Bakersfield Meadows", 35.43, -119.05),
        ]
    }
}

/// Fleet and flight parameters for one dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Number of leading threats considered
    pub top_n: usize,
    pub drone_count: usize,
    pub speed_kmh: f64,
    pub range_km: f64,
    pub depots: Vec<Depot>,
}

impl RoutePlan {
    /// Plan from configuration with the default depots
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            top_n: config.top_n,
            drone_count: config.drone_count,
            speed_kmh: config.speed_kmh,
            range_km: config.range_km,
            depots: Depot::defaults(),
        }
    }

    pub fn with_depots(mut self, depots: Vec<Depot>) -> Self {
        self.depots = depots;
        self
    }

    /// `(drone_id, depot)` for every drone; an empty depot list means the default bases
    fn drones(&self) -> Vec<(String, Depot)> {
        let depots = if self.depots.is_empty() {
            debug!("No depots configured, using the default bases");
            Depot::defaults()
        } else {
            self.depots.clone()
        };
        (0..self.drone_count)
            .map(|i| (format!("drone-{}", i + 1), depots[i % depots.len()].clone()))
            .collect()
    }
}

impl Default for RoutePlan {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

/// One drone sent to one threat
///
/// Distance is rounded to 2 decimals and ETA to 1, as published.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneAssignment {
    pub drone_id: String,
    pub depot: Depot,
    pub target_cell_id: String,
    pub target_lat: f64,
    pub target_lon: f64,
    pub distance_km: f64,
    pub eta_minutes: f64,
    pub threat_severity: f64,
    pub threat_priority: f64,
    pub timestamp: Option<String>,
}

/// Published properties of a route line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteProperties {
    pub drone_id: String,
    pub depot_name: String,
    pub target_cell_id: String,
    pub distance_km: f64,
    pub eta_minutes: f64,
    pub threat_severity: f64,
    pub threat_priority: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Depot → target line
pub type RouteFeature = Feature<RouteProperties>;

/// Route lines, ascending by ETA
pub type RouteCollection = FeatureCollection<RouteProperties>;

impl DroneAssignment {
    pub fn to_feature(&self) -> RouteFeature {
        Feature {
            geometry: Geometry::line(
                [self.depot.lon, self.depot.lat],
                [self.target_lon, self.target_lat],
            ),
            properties: RouteProperties {
                drone_id: self.drone_id.clone(),
                depot_name: self.depot.name.clone(),
                target_cell_id: self.target_cell_id.clone(),
                distance_km: self.distance_km,
                eta_minutes: self.eta_minutes,
                threat_severity: self.threat_severity,
                threat_priority: self.threat_priority,
                timestamp: self.timestamp.clone(),
            },
        }
    }
}

/// `GeoJSON` lines for a set of assignments, in the given order
pub fn route_collection(assignments: &[DroneAssignment]) -> RouteCollection {
    RouteCollection::new(assignments.iter().map(DroneAssignment::to_feature).collect())
}

/// Dispatch target: threat centroid plus the values carried for display
struct Target<'a> {
    cell_id: &'a str,
    lat: f64,
    lon: f64,
    severity: f64,
    priority: f64,
}

/// Assign drones to the leading threats
///
/// Returns at most `min(drones, targets)` assignments, none beyond `range_km`, sorted
/// ascending by ETA.
///
/// # Errors
///
/// [`EngineError::InvalidConfig`] when the speed is not positive or the range is negative.
pub fn plan_routes(
    threats: &ThreatCollection,
    plan: &RoutePlan,
    solver: &dyn AssignmentSolver,
) -> Result<Vec<DroneAssignment>> {
    if !plan.speed_kmh.is_finite() || plan.speed_kmh <= 0.0 {
        return Err(EngineError::InvalidConfig {
            name: "routing.speed_kmh",
            reason: format!("must be finite and positive, got {}", plan.speed_kmh),
        });
    }
    if plan.range_km.is_nan() || plan.range_km < 0.0 {
        return Err(EngineError::InvalidConfig {
            name: "routing.range_km",
            reason: format!("must be non-negative, got {}", plan.range_km),
        });
    }

    let drones = plan.drones();
    let targets: Vec<Target<'_>> = threats
        .top(plan.top_n)
        .iter()
        .filter_map(|feature| {
            let ring = feature.geometry.exterior()?;
            if ring.is_empty() {
                return None;
            }
            let (lat, lon) = ring_centroid(ring);
            Some(Target {
                cell_id: &feature.properties.cell_id,
                lat,
                lon,
                severity: feature.properties.severity_score,
                priority: feature.properties.priority_score,
            })
        })
        .collect();

    if drones.is_empty() || targets.is_empty() {
        debug!(
            "Nothing to dispatch ({} drones, {} targets)",
            drones.len(),
            targets.len()
        );
        return Ok(Vec::new());
    }

    let distances = DMatrix::from_fn(drones.len(), targets.len(), |i, j| {
        let depot = &drones[i].1;
        haversine_km(depot.lat, depot.lon, targets[j].lat, targets[j].lon)
    });
    let costs = distances.map(|d| {
        if d > plan.range_km {
            OUT_OF_RANGE_PENALTY + d
        } else {
            d
        }
    });

    let pairs = solver.assign(&costs);
    let mut out_of_range = 0_usize;
    let mut assignments: Vec<DroneAssignment> = Vec::with_capacity(pairs.len());

    for (i, j) in pairs {
        let distance = distances[(i, j)];
        if distance > plan.range_km {
            out_of_range += 1;
            continue;
        }
        let (drone_id, depot) = &drones[i];
        let target = &targets[j];
        assignments.push(DroneAssignment {
            drone_id: drone_id.clone(),
            depot: depot.clone(),
            target_cell_id: target.cell_id.to_string(),
            target_lat: target.lat,
            target_lon: target.lon,
            distance_km: round_to(distance, 2),
            eta_minutes: round_to(distance / plan.speed_kmh * 60.0, 1),
            threat_severity: target.severity,
            threat_priority: target.priority,
            timestamp: None,
        });
    }

    if out_of_range > 0 {
        warn!(
            "{} drone/target pairs exceed the {:.0} km range and were dropped",
            out_of_range, plan.range_km
        );
    }

    assignments.sort_by(|a, b| a.eta_minutes.total_cmp(&b.eta_minutes));

    info!(
        "Dispatched {} of {} drones to {} targets ({} backend)",
        assignments.len(),
        drones.len(),
        targets.len(),
        solver.name()
    );

    Ok(assignments)
}
