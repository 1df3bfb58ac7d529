//! Storm-driven wildfire ignition risk engine
//!
//! Scores ignition risk over a lat/lon grid, projects moving storm cells forward to find
//! where they will cross high-risk land within the forecast horizon, ranks those threats
//! and dispatches response drones to the most urgent ones.
//!
//! ## Pipeline
//!
//! - [`geo`]: great-circle geometry and the cell lattice
//! - [`layers`]: fuel, atmospheric and consequence scoring
//! - [`threat`]: storm/cell collision detection and priority ranking
//! - [`simulation`]: best observation per cell across a time range
//! - [`routing`]: drone-to-threat assignment under a range limit
//! - [`provider`]: where raw inputs come from
//! - [`pipeline`]: the operations above wired end to end

pub mod config;
pub mod core_types;
pub mod error;
pub mod geo;
pub mod geojson;
pub mod layers;
pub mod pipeline;
pub mod provider;
pub mod routing;
pub mod simulation;
pub mod threat;
pub mod time;

// Re-export the main entry points
pub use config::EngineConfig;
pub use core_types::{BoundingBox, FieldGrid, FieldKind, ScoreGrid, StormCell};
pub use error::{EngineError, Result};
pub use geo::Grid;
pub use pipeline::{
    build_layers, detect_threats, run_scenario, simulate, LayerReport, LayerSnapshot,
    ScenarioReport,
};
pub use provider::{create_provider, DataMode, FieldProvider};
pub use routing::{
    create_assignment_solver, plan_routes, AssignmentSolver, AssignmentStrategy, Depot,
    DroneAssignment, RouteCollection, RoutePlan,
};
pub use threat::{PriorityLabel, ThreatCollection, ThreatFeature};
