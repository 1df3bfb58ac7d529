//! End-to-end engine operations
//!
//! Each entry point takes a provider, a bounding box, a time (or time range) and the
//! engine configuration, and returns plain data ready to serialize:
//!
//! - [`build_layers`]: grid, the three layer grids and the storm cells
//! - [`detect_threats`]: ranked threats for one time
//! - [`simulate`]: best threat per cell across a time range
//! - [`run_scenario`]: simulation plus per-time drone routes
//!
//! Every call builds its own grid and fields; nothing is cached or shared between calls.

use crate::config::EngineConfig;
use crate::core_types::{BoundingBox, StormCell};
use crate::error::Result;
use crate::geo::Grid;
use crate::layers::{score_layers, FieldSet, LayerScores};
use crate::provider::{resolve_storm_cells, FieldProvider};
use crate::routing::{plan_routes, route_collection, AssignmentSolver, RouteCollection, RoutePlan};
use crate::simulation::{aggregate, detect_at_times, simulation_times};
use crate::threat::{detect_collisions, ThreatCollection};
use crate::time::to_iso;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Scored layers for one grid and time
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSnapshot {
    pub grid: Grid,
    pub layers: LayerScores,
    pub storm_cells: Vec<StormCell>,
    pub when: DateTime<Utc>,
    /// Name of the provider that supplied the inputs
    pub source: String,
}

/// Grid description accompanying a layer report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerMeta {
    pub resolution_deg: f64,
    pub rows: usize,
    pub cols: usize,
    pub bbox: BoundingBox,
    pub time: String,
    pub data_mode: String,
}

/// Layer grids as nested rows, south to north
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGrids {
    pub fuel: Vec<Vec<f64>>,
    pub atmospheric: Vec<Vec<f64>>,
    pub consequence: Vec<Vec<f64>>,
}

/// Serializable layer snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerReport {
    pub meta: LayerMeta,
    pub layers: LayerGrids,
}

impl LayerSnapshot {
    pub fn to_report(&self) -> LayerReport {
        LayerReport {
            meta: LayerMeta {
                resolution_deg: self.grid.resolution_deg,
                rows: self.grid.rows,
                cols: self.grid.cols,
                bbox: self.grid.bbox,
                time: to_iso(&self.when),
                data_mode: self.source.clone(),
            },
            layers: LayerGrids {
                fuel: self.layers.fuel.to_rows(),
                atmospheric: self.layers.atmospheric.to_rows(),
                consequence: self.layers.consequence.to_rows(),
            },
        }
    }
}

/// Simulated threats plus the routes planned at every step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub threats: ThreatCollection,
    pub routes: RouteCollection,
}

/// Build the grid, resolve every input and score the three layers
pub fn build_layers(
    provider: &dyn FieldProvider,
    bbox: BoundingBox,
    when: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<LayerSnapshot> {
    config.validate()?;
    let grid = Grid::build(bbox, config.grid_resolution_deg)?;
    let fields = FieldSet::resolve(provider, &bbox, &grid, when)?;
    let storm_cells = resolve_storm_cells(provider, &bbox, when)?;
    let layers = score_layers(&fields, config);

    info!(
        "Scored {}x{} grid at {} ({} storm cells, source {})",
        grid.rows,
        grid.cols,
        to_iso(&when),
        storm_cells.len(),
        provider.name()
    );

    Ok(LayerSnapshot {
        grid,
        layers,
        storm_cells,
        when,
        source: provider.name().to_string(),
    })
}

/// Ranked threats at one time
pub fn detect_threats(
    provider: &dyn FieldProvider,
    bbox: BoundingBox,
    when: DateTime<Utc>,
    config: &EngineConfig,
    threshold: f64,
) -> Result<ThreatCollection> {
    let snapshot = build_layers(provider, bbox, when, config)?;
    Ok(detect_collisions(
        &snapshot.grid,
        &snapshot.layers,
        &snapshot.storm_cells,
        config,
        threshold,
    ))
}

/// Detect at every step of `[start, end]`, stamped, in time order
fn stamped_snapshots(
    provider: &dyn FieldProvider,
    bbox: BoundingBox,
    times: &[DateTime<Utc>],
    config: &EngineConfig,
    threshold: f64,
) -> Result<Vec<ThreatCollection>> {
    bbox.validate()?;
    config.validate()?;
    info!(
        "Simulating {} steps from {}",
        times.len(),
        times.first().map(to_iso).unwrap_or_default()
    );
    detect_at_times(times, |when| {
        detect_threats(provider, bbox, when, config, threshold)
    })
}

/// Highest-priority observation per cell over `[start, end]` every `step_hours`
///
/// Features carry the timestamp of the retained observation. Running the same simulation
/// twice yields identical output.
pub fn simulate(
    provider: &dyn FieldProvider,
    bbox: BoundingBox,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_hours: i64,
    config: &EngineConfig,
    threshold: f64,
) -> Result<ThreatCollection> {
    let times = simulation_times(start, end, step_hours)?;
    let snapshots = stamped_snapshots(provider, bbox, &times, config, threshold)?;
    Ok(aggregate(snapshots))
}

/// Simulation plus a dispatch plan for every step
///
/// Routes are planned against each step's own ranking and tagged with its timestamp;
/// they are listed step by step, each step ascending by ETA.
pub fn run_scenario(
    provider: &dyn FieldProvider,
    bbox: BoundingBox,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_hours: i64,
    config: &EngineConfig,
    threshold: f64,
    solver: &dyn AssignmentSolver,
) -> Result<ScenarioReport> {
    let times = simulation_times(start, end, step_hours)?;
    let snapshots = stamped_snapshots(provider, bbox, &times, config, threshold)?;

    let plan = RoutePlan::from_config(&config.routing);
    let mut assignments = Vec::new();
    for (snapshot, when) in snapshots.iter().zip(&times) {
        let timestamp = to_iso(when);
        let mut step = plan_routes(snapshot, &plan, solver)?;
        for assignment in &mut step {
            assignment.timestamp = Some(timestamp.clone());
        }
        assignments.extend(step);
    }

    Ok(ScenarioReport {
        threats: aggregate(snapshots),
        routes: route_collection(&assignments),
    })
}
