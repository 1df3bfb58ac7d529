//! Storm/terrain collision detection
//!
//! Every storm cell is advanced in whole-hour steps along its heading. A grid cell is
//! threatened at the first hour any projected footprint covers its center, provided its
//! composite severity reaches the caller's threshold. Hours are processed strictly in
//! order so the recorded hour is a true time-to-collision; within one hour the cells are
//! independent and checked in parallel.

use super::feature::{ThreatCollection, ThreatFeature, ThreatProperties};
use super::priority::{priority_score, PriorityLabel};
use crate::config::EngineConfig;
use crate::core_types::StormCell;
use crate::geo::{cell_id, cell_polygon, haversine_km, point_in_polygon, Grid};
use crate::geojson::{round_to, Feature, Geometry};
use crate::layers::LayerScores;
use rayon::prelude::*;
use tracing::{debug, info};

/// Published score precision (decimal places)
const SCORE_DECIMALS: i32 = 4;

/// Composite, time-independent severity per cell
pub fn composite_severity(layers: &LayerScores, config: &EngineConfig) -> Vec<f64> {
    let w = &config.layer_weights;
    layers
        .fuel
        .data
        .par_iter()
        .zip(layers.atmospheric.data.par_iter())
        .zip(layers.consequence.data.par_iter())
        .map(|((&fuel, &atmo), &cons)| w.fuel * fuel + w.atmospheric * atmo + w.consequence * cons)
        .collect()
}

/// First forecast hour (1-based) each cell is covered by a storm footprint
///
/// Cells below `threshold` are never checked and stay `None`.
pub fn earliest_collision_hours(
    grid: &Grid,
    severity: &[f64],
    storms: &[StormCell],
    horizon_hours: u32,
    threshold: f64,
) -> Vec<Option<u32>> {
    let mut earliest: Vec<Option<u32>> = vec![None; grid.len()];

    for hour in 1..=horizon_hours {
        let projected: Vec<(f64, f64, f64)> = storms
            .iter()
            .map(|storm| {
                let (lat, lon) = storm.project(f64::from(hour));
                (lat, lon, storm.radius_km)
            })
            .collect();

        let resolved = earliest
            .par_iter_mut()
            .enumerate()
            .filter(|(i, slot)| slot.is_none() && severity[*i] >= threshold)
            .map(|(i, slot)| {
                let (lat, lon) = grid.center_at(i);
                let hit = projected
                    .iter()
                    .any(|&(p_lat, p_lon, radius)| haversine_km(lat, lon, p_lat, p_lon) <= radius);
                if hit {
                    *slot = Some(hour);
                }
                usize::from(hit)
            })
            .sum::<usize>();

        debug!("Collision hour {}: {} cells newly threatened", hour, resolved);
    }

    earliest
}

/// Rank threatened land cells for one forecast snapshot
///
/// A cell is emitted only if it has a collision hour and both its center and all four
/// corners of its square lie on land. The result is sorted descending by priority; equal
/// scores keep row-major order.
pub fn detect_collisions(
    grid: &Grid,
    layers: &LayerScores,
    storms: &[StormCell],
    config: &EngineConfig,
    threshold: f64,
) -> ThreatCollection {
    let severity = composite_severity(layers, config);
    let earliest =
        earliest_collision_hours(grid, &severity, storms, config.horizon_hours, threshold);
    let land = config.land_polygon.as_slice();

    let mut features: Vec<ThreatFeature> = Vec::new();
    for (index, (row, col, lat, lon)) in grid.cells().enumerate() {
        let Some(hours) = earliest[index] else {
            continue;
        };
        if !point_in_polygon(lon, lat, land) {
            continue;
        }
        let ring = cell_polygon(lon, lat, grid.resolution_deg);
        if !ring.iter().all(|&[p_lon, p_lat]| point_in_polygon(p_lon, p_lat, land)) {
            continue;
        }

        let sev = severity[index];
        let consequence = layers.consequence.data[index];
        let score = priority_score(sev, f64::from(hours));
        let label = PriorityLabel::for_cell(score, consequence, &config.priority);

        features.push(Feature {
            geometry: Geometry::polygon(ring),
            properties: ThreatProperties {
                cell_id: cell_id(row, col),
                severity_score: round_to(sev, SCORE_DECIMALS),
                priority_score: round_to(score, SCORE_DECIMALS),
                time_to_collision_hours: hours,
                response_priority: label,
                fuel_score: round_to(layers.fuel.data[index], SCORE_DECIMALS),
                atmo_score: round_to(layers.atmospheric.data[index], SCORE_DECIMALS),
                consequence_weight: round_to(consequence, SCORE_DECIMALS),
                forecast_hour: hours,
                timestamp: None,
            },
        });
    }

    let mut collection = ThreatCollection::new(features);
    collection.sort_by_priority();

    info!(
        "Detected {} threatened cells on {}x{} grid ({} storm cells, horizon {}h, threshold {:.3})",
        collection.len(),
        grid.rows,
        grid.cols,
        storms.len(),
        config.horizon_hours,
        threshold
    );

    collection
}
