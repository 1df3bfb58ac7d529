//! Per-cell risk layers
//!
//! Three independent scorers turn raw provider fields into [0, 1] score grids:
//! - **fuel**: vegetation, slope and combustibility
//! - **atmospheric**: dry-lightning ingredients
//! - **consequence**: population and infrastructure exposure
//!
//! No scorer looks at neighbouring cells, so cells and layers are scored in parallel.

pub mod atmospheric;
pub mod consequence;
pub mod fuel;

pub use atmospheric::{score_atmospheric, AtmosphericSample};
pub use consequence::{consequence_cell_score, score_consequence};
pub use fuel::{fuel_cell_score, score_fuel};

use crate::config::EngineConfig;
use crate::core_types::{FieldGrid, FieldKind, ScoreGrid};

/// Fully resolved raw inputs for one grid and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    pub ndvi: FieldGrid,
    pub slope: FieldGrid,
    pub fuel_type: FieldGrid,
    pub cape: FieldGrid,
    pub dewpoint_depression: FieldGrid,
    pub cloud_base_height: FieldGrid,
    pub low_level_rh: FieldGrid,
    pub precip_efficiency: FieldGrid,
    pub population_proximity: FieldGrid,
    pub infrastructure_density: FieldGrid,
}

impl FieldSet {
    /// Borrow a field by kind
    pub fn get(&self, kind: FieldKind) -> &FieldGrid {
        match kind {
            FieldKind::Ndvi => &self.ndvi,
            FieldKind::Slope => &self.slope,
            FieldKind::FuelType => &self.fuel_type,
            FieldKind::Cape => &self.cape,
            FieldKind::DewpointDepression => &self.dewpoint_depression,
            FieldKind::CloudBaseHeight => &self.cloud_base_height,
            FieldKind::LowLevelRh => &self.low_level_rh,
            FieldKind::PrecipEfficiency => &self.precip_efficiency,
            FieldKind::PopulationProximity => &self.population_proximity,
            FieldKind::InfrastructureDensity => &self.infrastructure_density,
        }
    }
}

/// The three layer grids for one grid and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct LayerScores {
    pub fuel: ScoreGrid,
    pub atmospheric: ScoreGrid,
    pub consequence: ScoreGrid,
}

/// Score all three layers
pub fn score_layers(fields: &FieldSet, config: &EngineConfig) -> LayerScores {
    let (fuel, (atmospheric, consequence)) = rayon::join(
        || score_fuel(&fields.ndvi, &fields.slope, &fields.fuel_type, &config.fuel),
        || {
            rayon::join(
                || {
                    score_atmospheric(
                        &fields.cape,
                        &fields.dewpoint_depression,
                        &fields.cloud_base_height,
                        &fields.low_level_rh,
                        &fields.precip_efficiency,
                        &config.atmospheric,
                    )
                },
                || {
                    score_consequence(
                        &fields.population_proximity,
                        &fields.infrastructure_density,
                        &config.consequence,
                    )
                },
            )
        },
    );

    LayerScores {
        fuel,
        atmospheric,
        consequence,
    }
}
