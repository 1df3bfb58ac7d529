//! Input field providers
//!
//! The engine never fabricates inputs: every raw field and the storm cell list come from
//! a [`FieldProvider`], and a provider answering `None` means "not available here". The
//! pipeline turns that into an [`EngineError`] naming the missing field.
//!
//! Providers compose. [`FallbackProvider`] asks its sources in order and takes the first
//! answer per field; the default hybrid mode chains the (still unwired) real-data source
//! in front of the [`SyntheticProvider`].

mod fallback;
mod real;
mod synthetic;

pub use fallback::FallbackProvider;
pub use real::UnavailableProvider;
pub use synthetic::{SyntheticProvider, FIRE_SEED_ZONES, URBAN_CENTERS};

use crate::core_types::{BoundingBox, FieldGrid, FieldKind, StormCell};
use crate::error::{EngineError, Result};
use crate::geo::Grid;
use crate::layers::FieldSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Source of raw per-cell inputs and storm cells
pub trait FieldProvider: Send + Sync {
    /// Short source name for logs and reports
    fn name(&self) -> &str;

    /// Field `kind` on `grid` at `when`, or `None` if this source cannot supply it
    fn field(
        &self,
        kind: FieldKind,
        bbox: &BoundingBox,
        grid: &Grid,
        when: DateTime<Utc>,
    ) -> Option<FieldGrid>;

    /// Storm cells over `bbox` at `when`, or `None` if this source cannot supply them
    fn storm_cells(&self, bbox: &BoundingBox, when: DateTime<Utc>) -> Option<Vec<StormCell>>;
}

/// Which input sources to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Real data where available, synthetic otherwise
    #[default]
    Hybrid,
    Real,
    Synthetic,
}

impl DataMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Real => "real",
            Self::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(Self::Hybrid),
            "real" => Ok(Self::Real),
            "synthetic" => Ok(Self::Synthetic),
            _ => Err(EngineError::UnknownDataMode(s.to_string())),
        }
    }
}

/// Build the provider chain for `mode`
pub fn create_provider(mode: DataMode) -> Box<dyn FieldProvider> {
    let provider: Box<dyn FieldProvider> = match mode {
        DataMode::Real => Box::new(UnavailableProvider),
        DataMode::Synthetic => Box::new(SyntheticProvider::default()),
        DataMode::Hybrid => Box::new(FallbackProvider::new(
            "hybrid",
            vec![
                Box::new(UnavailableProvider) as Box<dyn FieldProvider>,
                Box::new(SyntheticProvider::default()),
            ],
        )),
    };
    info!("Using {} data provider", provider.name());
    provider
}

impl FieldSet {
    /// Request every field from `provider`
    ///
    /// # Errors
    ///
    /// [`EngineError::FieldUnavailable`] for the first field the provider cannot supply,
    /// [`EngineError::FieldShape`] for a field that does not match the grid.
    pub fn resolve(
        provider: &dyn FieldProvider,
        bbox: &BoundingBox,
        grid: &Grid,
        when: DateTime<Utc>,
    ) -> Result<Self> {
        let fetch = |kind: FieldKind| -> Result<FieldGrid> {
            let field = provider
                .field(kind, bbox, grid, when)
                .ok_or(EngineError::FieldUnavailable { field: kind })?;
            if field.shape() != (grid.rows, grid.cols) {
                return Err(EngineError::FieldShape {
                    field: kind,
                    rows: field.rows,
                    cols: field.cols,
                    expected_rows: grid.rows,
                    expected_cols: grid.cols,
                });
            }
            debug!("Resolved {} from {}", kind, provider.name());
            Ok(field)
        };

        Ok(Self {
            ndvi: fetch(FieldKind::Ndvi)?,
            slope: fetch(FieldKind::Slope)?,
            fuel_type: fetch(FieldKind::FuelType)?,
            cape: fetch(FieldKind::Cape)?,
            dewpoint_depression: fetch(FieldKind::DewpointDepression)?,
            cloud_base_height: fetch(FieldKind::CloudBaseHeight)?,
            low_level_rh: fetch(FieldKind::LowLevelRh)?,
            precip_efficiency: fetch(FieldKind::PrecipEfficiency)?,
            population_proximity: fetch(FieldKind::PopulationProximity)?,
            infrastructure_density: fetch(FieldKind::InfrastructureDensity)?,
        })
    }
}

/// Storm cells from `provider`, or [`EngineError::StormCellsUnavailable`]
pub fn resolve_storm_cells(
    provider: &dyn FieldProvider,
    bbox: &BoundingBox,
    when: DateTime<Utc>,
) -> Result<Vec<StormCell>> {
    provider
        .storm_cells(bbox, when)
        .ok_or(EngineError::StormCellsUnavailable)
}
