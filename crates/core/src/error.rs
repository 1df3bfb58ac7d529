//! Engine error types
//!
//! Every fallible engine call returns [`EngineError`]. Configuration errors are
//! caller-correctable and raised before any computation starts; data errors name the
//! missing field so the provider layer can be fixed. Assignment infeasibility is not an
//! error: it shows up as a shorter route list.

use crate::core_types::FieldKind;
use thiserror::Error;

/// Errors raised by grid construction, field resolution and the pipeline entry points
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Bounding box is not finite or has `min >= max` on an axis
    #[error("Invalid bbox: min values must be less than max values (got {min_lon}, {min_lat}, {max_lon}, {max_lat})")]
    InvalidBoundingBox {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
    },

    /// Grid resolution must be finite and positive
    #[error("grid resolution must be finite and positive, got {0}")]
    InvalidResolution(f64),

    /// Simulation step must be positive
    #[error("step_hours must be positive, got {0}")]
    InvalidStep(i64),

    /// Simulation end precedes start
    #[error("end_time must be after start_time ({start} > {end})")]
    InvalidTimeRange { start: String, end: String },

    /// A numeric configuration value is out of range
    #[error("invalid configuration value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    /// A timestamp could not be parsed
    #[error("unparsable timestamp '{0}'")]
    InvalidTimestamp(String),

    /// Unknown data mode name
    #[error("data_mode must be one of: hybrid, real, synthetic (got '{0}')")]
    UnknownDataMode(String),

    /// Configuration file could not be read or parsed
    #[error("failed to load configuration: {0}")]
    ConfigLoad(String),

    /// A required input field was not supplied by any provider
    #[error("{field} unavailable for selected data_mode")]
    FieldUnavailable { field: FieldKind },

    /// The storm cell list was not supplied by any provider
    #[error("storm_cells unavailable for selected data_mode")]
    StormCellsUnavailable,

    /// A supplied field does not match the grid shape
    #[error("{field} has shape {rows}x{cols}, grid is {expected_rows}x{expected_cols}")]
    FieldShape {
        field: FieldKind,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, EngineError>;
