//! Per-cell field grids
//!
//! Raw provider fields and derived layer scores share one representation: a flat
//! `Vec<f64>` in row-major order (`row * cols + col`), row 0 at the southern edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named physical quantities a provider must supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Normalised difference vegetation index (0-1)
    Ndvi,
    /// Terrain slope (degrees)
    Slope,
    /// Fuel combustibility index (0-1)
    FuelType,
    /// Convective available potential energy (J/kg)
    Cape,
    /// Surface dewpoint depression (°C)
    DewpointDepression,
    /// Cloud-base height (km AGL)
    CloudBaseHeight,
    /// Low-level relative humidity (%)
    LowLevelRh,
    /// Precipitation efficiency (0-1)
    PrecipEfficiency,
    /// Proximity to population (0-1)
    PopulationProximity,
    /// Infrastructure density (0-1)
    InfrastructureDensity,
}

impl FieldKind {
    /// Every field, in the order they are requested from providers
    pub const ALL: [FieldKind; 10] = [
        FieldKind::Ndvi,
        FieldKind::Slope,
        FieldKind::FuelType,
        FieldKind::Cape,
        FieldKind::DewpointDepression,
        FieldKind::CloudBaseHeight,
        FieldKind::LowLevelRh,
        FieldKind::PrecipEfficiency,
        FieldKind::PopulationProximity,
        FieldKind::InfrastructureDensity,
    ];

    /// Stable `snake_case` name used in errors and reports
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ndvi => "ndvi",
            Self::Slope => "slope",
            Self::FuelType => "fuel_type",
            Self::Cape => "cape",
            Self::DewpointDepression => "dewpoint_depression",
            Self::CloudBaseHeight => "cloud_base_height",
            Self::LowLevelRh => "low_level_rh",
            Self::PrecipEfficiency => "precip_efficiency",
            Self::PopulationProximity => "population_proximity",
            Self::InfrastructureDensity => "infrastructure_density",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row-major matrix of per-cell values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGrid {
    /// Values in row-major order (row * cols + col)
    pub data: Vec<f64>,
    /// Number of rows (latitude steps)
    pub rows: usize,
    /// Number of columns (longitude steps)
    pub cols: usize,
}

/// Layer score grid; every value lies in [0, 1]
pub type ScoreGrid = FieldGrid;

impl FieldGrid {
    /// Create a field initialized to zero
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_value(rows, cols, 0.0)
    }

    /// Create a field initialized to a value
    #[must_use]
    pub fn with_value(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Build a field by evaluating `f(row, col)` for every cell
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { data, rows, cols }
    }

    /// Wrap an existing row-major buffer
    ///
    /// Returns `None` when the buffer length does not match `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (data.len() == rows * cols).then_some(Self { data, rows, cols })
    }

    /// Build a field from nested rows; `None` for ragged input
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self {
            data: rows.iter().flatten().copied().collect(),
            rows: rows.len(),
            cols,
        })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "Coordinates out of bounds");
        self.data[row * self.cols + col]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "Coordinates out of bounds");
        self.data[row * self.cols + col] = value;
    }

    /// Apply `f` to every value, keeping the shape
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Nested row arrays for JSON reports
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }
}
