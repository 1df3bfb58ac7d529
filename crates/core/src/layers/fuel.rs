//! Fuel availability layer
//!
//! Combines vegetation greenness, terrain slope and fuel combustibility. Slope is
//! normalised against 40°, above which it no longer adds to the score.

use crate::config::FuelWeights;
use crate::core_types::{FieldGrid, ScoreGrid};
use crate::geo::clamp01;
use rayon::prelude::*;

/// Slope (degrees) at which the slope term saturates
const SLOPE_SATURATION_DEG: f64 = 40.0;

/// Fuel score for a single cell
#[inline]
pub fn fuel_cell_score(ndvi: f64, slope_deg: f64, fuel_type: f64, weights: &FuelWeights) -> f64 {
    let score = weights.ndvi * clamp01(ndvi)
        + weights.slope * clamp01(slope_deg / SLOPE_SATURATION_DEG)
        + weights.fuel_type * clamp01(fuel_type);
    clamp01(score)
}

/// Score every cell; inputs must share one shape
pub fn score_fuel(
    ndvi: &FieldGrid,
    slope: &FieldGrid,
    fuel_type: &FieldGrid,
    weights: &FuelWeights,
) -> ScoreGrid {
    let data = ndvi
        .data
        .par_iter()
        .zip(slope.data.par_iter())
        .zip(fuel_type.data.par_iter())
        .map(|((&n, &s), &f)| fuel_cell_score(n, s, f, weights))
        .collect();

    ScoreGrid {
        data,
        rows: ndvi.rows,
        cols: ndvi.cols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_saturated_inputs_score_one() {
        let w = FuelWeights::default();
        assert_relative_eq!(fuel_cell_score(1.0, 40.0, 1.0, &w), 1.0, epsilon = 1e-12);
        assert_relative_eq!(fuel_cell_score(1.5, 80.0, 3.0, &w), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_sum() {
        let w = FuelWeights::default();
        // 0.5*0.6 + 0.3*(20/40) + 0.2*0.5 = 0.3 + 0.15 + 0.1
        assert_relative_eq!(fuel_cell_score(0.6, 20.0, 0.5, &w), 0.55, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let w = FuelWeights::default();
        assert_eq!(fuel_cell_score(-0.4, -10.0, -1.0, &w), 0.0);
    }

    #[test]
    fn test_grid_is_cellwise() {
        let ndvi = FieldGrid::from_rows(&[vec![0.0, 1.0]]).unwrap();
        let slope = FieldGrid::from_rows(&[vec![0.0, 40.0]]).unwrap();
        let fuel = FieldGrid::from_rows(&[vec![0.0, 1.0]]).unwrap();
        let score = score_fuel(&ndvi, &slope, &fuel, &FuelWeights::default());
        assert_eq!(score.shape(), (1, 2));
        assert_eq!(score.get(0, 0), 0.0);
        assert_relative_eq!(score.get(0, 1), 1.0, epsilon = 1e-12);
    }
}
