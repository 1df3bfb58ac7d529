//! Dry-lightning atmospheric layer
//!
//! High instability with a dry, deep sub-cloud layer produces lightning that reaches
//! the ground without wetting the fuel. Each ingredient is mapped onto [0, 1] by a
//! clamped affine transform:
//!
//! | Ingredient               | Zero at   | One at    |
//! |--------------------------|-----------|-----------|
//! | CAPE                     | 500 J/kg  | 2500 J/kg |
//! | Dewpoint depression      | 0 °C      | 20 °C     |
//! | Cloud-base height        | 1 km      | 4 km      |
//! | Low-level RH             | 50 %      | 10 %      |
//! | Precipitation efficiency | 0.5       | 0.0       |

use crate::config::AtmosphericWeights;
use crate::core_types::{FieldGrid, ScoreGrid};
use crate::geo::clamp01;
use rayon::prelude::*;

/// Raw atmospheric values for one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericSample {
    pub cape: f64,
    pub dewpoint_depression: f64,
    pub cloud_base_km: f64,
    pub low_level_rh: f64,
    pub precip_efficiency: f64,
}

impl AtmosphericSample {
    #[inline]
    pub fn cape_score(&self) -> f64 {
        clamp01((self.cape - 500.0) / 2000.0)
    }

    #[inline]
    pub fn dewpoint_score(&self) -> f64 {
        clamp01(self.dewpoint_depression / 20.0)
    }

    #[inline]
    pub fn cloud_base_score(&self) -> f64 {
        clamp01((self.cloud_base_km - 1.0) / 3.0)
    }

    #[inline]
    pub fn low_rh_score(&self) -> f64 {
        clamp01((50.0 - self.low_level_rh) / 40.0)
    }

    #[inline]
    pub fn precip_efficiency_score(&self) -> f64 {
        clamp01((0.5 - self.precip_efficiency) / 0.5)
    }

    /// Weighted, clamped atmospheric score
    pub fn score(&self, weights: &AtmosphericWeights) -> f64 {
        clamp01(
            weights.cape * self.cape_score()
                + weights.dewpoint_depression * self.dewpoint_score()
                + weights.cloud_base * self.cloud_base_score()
                + weights.low_rh * self.low_rh_score()
                + weights.precip_efficiency * self.precip_efficiency_score(),
        )
    }
}

/// Score every cell; inputs must share one shape
pub fn score_atmospheric(
    cape: &FieldGrid,
    dewpoint_depression: &FieldGrid,
    cloud_base_km: &FieldGrid,
    low_level_rh: &FieldGrid,
    precip_efficiency: &FieldGrid,
    weights: &AtmosphericWeights,
) -> ScoreGrid {
    let data = (0..cape.len())
        .into_par_iter()
        .map(|i| {
            AtmosphericSample {
                cape: cape.data[i],
                dewpoint_depression: dewpoint_depression.data[i],
                cloud_base_km: cloud_base_km.data[i],
                low_level_rh: low_level_rh.data[i],
                precip_efficiency: precip_efficiency.data[i],
            }
            .score(weights)
        })
        .collect();

    ScoreGrid {
        data,
        rows: cape.rows,
        cols: cape.cols,
    }
}
