//! Consequence layer: what an ignition would put at risk

use crate::config::ConsequenceWeights;
use crate::core_types::{FieldGrid, ScoreGrid};
use crate::geo::clamp01;
use rayon::prelude::*;

#[inline]
pub fn consequence_cell_score(population: f64, infrastructure: f64, weights: &ConsequenceWeights) -> f64 {
    clamp01(weights.population * clamp01(population) + weights.infrastructure * clamp01(infrastructure))
}

pub fn score_consequence(
    population: &FieldGrid,
    infrastructure: &FieldGrid,
    weights: &ConsequenceWeights,
) -> ScoreGrid {
    let data = population
        .data
        .par_iter()
        .zip(infrastructure.data.par_iter())
        .map(|(&p, &i)| consequence_cell_score(p, i, weights))
        .collect();

    ScoreGrid {
        data,
        rows: population.rows,
        cols: population.cols,
    }
}
