//! Row-order greedy assignment

use super::solver::AssignmentSolver;
use nalgebra::DMatrix;

/// Each row in order takes its cheapest still-unclaimed column
///
/// Ties go to the lowest column index. Not globally optimal: an early row can claim a
/// column a later row needed far more.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl AssignmentSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn assign(&self, costs: &DMatrix<f64>) -> Vec<(usize, usize)> {
        let mut claimed = vec![false; costs.ncols()];
        let mut pairs = Vec::with_capacity(costs.nrows().min(costs.ncols()));

        for i in 0..costs.nrows() {
            let mut best: Option<(usize, f64)> = None;
            for j in 0..costs.ncols() {
                if claimed[j] {
                    continue;
                }
                let cost = costs[(i, j)];
                let better = match best {
                    Some((_, best_cost)) => cost < best_cost,
                    None => true,
                };
                if better {
                    best = Some((j, cost));
                }
            }
            match best {
                Some((j, _)) => {
                    claimed[j] = true;
                    pairs.push((i, j));
                }
                None => break,
            }
        }

        pairs
    }
}
