//! Minimum-cost rectangular assignment (Kuhn-Munkres with row/column potentials)
//!
//! Runs in O(n²·m) for an n × m matrix with n ≤ m; taller matrices are solved on their
//! transpose.

use super::solver::AssignmentSolver;
use nalgebra::DMatrix;

/// Stand-in for non-finite costs so the potentials stay finite
const FORBIDDEN_COST: f64 = 1e18;

/// Optimal assignment backend
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn name(&self) -> &'static str {
        "hungarian"
    }

    fn assign(&self, costs: &DMatrix<f64>) -> Vec<(usize, usize)> {
        if costs.nrows() == 0 || costs.ncols() == 0 {
            return Vec::new();
        }
        if costs.nrows() <= costs.ncols() {
            solve(costs)
        } else {
            let mut pairs: Vec<(usize, usize)> = solve(&costs.transpose())
                .into_iter()
                .map(|(col, row)| (row, col))
                .collect();
            pairs.sort_unstable();
            pairs
        }
    }
}

/// Solve with `rows <= cols`; every row is assigned
fn solve(costs: &DMatrix<f64>) -> Vec<(usize, usize)> {
    let rows = costs.nrows();
    let cols = costs.ncols();
    let cost = |i: usize, j: usize| {
        let value = costs[(i, j)];
        if value.is_finite() {
            value
        } else {
            FORBIDDEN_COST
        }
    };

    // 1-based; index 0 is the virtual column used to grow augmenting paths
    let mut row_pot = vec![0.0_f64; rows + 1];
    let mut col_pot = vec![0.0_f64; cols + 1];
    let mut owner = vec![0_usize; cols + 1];
    let mut way = vec![0_usize; cols + 1];

    for i in 1..=rows {
        owner[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; cols + 1];
        let mut used = vec![false; cols + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=cols {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - row_pot[i0] - col_pot[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=cols {
                if used[j] {
                    row_pot[owner[j]] += delta;
                    col_pot[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut pairs: Vec<(usize, usize)> = (1..=cols)
        .filter(|&j| owner[j] != 0)
        .map(|j| (owner[j] - 1, j - 1))
        .collect();
    pairs.sort_unstable();
    pairs
}
