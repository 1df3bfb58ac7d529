//! Assignment solver trait and strategy selection
//!
//! Drone dispatch is a rectangular assignment problem over a drone × target cost matrix.
//! Two backends implement [`AssignmentSolver`]:
//!
//! - [`HungarianSolver`]: minimum total cost (Kuhn-Munkres with potentials)
//! - [`GreedySolver`]: each drone in order takes its cheapest unclaimed target
//!
//! The greedy backend is not globally optimal; it exists for very large fleets and for
//! comparison. The strategy is chosen once, from configuration, via
//! [`create_assignment_solver`].

use super::greedy::GreedySolver;
use super::hungarian::HungarianSolver;
use crate::error::EngineError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Backend-agnostic rectangular assignment
pub trait AssignmentSolver: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Match rows to columns
    ///
    /// Returns `min(rows, cols)` `(row, col)` pairs sorted by row; every row and column
    /// appears at most once. An empty matrix yields no pairs.
    fn assign(&self, costs: &DMatrix<f64>) -> Vec<(usize, usize)>;
}

/// Which assignment backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStrategy {
    /// Minimum total cost
    #[default]
    Optimal,
    /// Row-order greedy
    Greedy,
}

impl AssignmentStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Greedy => "greedy",
        }
    }
}

impl fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimal" | "hungarian" => Ok(Self::Optimal),
            "greedy" => Ok(Self::Greedy),
            other => Err(EngineError::InvalidConfig {
                name: "routing.solver",
                reason: format!("expected 'optimal' or 'greedy', got '{other}'"),
            }),
        }
    }
}

/// Create the solver for `strategy`
pub fn create_assignment_solver(strategy: AssignmentStrategy) -> Box<dyn AssignmentSolver> {
    let solver: Box<dyn AssignmentSolver> = match strategy {
        AssignmentStrategy::Optimal => Box::new(HungarianSolver),
        AssignmentStrategy::Greedy => Box::new(GreedySolver),
    };
    info!("Using {} assignment backend", solver.name());
    solver
}
