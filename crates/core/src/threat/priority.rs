//! Urgency-weighted priority and response labels

use crate::config::PriorityThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collisions sooner than this are treated as this soon
pub const MIN_TIME_TO_COLLISION_HOURS: f64 = 0.25;

/// Severity scaled by the inverse square root of time-to-collision
#[inline]
pub fn priority_score(severity: f64, time_to_collision_hours: f64) -> f64 {
    severity / time_to_collision_hours.max(MIN_TIME_TO_COLLISION_HOURS).sqrt()
}

/// Response label, ordered by urgency (`Low < Medium < High < Critical`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLabel {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLabel {
    /// Label for a priority score
    pub fn classify(score: f64, thresholds: &PriorityThresholds) -> Self {
        if score >= thresholds.critical {
            Self::Critical
        } else if score >= thresholds.high {
            Self::High
        } else if score >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Label for a cell, forcing `Low` where little is at stake
    pub fn for_cell(score: f64, consequence: f64, thresholds: &PriorityThresholds) -> Self {
        if consequence < thresholds.min_consequence {
            Self::Low
        } else {
            Self::classify(score, thresholds)
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
