//! Threat features and ranked collections

use super::priority::PriorityLabel;
use crate::geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Published properties of one threatened cell
///
/// Scores are rounded to four decimal places; ordering and simulation merging compare
/// these published values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatProperties {
    pub cell_id: String,
    pub severity_score: f64,
    pub priority_score: f64,
    pub time_to_collision_hours: u32,
    pub response_priority: PriorityLabel,
    pub fuel_score: f64,
    pub atmo_score: f64,
    pub consequence_weight: f64,
    pub forecast_hour: u32,
    /// Detection time, set by the simulation and scenario runners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Polygon feature for one grid cell
pub type ThreatFeature = Feature<ThreatProperties>;

/// Threat features sorted descending by priority score
pub type ThreatCollection = FeatureCollection<ThreatProperties>;

/// Descending priority order
#[inline]
pub(crate) fn by_priority_desc(a: &ThreatFeature, b: &ThreatFeature) -> Ordering {
    b.properties
        .priority_score
        .total_cmp(&a.properties.priority_score)
}

impl FeatureCollection<ThreatProperties> {
    /// Stable descending sort by priority; equal scores keep their current order
    pub fn sort_by_priority(&mut self) {
        self.features.sort_by(by_priority_desc);
    }

    /// Whether the ranking contract holds
    pub fn is_ranked(&self) -> bool {
        self.features
            .windows(2)
            .all(|w| w[0].properties.priority_score >= w[1].properties.priority_score)
    }

    /// The `n` highest-priority features
    pub fn top(&self, n: usize) -> &[ThreatFeature] {
        &self.features[..n.min(self.features.len())]
    }

    /// Tag every feature with a detection time
    pub fn stamp(&mut self, timestamp: &str) {
        for feature in &mut self.features {
            feature.properties.timestamp = Some(timestamp.to_string());
        }
    }
}
