//! Threat detection and ranking
//!
//! Storm cells are projected forward hour by hour and intersected with high-severity
//! land cells; the resulting threats are scored for urgency and ranked.

pub mod collision;
pub mod feature;
pub mod priority;

pub use collision::{composite_severity, detect_collisions, earliest_collision_hours};
pub use feature::{ThreatCollection, ThreatFeature, ThreatProperties};
pub use priority::{priority_score, PriorityLabel, MIN_TIME_TO_COLLISION_HOURS};
