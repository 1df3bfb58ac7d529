//! Real-data source placeholder

use super::FieldProvider;
use crate::core_types::{BoundingBox, FieldGrid, FieldKind, StormCell};
use crate::geo::Grid;
use chrono::{DateTime, Utc};

/// Real observational data; no feed is wired up, so nothing is ever available
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableProvider;

impl FieldProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        "real"
    }

    fn field(
        &self,
        _kind: FieldKind,
        _bbox: &BoundingBox,
        _grid: &Grid,
        _when: DateTime<Utc>,
    ) -> Option<FieldGrid> {
        None
    }

    fn storm_cells(&self, _bbox: &BoundingBox, _when: DateTime<Utc>) -> Option<Vec<StormCell>> {
        None
    }
}
