//! Ordered provider chain

use super::FieldProvider;
use crate::core_types::{BoundingBox, FieldGrid, FieldKind, StormCell};
use crate::geo::Grid;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Asks each source in order; the first `Some` wins per request
pub struct FallbackProvider {
    name: String,
    sources: Vec<Box<dyn FieldProvider>>,
}

impl FallbackProvider {
    pub fn new(name: impl Into<String>, sources: Vec<Box<dyn FieldProvider>>) -> Self {
        Self {
            name: name.into(),
            sources,
        }
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name())
    }
}

impl FieldProvider for FallbackProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn field(
        &self,
        kind: FieldKind,
        bbox: &BoundingBox,
        grid: &Grid,
        when: DateTime<Utc>,
    ) -> Option<FieldGrid> {
        self.sources.iter().enumerate().find_map(|(i, source)| {
            let field = source.field(kind, bbox, grid, when)?;
            if i > 0 {
                debug!("{} fell back to {} for {}", self.name, source.name(), kind);
            }
            Some(field)
        })
    }

    fn storm_cells(&self, bbox: &BoundingBox, when: DateTime<Utc>) -> Option<Vec<StormCell>> {
        self.sources
            .iter()
            .find_map(|source| source.storm_cells(bbox, when))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{SyntheticProvider, UnavailableProvider};
    use crate::time::parse_timestamp;

    /// Constant-valued source
    struct Constant(f64);

    impl FieldProvider for Constant {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn field(
            &self,
            _kind: FieldKind,
            _bbox: &BoundingBox,
            grid: &Grid,
            _when: DateTime<Utc>,
        ) -> Option<FieldGrid> {
            Some(FieldGrid::with_value(grid.rows, grid.cols, self.0))
        }

        fn storm_cells(&self, _bbox: &BoundingBox, _when: DateTime<Utc>) -> Option<Vec<StormCell>> {
            Some(Vec::new())
        }
    }

    fn setup() -> (Grid, DateTime<Utc>) {
        let bbox = BoundingBox::new(-121.0, 37.0, -120.0, 38.0).unwrap();
        (
            Grid::build(bbox, 0.25).unwrap(),
            parse_timestamp("2020-08-15T00:00:00Z").unwrap(),
        )
    }

    #[test]
    fn test_first_available_source_wins() {
        let (grid, when) = setup();
        let chain = FallbackProvider::new(
            "chain",
            vec![
                Box::new(UnavailableProvider) as Box<dyn FieldProvider>,
                Box::new(Constant(0.3)),
                Box::new(Constant(0.9)),
            ],
        );
        let field = chain.field(FieldKind::Ndvi, &grid.bbox, &grid, when).unwrap();
        assert!(field.as_slice().iter().all(|&v| v == 0.3));
        assert_eq!(chain.storm_cells(&grid.bbox, when), Some(Vec::new()));
        assert_eq!(
            chain.sources().collect::<Vec<_>>(),
            vec!["real", "constant", "constant"]
        );
    }

    #[test]
    fn test_all_unavailable() {
        let (grid, when) = setup();
        let sources: Vec<Box<dyn FieldProvider>> = vec![Box::new(UnavailableProvider)];
        let chain = FallbackProvider::new("chain", sources);
        assert!(chain.field(FieldKind::Cape, &grid.bbox, &grid, when).is_none());
        assert!(chain.storm_cells(&grid.bbox, when).is_none());
    }

    #[test]
    fn test_hybrid_matches_synthetic() {
        let (grid, when) = setup();
        let hybrid = FallbackProvider::new(
            "hybrid",
            vec![
                Box::new(UnavailableProvider) as Box<dyn FieldProvider>,
                Box::new(SyntheticProvider::default()),
            ],
        );
        let synthetic = SyntheticProvider::default();
        assert_eq!(
            hybrid.field(FieldKind::Slope, &grid.bbox, &grid, when),
            synthetic.field(FieldKind::Slope, &grid.bbox, &grid, when)
        );
    }
}
