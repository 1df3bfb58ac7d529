//! Multi-timestep threat aggregation
//!
//! A simulation runs threat detection at `start, start + step, ...` up to and including
//! `end`, then keeps one feature per cell: the observation with the highest priority,
//! or on an exact tie the earliest one. Snapshots are detected in parallel and merged in
//! timestamp order, so the output does not depend on scheduling.

use crate::error::{EngineError, Result};
use crate::threat::{ThreatCollection, ThreatFeature, ThreatProperties};
use crate::time::to_iso;
use chrono::{DateTime, TimeDelta, Utc};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Detection times for `[start, end]` every `step_hours`
///
/// # Errors
///
/// [`EngineError::InvalidStep`] for a non-positive or unrepresentable step and
/// [`EngineError::InvalidTimeRange`] when `end` precedes `start`. Stepping stops at the
/// end of the calendar range instead of overflowing.
pub fn simulation_times(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_hours: i64,
) -> Result<Vec<DateTime<Utc>>> {
    if end < start {
        return Err(EngineError::InvalidTimeRange {
            start: to_iso(&start),
            end: to_iso(&end),
        });
    }
    if step_hours <= 0 {
        return Err(EngineError::InvalidStep(step_hours));
    }

    let step = TimeDelta::try_hours(step_hours).ok_or(EngineError::InvalidStep(step_hours))?;
    let mut times = Vec::new();
    let mut current = Some(start);
    while let Some(when) = current.filter(|t| *t <= end) {
        times.push(when);
        current = when.checked_add_signed(step);
    }
    Ok(times)
}

/// Run `detect` at every time in parallel; each result is stamped with its time
///
/// Results come back in the order of `times`. The first failing snapshot aborts the run.
pub fn detect_at_times<F>(times: &[DateTime<Utc>], detect: F) -> Result<Vec<ThreatCollection>>
where
    F: Fn(DateTime<Utc>) -> Result<ThreatCollection> + Sync,
{
    times
        .par_iter()
        .map(|&when| {
            let mut collection = detect(when)?;
            collection.stamp(&to_iso(&when));
            debug!("Snapshot {}: {} threats", to_iso(&when), collection.len());
            Ok(collection)
        })
        .collect()
}

/// Whether `candidate` should replace `current` for the same cell
fn supersedes(candidate: &ThreatProperties, current: &ThreatProperties) -> bool {
    match candidate.priority_score.total_cmp(&current.priority_score) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            candidate.timestamp.as_deref().unwrap_or("")
                < current.timestamp.as_deref().unwrap_or("")
        }
    }
}

/// Best observation per cell across snapshots
#[derive(Debug, Default)]
pub struct SimulationAggregator {
    features: Vec<ThreatFeature>,
    index: FxHashMap<String, usize>,
}

impl SimulationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one stamped feature
    pub fn merge(&mut self, feature: ThreatFeature) {
        if let Some(&slot) = self.index.get(&feature.properties.cell_id) {
            if supersedes(&feature.properties, &self.features[slot].properties) {
                self.features[slot] = feature;
            }
        } else {
            self.index
                .insert(feature.properties.cell_id.clone(), self.features.len());
            self.features.push(feature);
        }
    }

    /// Offer every feature of a snapshot
    pub fn merge_collection(&mut self, collection: ThreatCollection) {
        for feature in collection.features {
            self.merge(feature);
        }
    }

    /// Number of distinct cells seen so far
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Ranked collection of retained features
    pub fn finish(self) -> ThreatCollection {
        let mut collection = ThreatCollection::new(self.features);
        collection.sort_by_priority();
        collection
    }
}

/// Merge stamped snapshots into one ranked collection with one feature per cell
pub fn aggregate(snapshots: Vec<ThreatCollection>) -> ThreatCollection {
    let snapshot_count = snapshots.len();
    let mut aggregator = SimulationAggregator::new();
    for snapshot in snapshots {
        aggregator.merge_collection(snapshot);
    }
    let merged = aggregator.finish();
    info!(
        "Merged {} snapshots into {} threatened cells",
        snapshot_count,
        merged.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threat::feature::tests::threat;
    use crate::time::parse_timestamp;

    fn stamped(cell_id: &str, priority: f64, timestamp: &str) -> ThreatFeature {
        let mut feature = threat(cell_id, priority);
        feature.properties.timestamp = Some(timestamp.to_string());
        feature
    }

    #[test]
    fn test_times_inclusive_of_end() {
        let start = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        let end = parse_timestamp("2020-08-15T12:00:00Z").unwrap();
        let times = simulation_times(start, end, 6).unwrap();
        let iso: Vec<String> = times.iter().map(to_iso).collect();
        assert_eq!(
            iso,
            vec![
                "2020-08-15T00:00:00Z",
                "2020-08-15T06:00:00Z",
                "2020-08-15T12:00:00Z"
            ]
        );
    }

    #[test]
    fn test_times_single_when_start_equals_end() {
        let start = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        assert_eq!(simulation_times(start, start, 6).unwrap().len(), 1);
    }

    #[test]
    fn test_times_reject_bad_range_and_step() {
        let start = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        let end = parse_timestamp("2020-08-14T00:00:00Z").unwrap();
        assert!(matches!(
            simulation_times(start, end, 6),
            Err(EngineError::InvalidTimeRange { .. })
        ));
        assert_eq!(
            simulation_times(start, start, 0),
            Err(EngineError::InvalidStep(0))
        );
    }

    #[test]
    fn test_times_huge_step_does_not_overflow() {
        let start = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        let end = parse_timestamp("2020-08-19T23:00:00Z").unwrap();
        assert_eq!(
            simulation_times(start, end, i64::MAX),
            Err(EngineError::InvalidStep(i64::MAX))
        );
        // Representable step whose first advance leaves the calendar range
        assert_eq!(
            simulation_times(start, end, 3_000_000_000).unwrap(),
            vec![start]
        );
    }

    #[test]
    fn test_higher_priority_wins() {
        let mut aggregator = SimulationAggregator::new();
        aggregator.merge(stamped("r1c1", 0.4, "2020-08-15T00:00:00Z"));
        aggregator.merge(stamped("r1c1", 0.6, "2020-08-15T06:00:00Z"));
        aggregator.merge(stamped("r1c1", 0.5, "2020-08-15T12:00:00Z"));
        let merged = aggregator.finish();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.features[0].properties.priority_score, 0.6);
        assert_eq!(
            merged.features[0].properties.timestamp.as_deref(),
            Some("2020-08-15T06:00:00Z")
        );
    }

    #[test]
    fn test_tie_keeps_earliest_timestamp_regardless_of_order() {
        let mut forward = SimulationAggregator::new();
        forward.merge(stamped("r0c0", 0.5, "2020-08-15T00:00:00Z"));
        forward.merge(stamped("r0c0", 0.5, "2020-08-15T06:00:00Z"));

        let mut backward = SimulationAggregator::new();
        backward.merge(stamped("r0c0", 0.5, "2020-08-15T06:00:00Z"));
        backward.merge(stamped("r0c0", 0.5, "2020-08-15T00:00:00Z"));

        for merged in [forward.finish(), backward.finish()] {
            assert_eq!(
                merged.features[0].properties.timestamp.as_deref(),
                Some("2020-08-15T00:00:00Z")
            );
        }
    }

    #[test]
    fn test_aggregate_dedups_and_ranks() {
        let first = ThreatCollection::new(vec![
            stamped("a", 0.9, "2020-08-15T00:00:00Z"),
            stamped("b", 0.3, "2020-08-15T00:00:00Z"),
        ]);
        let second = ThreatCollection::new(vec![
            stamped("b", 0.95, "2020-08-15T06:00:00Z"),
            stamped("c", 0.5, "2020-08-15T06:00:00Z"),
        ]);
        let merged = aggregate(vec![first, second]);
        let ids: Vec<&str> = merged
            .iter()
            .map(|f| f.properties.cell_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(merged.is_ranked());
    }

    #[test]
    fn test_detect_at_times_stamps_in_order() {
        let start = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        let end = parse_timestamp("2020-08-16T00:00:00Z").unwrap();
        let times = simulation_times(start, end, 6).unwrap();
        let snapshots = detect_at_times(&times, |_| {
            Ok(ThreatCollection::new(vec![threat("r0c0", 0.5)]))
        })
        .unwrap();
        assert_eq!(snapshots.len(), 5);
        for (snapshot, when) in snapshots.iter().zip(&times) {
            assert_eq!(
                snapshot.features[0].properties.timestamp,
                Some(to_iso(when))
            );
        }
    }

    #[test]
    fn test_detect_at_times_propagates_errors() {
        let start = parse_timestamp("2020-08-15T00:00:00Z").unwrap();
        let times = simulation_times(start, start, 1).unwrap();
        let result = detect_at_times(&times, |_| Err(EngineError::StormCellsUnavailable));
        assert_eq!(result, Err(EngineError::StormCellsUnavailable));
    }
}
