//! Regular lat/lon lattice over a bounding box
//!
//! Row/column counts are the floor-divided spans (at least one each), and every cell
//! center sits half a step in from the box edge: `edge + resolution * (index + 0.5)`.
//! Collision tests and cell polygons are both built from these centers.

use crate::core_types::BoundingBox;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Immutable lattice of cell centers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub bbox: BoundingBox,
    pub resolution_deg: f64,
    /// Cell-center latitudes, south to north
    pub lats: Vec<f64>,
    /// Cell-center longitudes, west to east
    pub lons: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    /// Build the lattice for `bbox` at `resolution_deg`
    ///
    /// A box smaller than one step on an axis still yields a single cell on that axis.
    pub fn build(bbox: BoundingBox, resolution_deg: f64) -> Result<Self> {
        bbox.validate()?;
        if !resolution_deg.is_finite() || resolution_deg <= 0.0 {
            return Err(EngineError::InvalidResolution(resolution_deg));
        }

        let rows = ((bbox.lat_span() / resolution_deg).floor() as usize).max(1);
        let cols = ((bbox.lon_span() / resolution_deg).floor() as usize).max(1);

        let lats = (0..rows)
            .map(|i| bbox.min_lat + resolution_deg * (i as f64 + 0.5))
            .collect();
        let lons = (0..cols)
            .map(|j| bbox.min_lon + resolution_deg * (j as f64 + 0.5))
            .collect();

        Ok(Self {
            bbox,
            resolution_deg,
            lats,
            lons,
            rows,
            cols,
        })
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell center `(lat, lon)` for a row-major flat index
    #[inline]
    pub fn center_at(&self, index: usize) -> (f64, f64) {
        (self.lats[index / self.cols], self.lons[index % self.cols])
    }

    /// Iterate `(row, col, lat, lon)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.lats.iter().enumerate().flat_map(move |(r, &lat)| {
            self.lons
                .iter()
                .enumerate()
                .map(move |(c, &lon)| (r, c, lat, lon))
        })
    }
}

/// Stable identifier of a grid cell
pub fn cell_id(row: usize, col: usize) -> String {
    format!("r{row}c{col}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_region_dimensions() {
        let bbox = BoundingBox::new(-124.5, 36.0, -118.0, 39.5).unwrap();
        let grid = Grid::build(bbox, 0.05).unwrap();
        assert_eq!(grid.rows, 70);
        assert_eq!(grid.cols, 130);
        assert_eq!(grid.lats.len(), 70);
        assert_eq!(grid.lons.len(), 130);
        assert_eq!(grid.len(), 9100);
    }

    #[test]
    fn test_centers_offset_half_step() {
        let bbox = BoundingBox::new(-121.0, 37.0, -120.0, 38.0).unwrap();
        let grid = Grid::build(bbox, 0.25).unwrap();
        assert_eq!((grid.rows, grid.cols), (4, 4));
        assert_relative_eq!(grid.lats[0], 37.125);
        assert_relative_eq!(grid.lons[3], -120.125);
    }

    #[test]
    fn test_tiny_box_yields_single_cell() {
        let bbox = BoundingBox::new(-121.0, 37.0, -120.99, 37.01).unwrap();
        let grid = Grid::build(bbox, 0.05).unwrap();
        assert_eq!((grid.rows, grid.cols), (1, 1));
        assert_relative_eq!(grid.lats[0], 37.025);
    }

    #[test]
    fn test_invalid_resolution_rejected() {
        let bbox = BoundingBox::new(-121.0, 37.0, -120.0, 38.0).unwrap();
        assert_eq!(
            Grid::build(bbox, 0.0),
            Err(EngineError::InvalidResolution(0.0))
        );
        assert!(Grid::build(bbox, -0.1).is_err());
        assert!(Grid::build(bbox, f64::NAN).is_err());
    }

    #[test]
    fn test_cells_iterate_row_major() {
        let bbox = BoundingBox::new(0.0, 0.0, 3.0, 2.0).unwrap();
        let grid = Grid::build(bbox, 1.0).unwrap();
        let ids: Vec<String> = grid.cells().map(|(r, c, _, _)| cell_id(r, c)).collect();
        assert_eq!(ids, vec!["r0c0", "r0c1", "r0c2", "r1c0", "r1c1", "r1c2"]);
        assert_eq!(grid.center_at(4), (1.5, 1.5));
    }
}
