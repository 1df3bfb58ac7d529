//! Default land mask
//!
//! Coarse outline of California used to keep Pacific cells out of threat results.
//! Deliberately low-resolution: it only needs to separate open ocean from land.

/// Closed `[lon, lat]` ring
pub const LAND_POLYGON: [[f64; 2]; 16] = [
    [-124.4, 42.0],
    [-124.3, 41.0],
    [-124.1, 40.0],
    [-123.8, 39.0],
    [-123.5, 38.0],
    [-123.0, 37.0],
    [-122.6, 36.0],
    [-122.3, 35.0],
    [-121.8, 34.5],
    [-121.3, 34.0],
    [-120.9, 33.5],
    [-120.6, 33.0],
    [-117.5, 32.7],
    [-114.6, 32.7],
    [-114.6, 42.0],
    [-124.4, 42.0],
];
