//! Spherical geometry kernel
//!
//! Great-circle distance and forward projection on a 6371 km sphere, even-odd polygon
//! containment, and the square cell rings used for threat geometry. Rings are ordered
//! `[lon, lat]` pairs, the `GeoJSON` convention.

pub mod grid;
pub mod land;

pub use grid::{cell_id, Grid};
pub use land::LAND_POLYGON;

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Guards the ray-casting division against horizontal edges
const EDGE_EPSILON: f64 = 1e-12;

/// Saturate `value` to `[lo, hi]`
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(value))
}

/// Clamp to the unit interval
#[inline]
pub fn clamp01(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Great-circle distance between two points (km)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Point reached after travelling `distance_km` from `(lat, lon)` along `bearing_deg`
///
/// Returns `(lat, lon)` in degrees. Longitude is not normalised to [-180, 180].
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_km: f64) -> (f64, f64) {
    let bearing = bearing_deg.to_radians();
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let angular = distance_km / EARTH_RADIUS_KM;

    let dest_lat =
        (lat_rad.sin() * angular.cos() + lat_rad.cos() * angular.sin() * bearing.cos()).asin();
    let dest_lon = lon_rad
        + (bearing.sin() * angular.sin() * lat_rad.cos())
            .atan2(angular.cos() - lat_rad.sin() * dest_lat.sin());

    (dest_lat.to_degrees(), dest_lon.to_degrees())
}

/// Even-odd ray casting test of `(lon, lat)` against a `[lon, lat]` ring
///
/// Rings with fewer than three vertices contain nothing. A closing vertex equal to the
/// first one is harmless: the zero-length edge never crosses the ray.
pub fn point_in_polygon(lon: f64, lat: f64, polygon: &[[f64; 2]]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi + EDGE_EPSILON) + xi
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Closed square ring of side `resolution_deg` centered on `(lon, lat)`
///
/// Vertex order: SW, SE, NE, NW, SW.
pub fn cell_polygon(lon: f64, lat: f64, resolution_deg: f64) -> Vec<[f64; 2]> {
    let half = resolution_deg / 2.0;
    vec![
        [lon - half, lat - half],
        [lon + half, lat - half],
        [lon + half, lat + half],
        [lon - half, lat + half],
        [lon - half, lat - half],
    ]
}

/// Unweighted mean of ring vertices as `(lat, lon)`
///
/// A duplicated closing vertex is dropped before averaging. This is not an area
/// centroid; for the near-square grid cells the two agree closely.
pub fn ring_centroid(ring: &[[f64; 2]]) -> (f64, f64) {
    let open = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if open.is_empty() {
        return (0.0, 0.0);
    }
    let count = open.len() as f64;
    let lon_sum: f64 = open.iter().map(|p| p[0]).sum();
    let lat_sum: f64 = open.iter().map(|p| p[1]).sum();
    (lat_sum / count, lon_sum / count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
        assert_eq!(clamp01(7.0), 1.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Sacramento to San Francisco, roughly 120 km
        let d = haversine_km(38.58, -121.49, 37.77, -122.42);
        assert!((115.0..125.0).contains(&d), "distance was {d}");
        assert_relative_eq!(haversine_km(37.0, -121.0, 37.0, -121.0), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(d, EARTH_RADIUS_KM * 1f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn test_destination_point_round_trip_distance() {
        let (lat, lon) = destination_point(38.0, -122.0, 90.0, 50.0);
        assert_relative_eq!(haversine_km(38.0, -122.0, lat, lon), 50.0, epsilon = 1e-6);
        assert!(lon > -122.0);
        // Due east on a great circle drifts slightly south of the start parallel
        assert!(lat < 38.0);
    }

    #[test]
    fn test_destination_point_north() {
        let (lat, lon) = destination_point(10.0, 20.0, 0.0, 111.19492664455873);
        assert_relative_eq!(lat, 11.0, epsilon = 1e-9);
        assert_relative_eq!(lon, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_point_in_polygon_square() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
        assert!(point_in_polygon(0.5, 0.5, &square));
        assert!(!point_in_polygon(1.5, 0.5, &square));
        assert!(!point_in_polygon(0.5, -0.1, &square));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
        assert!(!point_in_polygon(0.5, 0.5, &[[0.0, 0.0], [1.0, 1.0]]));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // U shape opening north
        let u = [
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [2.0, 3.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 3.0],
            [0.0, 3.0],
        ];
        assert!(point_in_polygon(0.5, 2.0, &u));
        assert!(!point_in_polygon(1.5, 2.0, &u));
        assert!(point_in_polygon(1.5, 0.5, &u));
    }

    #[test]
    fn test_cell_polygon_closed_square() {
        let ring = cell_polygon(-121.0, 38.0, 0.05);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        assert_relative_eq!(ring[2][0] - ring[0][0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(ring[2][1] - ring[0][1], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_ring_centroid_drops_closing_vertex() {
        let ring = cell_polygon(-121.0, 38.0, 0.05);
        let (lat, lon) = ring_centroid(&ring);
        assert_relative_eq!(lat, 38.0, epsilon = 1e-12);
        assert_relative_eq!(lon, -121.0, epsilon = 1e-12);
        assert_eq!(ring_centroid(&[]), (0.0, 0.0));
    }
}
