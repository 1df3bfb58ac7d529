//! Deterministic synthetic inputs
//!
//! Fields are smooth sinusoidal patterns with uniform noise, boosted around a few known
//! fire-prone zones; population and infrastructure decay exponentially away from urban
//! centers. Humidity, dewpoint depression, cloud base and precipitation efficiency are
//! derived from NDVI so the atmospheric layer stays physically coherent.
//!
//! The random stream is seeded from the provider seed, the timestamp and the box's
//! south-west corner, and restarted for every field, so a given query always yields the
//! same values.

use super::FieldProvider;
use crate::core_types::{BoundingBox, FieldGrid, FieldKind, StormCell};
use crate::geo::{clamp, haversine_km, Grid};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fire-prone zones `(lat, lon)`: Mendocino NF, Diablo Range, Santa Cruz Mountains
pub const FIRE_SEED_ZONES: [(f64, f64); 3] = [(39.5, -122.9), (37.4, -121.5), (37.1, -122.1)];

/// Urban centers `(lat, lon)`: Sacramento, San Francisco, San Jose
pub const URBAN_CENTERS: [(f64, f64); 3] = [(38.58, -121.49), (37.77, -122.42), (37.34, -121.89)];

/// Width of the fire-zone bumps (km)
const FIRE_BUMP_SIGMA_KM: f64 = 40.0;

/// Population decay length (km)
const POPULATION_DECAY_KM: f64 = 60.0;

/// Infrastructure decay length (km)
const INFRASTRUCTURE_DECAY_KM: f64 = 40.0;

/// Sinusoid-plus-noise field parameters
#[derive(Debug, Clone, Copy)]
struct Pattern {
    base: f64,
    amplitude: f64,
    frequency: f64,
    noise: f64,
}

const NDVI_PATTERN: Pattern = Pattern {
    base: 0.6,
    amplitude: 0.25,
    frequency: 0.5,
    noise: 0.08,
};

const SLOPE_PATTERN: Pattern = Pattern {
    base: 20.0,
    amplitude: 15.0,
    frequency: 0.8,
    noise: 4.0,
};

const CAPE_PATTERN: Pattern = Pattern {
    base: 800.0,
    amplitude: 1200.0,
    frequency: 0.6,
    noise: 200.0,
};

/// Uniform sample in `[a, b]`; tolerates `a > b` and `a == b`
#[inline]
fn uniform(rng: &mut StdRng, a: f64, b: f64) -> f64 {
    a + (b - a) * rng.random::<f64>()
}

/// Seeded synthetic provider
#[derive(Debug, Clone, Copy)]
pub struct SyntheticProvider {
    seed: u64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl SyntheticProvider {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self, bbox: &BoundingBox, when: DateTime<Utc>) -> StdRng {
        let seed = (self.seed as i64)
            .wrapping_add(when.timestamp())
            .wrapping_add((bbox.min_lat * 100.0) as i64)
            .wrapping_add((bbox.min_lon * 100.0) as i64);
        StdRng::seed_from_u64(seed as u64)
    }

    fn pattern(&self, grid: &Grid, when: DateTime<Utc>, p: Pattern) -> FieldGrid {
        let mut rng = self.rng(&grid.bbox, when);
        FieldGrid::from_fn(grid.rows, grid.cols, |r, c| {
            let (lat, lon) = (grid.lats[r], grid.lons[c]);
            let wave = f64::midpoint((lat * p.frequency).sin(), (lon * p.frequency).cos());
            p.base + p.amplitude * wave + uniform(&mut rng, -p.noise, p.noise)
        })
    }

    /// Mean of Gaussian bumps around the fire seed zones
    fn fire_bump(grid: &Grid) -> FieldGrid {
        let two_sigma_sq = 2.0 * FIRE_BUMP_SIGMA_KM * FIRE_BUMP_SIGMA_KM;
        FieldGrid::from_fn(grid.rows, grid.cols, |r, c| {
            let (lat, lon) = (grid.lats[r], grid.lons[c]);
            let sum: f64 = FIRE_SEED_ZONES
                .iter()
                .map(|&(z_lat, z_lon)| {
                    let d = haversine_km(lat, lon, z_lat, z_lon);
                    (-(d * d) / two_sigma_sq).exp()
                })
                .sum();
            sum / FIRE_SEED_ZONES.len() as f64
        })
    }

    /// Urban centers inside the box, or the box center when there are none
    fn city_centers(bbox: &BoundingBox) -> Vec<(f64, f64)> {
        let centers: Vec<(f64, f64)> = URBAN_CENTERS
            .iter()
            .copied()
            .filter(|&(lat, lon)| bbox.contains(lon, lat))
            .collect();
        if centers.is_empty() {
            vec![bbox.center()]
        } else {
            centers
        }
    }

    fn proximity(grid: &Grid, decay_km: f64) -> FieldGrid {
        let centers = Self::city_centers(&grid.bbox);
        FieldGrid::from_fn(grid.rows, grid.cols, |r, c| {
            let (lat, lon) = (grid.lats[r], grid.lons[c]);
            let sum: f64 = centers
                .iter()
                .map(|&(c_lat, c_lon)| (-haversine_km(lat, lon, c_lat, c_lon) / decay_km).exp())
                .sum();
            clamp(sum / centers.len() as f64, 0.0, 1.0)
        })
    }

    fn ndvi(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let base = self.pattern(grid, when, NDVI_PATTERN);
        let bump = Self::fire_bump(grid);
        zip_map(&base, &bump, |v, b| clamp(v + b * 0.25, 0.0, 1.0))
    }

    fn slope(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let base = self.pattern(grid, when, SLOPE_PATTERN);
        let bump = Self::fire_bump(grid);
        zip_map(&base, &bump, |v, b| clamp(v.abs() + b * 15.0, 0.0, 60.0))
    }

    fn fuel_type(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let ndvi = self.ndvi(grid, when);
        let bump = Self::fire_bump(grid);
        let mut rng = self.rng(&grid.bbox, when);
        zip_map(&ndvi, &bump, |v, b| {
            clamp(0.4 + 0.5 * v + b * 0.2 + uniform(&mut rng, -0.07, 0.07), 0.0, 1.0)
        })
    }

    fn cape(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        self.pattern(grid, when, CAPE_PATTERN)
            .map(|v| clamp(v, 0.0, 3000.0))
    }

    /// Re-seeded noisy transform of a source field, cell by cell in row-major order
    fn derived(
        &self,
        source: &FieldGrid,
        bbox: &BoundingBox,
        when: DateTime<Utc>,
        noise: f64,
        f: impl Fn(f64, f64) -> f64,
    ) -> FieldGrid {
        let mut rng = self.rng(bbox, when);
        let data = source
            .data
            .iter()
            .map(|&v| f(v, uniform(&mut rng, -noise, noise)))
            .collect();
        FieldGrid {
            data,
            rows: source.rows,
            cols: source.cols,
        }
    }

    fn dewpoint_depression(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let ndvi = self.ndvi(grid, when);
        self.derived(&ndvi, &grid.bbox, when, 2.0, |v, n| {
            clamp(5.0 + 20.0 * v + n, 0.0, 30.0)
        })
    }

    fn cloud_base_height(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let dpd = self.dewpoint_depression(grid, when);
        self.derived(&dpd, &grid.bbox, when, 0.3, |v, n| {
            clamp(1.0 + (v / 30.0) * 3.5 + n, 0.5, 5.0)
        })
    }

    fn low_level_rh(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let ndvi = self.ndvi(grid, when);
        self.derived(&ndvi, &grid.bbox, when, 5.0, |v, n| {
            clamp(80.0 - 50.0 * v + n, 10.0, 100.0)
        })
    }

    fn precip_efficiency(&self, grid: &Grid, when: DateTime<Utc>) -> FieldGrid {
        let ndvi = self.ndvi(grid, when);
        self.derived(&ndvi, &grid.bbox, when, 0.05, |v, n| {
            clamp(0.7 - 0.4 * v + n, 0.05, 0.9)
        })
    }
}

/// Cell-wise combination of two equally shaped grids
fn zip_map(a: &FieldGrid, b: &FieldGrid, mut f: impl FnMut(f64, f64) -> f64) -> FieldGrid {
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| f(x, y))
        .collect();
    FieldGrid {
        data,
        rows: a.rows,
        cols: a.cols,
    }
}

impl FieldProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn field(
        &self,
        kind: FieldKind,
        _bbox: &BoundingBox,
        grid: &Grid,
        when: DateTime<Utc>,
    ) -> Option<FieldGrid> {
        let field = match kind {
            FieldKind::Ndvi => self.ndvi(grid, when),
            FieldKind::Slope => self.slope(grid, when),
            FieldKind::FuelType => self.fuel_type(grid, when),
            FieldKind::Cape => self.cape(grid, when),
            FieldKind::DewpointDepression => self.dewpoint_depression(grid, when),
            FieldKind::CloudBaseHeight => self.cloud_base_height(grid, when),
            FieldKind::LowLevelRh => self.low_level_rh(grid, when),
            FieldKind::PrecipEfficiency => self.precip_efficiency(grid, when),
            FieldKind::PopulationProximity => Self::proximity(grid, POPULATION_DECAY_KM),
            FieldKind::InfrastructureDensity => Self::proximity(grid, INFRASTRUCTURE_DECAY_KM),
        };
        Some(field)
    }

    /// 5-10 cells in the southern third of the box, drifting west to south-west
    fn storm_cells(&self, bbox: &BoundingBox, when: DateTime<Utc>) -> Option<Vec<StormCell>> {
        let mut rng = self.rng(bbox, when);
        let count = rng.random_range(5..=10);
        let lat_min = bbox.min_lat;
        let lat_max = bbox.min_lat + bbox.lat_span() / 3.0;

        let cells = (0..count)
            .map(|i| StormCell {
                id: format!("cell-{i}"),
                center_lat: uniform(&mut rng, lat_min + 0.1, lat_max - 0.1),
                center_lon: uniform(&mut rng, bbox.min_lon + 0.3, bbox.max_lon - 0.3),
                radius_km: uniform(&mut rng, 30.0, 80.0),
                speed_kmh: uniform(&mut rng, 15.0, 60.0),
                bearing_deg: uniform(&mut rng, 200.0, 280.0),
            })
            .collect();
        Some(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BBOX;
    use crate::time::parse_timestamp;

    fn setup() -> (Grid, DateTime<Utc>) {
        let grid = Grid::build(DEFAULT_BBOX, 0.25).unwrap();
        let when = parse_timestamp("2020-08-16T12:00:00Z").unwrap();
        (grid, when)
    }

    #[test]
    fn test_fields_are_deterministic() {
        let (grid, when) = setup();
        let provider = SyntheticProvider::default();
        for kind in FieldKind::ALL {
            let a = provider.field(kind, &grid.bbox, &grid, when).unwrap();
            let b = provider.field(kind, &grid.bbox, &grid, when).unwrap();
            assert_eq!(a, b, "{kind} differs between calls");
            assert_eq!(a.shape(), (grid.rows, grid.cols));
        }
    }

    #[test]
    fn test_seed_changes_noise() {
        let (grid, when) = setup();
        let a = SyntheticProvider::new(1).field(FieldKind::Cape, &grid.bbox, &grid, when);
        let b = SyntheticProvider::new(2).field(FieldKind::Cape, &grid.bbox, &grid, when);
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_ranges() {
        let (grid, when) = setup();
        let provider = SyntheticProvider::default();
        let ranges = [
            (FieldKind::Ndvi, 0.0, 1.0),
            (FieldKind::Slope, 0.0, 60.0),
            (FieldKind::FuelType, 0.0, 1.0),
            (FieldKind::Cape, 0.0, 3000.0),
            (FieldKind::DewpointDepression, 0.0, 30.0),
            (FieldKind::CloudBaseHeight, 0.5, 5.0),
            (FieldKind::LowLevelRh, 10.0, 100.0),
            (FieldKind::PrecipEfficiency, 0.05, 0.9),
            (FieldKind::PopulationProximity, 0.0, 1.0),
            (FieldKind::InfrastructureDensity, 0.0, 1.0),
        ];
        for (kind, lo, hi) in ranges {
            let field = provider.field(kind, &grid.bbox, &grid, when).unwrap();
            assert!(
                field.as_slice().iter().all(|&v| (lo..=hi).contains(&v)),
                "{kind} out of [{lo}, {hi}]"
            );
        }
    }

    #[test]
    fn test_population_peaks_near_city() {
        let (grid, when) = setup();
        let pop = SyntheticProvider::default()
            .field(FieldKind::PopulationProximity, &grid.bbox, &grid, when)
            .unwrap();
        let nearest = |lat: f64, lon: f64| {
            let r = grid
                .lats
                .iter()
                .enumerate()
                .min_by(|a, b| (a.1 - lat).abs().total_cmp(&(b.1 - lat).abs()))
                .map(|(i, _)| i)
                .unwrap();
            let c = grid
                .lons
                .iter()
                .enumerate()
                .min_by(|a, b| (a.1 - lon).abs().total_cmp(&(b.1 - lon).abs()))
                .map(|(i, _)| i)
                .unwrap();
            (r, c)
        };
        let (sr, sc) = nearest(38.58, -121.49);
        let (rr, rc) = nearest(36.1, -118.1);
        assert!(pop.get(sr, sc) > pop.get(rr, rc));
    }

    #[test]
    fn test_city_fallback_to_box_center() {
        let remote = BoundingBox::new(-110.0, 40.0, -109.0, 41.0).unwrap();
        assert_eq!(SyntheticProvider::city_centers(&remote), vec![(40.5, -109.5)]);
        assert_eq!(SyntheticProvider::city_centers(&DEFAULT_BBOX).len(), 3);
    }

    #[test]
    fn test_storm_cells_in_southern_third() {
        let (grid, when) = setup();
        let cells = SyntheticProvider::default()
            .storm_cells(&grid.bbox, when)
            .unwrap();
        assert!((5..=10).contains(&cells.len()));
        let southern_limit = DEFAULT_BBOX.min_lat + DEFAULT_BBOX.lat_span() / 3.0;
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.id, format!("cell-{i}"));
            assert!(cell.center_lat >= DEFAULT_BBOX.min_lat && cell.center_lat <= southern_limit);
            assert!((30.0..=80.0).contains(&cell.radius_km));
            assert!((15.0..=60.0).contains(&cell.speed_kmh));
            assert!((200.0..=280.0).contains(&cell.bearing_deg));
        }
    }

    #[test]
    fn test_tiny_box_does_not_panic() {
        let tiny = BoundingBox::new(-121.0, 38.0, -120.99, 38.01).unwrap();
        let cells = SyntheticProvider::default().storm_cells(&tiny, Utc::now()).unwrap();
        assert!(!cells.is_empty());
    }
}
