//! Point-value queries over a loaded PM2.5 sample set.
//!
//! A [`SpatialLookup`] owns one dataset at a time. Loading quantizes every
//! sample to two decimal places into a [`GridIndex`] so repeated queries at
//! grid coordinates are O(1). Anything else falls back to a linear
//! nearest-sample scan in plain degree space:
//!
//! - the scan stops at the first sample closer than [`EARLY_EXIT_DISTANCE`];
//! - the result is accepted only if closer than [`MAX_DISTANCE`].
//!
//! Distances are Euclidean on raw `(lat, lon)` degrees. This is inaccurate
//! near the poles and does not wrap at the antimeridian.

use std::collections::HashMap;

use tracing::{debug, warn};
use trueno::Vector;

use crate::data::Sample;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::projection::Projection;
use crate::transform::ViewTransform;

/// Quantization factor for grid keys (two decimal places).
pub const GRID_PRECISION: f64 = 100.0;

/// A scan hit closer than this (degrees) ends the scan immediately.
pub const EARLY_EXIT_DISTANCE: f64 = 0.1;

/// Nearest samples at or beyond this distance (degrees) are rejected.
pub const MAX_DISTANCE: f64 = 1.0;

/// A `(lat, lon)` pair rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    lat: i32,
    lon: i32,
}

impl GridKey {
    /// Quantize a coordinate pair. Returns `None` for non-finite input.
    #[must_use]
    pub fn quantize(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self {
            lat: (lat * GRID_PRECISION).round() as i32,
            lon: (lon * GRID_PRECISION).round() as i32,
        })
    }
}

/// Exact-coordinate index: quantized key to value, last write wins.
#[derive(Debug, Clone, Default)]
pub struct GridIndex {
    cells: HashMap<GridKey, Option<f32>>,
}

impl GridIndex {
    /// Index samples in iteration order.
    #[must_use]
    pub fn build(samples: &[Sample]) -> Self {
        let mut cells = HashMap::with_capacity(samples.len());
        for sample in samples {
            if let Some(key) = GridKey::quantize(sample.latitude, sample.longitude) {
                cells.insert(key, sample.reading());
            }
        }
        Self { cells }
    }

    /// Look up a key. The outer `Option` is the hit, the inner one the value.
    #[must_use]
    pub fn get(&self, key: &GridKey) -> Option<Option<f32>> {
        self.cells.get(key).copied()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Result of a nearest-sample scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Position of the sample in load order.
    pub index: usize,
    /// Its value.
    pub value: Option<f32>,
    /// Euclidean distance in degrees.
    pub distance: f64,
}

/// Summary of the loaded values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// Smallest value, `None` if no sample carries a value.
    pub min: Option<f32>,
    /// Largest value, `None` if no sample carries a value.
    pub max: Option<f32>,
    /// Number of samples, with or without a value.
    pub count: usize,
}

#[derive(Debug, Clone)]
struct Dataset {
    samples: Vec<Sample>,
    index: GridIndex,
}

/// Owns the current sample set and answers point queries against it.
///
/// # Example
///
/// ```
/// use pm25_map::data::Sample;
/// use pm25_map::lookup::SpatialLookup;
///
/// let lookup = SpatialLookup::from_samples(vec![
///     Sample::new(0.0, 0.0, 3.0),
///     Sample::new(0.0, 10.0, 55.0),
/// ])
/// .unwrap();
///
/// assert_eq!(lookup.query(0.0, 0.0), Some(3.0));
/// assert_eq!(lookup.query(0.0, 9.5), Some(55.0));
/// assert_eq!(lookup.query(50.0, 50.0), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpatialLookup {
    dataset: Option<Dataset>,
}

impl SpatialLookup {
    /// Create a lookup with no dataset loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lookup and load `samples` into it.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let mut lookup = Self::new();
        lookup.build(samples)?;
        Ok(lookup)
    }

    /// Replace the loaded dataset and rebuild the grid index.
    ///
    /// On error the previously loaded dataset, if any, stays in place.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDataset`] if `samples` is empty, a coordinate is
    /// non-finite or out of range, or a value is negative.
    pub fn build(&mut self, samples: Vec<Sample>) -> Result<()> {
        if let Err(err) = validate(&samples) {
            warn!(error = %err, "rejected sample dataset");
            return Err(err);
        }

        let index = GridIndex::build(&samples);
        debug!(samples = samples.len(), cells = index.len(), "grid index built");

        self.dataset = Some(Dataset { samples, index });
        Ok(())
    }

    /// Drop the loaded dataset.
    pub fn clear(&mut self) {
        self.dataset = None;
    }

    /// Whether a dataset is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Loaded samples in load order; empty if nothing is loaded.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        self.dataset.as_ref().map_or(&[], |d| d.samples.as_slice())
    }

    /// The grid index of the loaded dataset.
    #[must_use]
    pub fn index(&self) -> Option<&GridIndex> {
        self.dataset.as_ref().map(|d| &d.index)
    }

    /// Value at `(lat, lon)`, or `None` if no sample is close enough.
    #[must_use]
    pub fn query(&self, lat: f64, lon: f64) -> Option<f32> {
        let dataset = self.dataset.as_ref()?;
        let key = GridKey::quantize(lat, lon)?;

        if let Some(value) = dataset.index.get(&key) {
            return value;
        }

        self.nearest(lat, lon)
            .filter(|n| n.distance < MAX_DISTANCE)
            .and_then(|n| n.value)
    }

    /// Nearest sample by the fallback scan, without the acceptance radius.
    ///
    /// Ties keep the earliest sample; the scan stops at the first sample
    /// closer than [`EARLY_EXIT_DISTANCE`].
    #[must_use]
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<Nearest> {
        if lat.is_nan() || lon.is_nan() {
            return None;
        }

        let mut best: Option<Nearest> = None;
        for (index, sample) in self.samples().iter().enumerate() {
            let d_lat = sample.latitude - lat;
            let d_lon = sample.longitude - lon;
            let distance = (d_lat * d_lat + d_lon * d_lon).sqrt();

            let closer = match best {
                Some(b) => distance < b.distance,
                None => true,
            };
            if closer {
                best = Some(Nearest {
                    index,
                    value: sample.reading(),
                    distance,
                });
            }

            if distance < EARLY_EXIT_DISTANCE {
                break;
            }
        }
        best
    }

    /// Value under a screen position: undo the view transform, invert the
    /// projection, then [`query`](Self::query).
    #[must_use]
    pub fn query_screen<P>(&self, screen: Point, projection: &P, transform: &ViewTransform) -> Option<f32>
    where
        P: Projection + ?Sized,
    {
        let (lon, lat) = projection.invert(transform.invert(screen))?;
        self.query(lat, lon)
    }

    /// Min, max and count of the loaded values.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyDataset`] if nothing is loaded.
    pub fn stats(&self) -> Result<Stats> {
        let dataset = self.dataset.as_ref().ok_or(Error::EmptyDataset)?;

        let values: Vec<f32> = dataset.samples.iter().filter_map(Sample::reading).collect();
        if values.is_empty() {
            return Ok(Stats {
                min: None,
                max: None,
                count: dataset.samples.len(),
            });
        }

        let vec = Vector::from_vec(values);
        let min = vec.min().unwrap_or(f32::NAN);
        let max = vec.max().unwrap_or(f32::NAN);

        Ok(Stats {
            min: Some(min).filter(|v| !v.is_nan()),
            max: Some(max).filter(|v| !v.is_nan()),
            count: dataset.samples.len(),
        })
    }
}

fn validate(samples: &[Sample]) -> Result<()> {
    if samples.is_empty() {
        return Err(Error::InvalidDataset("no samples".to_string()));
    }

    for (i, sample) in samples.iter().enumerate() {
        let Sample {
            latitude: lat,
            longitude: lon,
            value,
        } = *sample;

        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidDataset(format!("sample {i} has latitude {lat}")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidDataset(format!("sample {i} has longitude {lon}")));
        }
        if let Some(v) = value.filter(|v| *v < 0.0) {
            return Err(Error::InvalidDataset(format!("sample {i} has negative value {v}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Equirectangular;

    fn two_samples() -> SpatialLookup {
        SpatialLookup::from_samples(vec![Sample::new(0.0, 0.0, 3.0), Sample::new(0.0, 10.0, 55.0)])
            .unwrap()
    }

    #[test]
    fn test_grid_key_rounds_to_two_decimals() {
        assert_eq!(GridKey::quantize(12.344, 5.0), GridKey::quantize(12.34, 5.0));
        assert_ne!(GridKey::quantize(12.346, 5.0), GridKey::quantize(12.34, 5.0));
        assert_eq!(GridKey::quantize(f64::NAN, 0.0), None);
    }

    #[test]
    fn test_exact_match() {
        let lookup = two_samples();
        assert_eq!(lookup.query(0.0, 0.0), Some(3.0));
        assert_eq!(lookup.query(0.004, 9.996), Some(55.0));
    }

    #[test]
    fn test_tie_keeps_first_sample_but_is_out_of_range() {
        let lookup = two_samples();

        let nearest = lookup.nearest(0.0, 5.0).unwrap();
        assert_eq!(nearest.index, 0);
        assert_eq!(nearest.value, Some(3.0));
        assert!((nearest.distance - 5.0).abs() < 1e-12);

        assert_eq!(lookup.query(0.0, 5.0), None);
    }

    #[test]
    fn test_far_query_is_absent() {
        assert_eq!(two_samples().query(50.0, 50.0), None);
    }

    #[test]
    fn test_fallback_within_radius() {
        let lookup = two_samples();
        assert_eq!(lookup.query(0.5, 0.5), Some(3.0));
        assert_eq!(lookup.query(-0.3, 10.9), Some(55.0));
        // sqrt(0.72^2 + 0.72^2) > 1.0
        assert_eq!(lookup.query(0.72, 0.72), None);
    }

    #[test]
    fn test_early_exit_takes_first_close_sample() {
        let lookup = SpatialLookup::from_samples(vec![
            Sample::new(0.0, 0.05, 1.0),
            Sample::new(0.0, 0.026, 2.0),
        ])
        .unwrap();

        // The second sample is closer, but the first is already under 0.1
        let nearest = lookup.nearest(0.0, 0.024).unwrap();
        assert_eq!(nearest.index, 0);
        assert_eq!(lookup.query(0.0, 0.024), Some(1.0));
    }

    #[test]
    fn test_last_write_wins_in_index() {
        let lookup = SpatialLookup::from_samples(vec![
            Sample::new(1.0, 1.0, 10.0),
            Sample::new(1.001, 1.001, 20.0),
        ])
        .unwrap();
        assert_eq!(lookup.index().unwrap().len(), 1);
        assert_eq!(lookup.query(1.0, 1.0), Some(20.0));
    }

    #[test]
    fn test_exact_hit_on_absent_value_does_not_fall_back() {
        let lookup = SpatialLookup::from_samples(vec![
            Sample::empty(2.0, 2.0),
            Sample::new(2.05, 2.0, 40.0),
        ])
        .unwrap();
        assert_eq!(lookup.query(2.0, 2.0), None);
        assert_eq!(lookup.query(2.05, 2.0), Some(40.0));
    }

    #[test]
    fn test_nan_query_is_absent() {
        let lookup = two_samples();
        assert_eq!(lookup.query(f64::NAN, 0.0), None);
        assert_eq!(lookup.query(0.0, f64::NAN), None);
        assert_eq!(lookup.nearest(f64::NAN, 0.0), None);
    }

    #[test]
    fn test_unloaded_lookup() {
        let lookup = SpatialLookup::new();
        assert!(!lookup.is_loaded());
        assert!(lookup.samples().is_empty());
        assert_eq!(lookup.query(0.0, 0.0), None);
        assert!(matches!(lookup.stats(), Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_build_rejects_bad_input() {
        let mut lookup = SpatialLookup::new();
        assert!(matches!(lookup.build(vec![]), Err(Error::InvalidDataset(_))));
        assert!(lookup.build(vec![Sample::new(91.0, 0.0, 1.0)]).is_err());
        assert!(lookup.build(vec![Sample::new(0.0, -180.5, 1.0)]).is_err());
        assert!(lookup.build(vec![Sample::new(f64::NAN, 0.0, 1.0)]).is_err());
        assert!(lookup.build(vec![Sample::new(0.0, 0.0, -2.0)]).is_err());
        assert!(!lookup.is_loaded());
    }

    #[test]
    fn test_failed_reload_keeps_previous_dataset() {
        let mut lookup = two_samples();
        assert!(lookup.build(vec![Sample::new(100.0, 0.0, 1.0)]).is_err());
        assert_eq!(lookup.query(0.0, 0.0), Some(3.0));
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let mut lookup = two_samples();
        lookup.build(vec![Sample::new(40.0, 40.0, 7.0)]).unwrap();
        assert_eq!(lookup.samples().len(), 1);
        assert_eq!(lookup.query(0.0, 0.0), None);
        assert_eq!(lookup.query(40.0, 40.0), Some(7.0));
    }

    #[test]
    fn test_stats() {
        let lookup = SpatialLookup::from_samples(vec![
            Sample::new(0.0, 0.0, 3.0),
            Sample::empty(1.0, 1.0),
            Sample::new(2.0, 2.0, 55.0),
            Sample::new(3.0, 3.0, 12.5),
        ])
        .unwrap();

        let stats = lookup.stats().unwrap();
        assert_eq!(stats.min, Some(3.0));
        assert_eq!(stats.max, Some(55.0));
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn test_stats_without_values() {
        let lookup = SpatialLookup::from_samples(vec![Sample::empty(0.0, 0.0)]).unwrap();
        let stats = lookup.stats().unwrap();
        assert_eq!(stats, Stats { min: None, max: None, count: 1 });
    }

    #[test]
    fn test_query_screen() {
        let projection = Equirectangular::fit_size(360.0, 180.0);
        let lookup = SpatialLookup::from_samples(vec![Sample::new(45.0, 90.0, 21.0)]).unwrap();

        // Equirectangular at 360x180: 1 px per degree, lon 90 -> x 270, lat 45 -> y 45
        let identity = ViewTransform::IDENTITY;
        assert_eq!(lookup.query_screen(Point::new(270.0, 45.0), &projection, &identity), Some(21.0));

        let zoomed = ViewTransform::new(2.0, -100.0, 10.0);
        let screen = zoomed.apply(Point::new(270.0, 45.0));
        assert_eq!(lookup.query_screen(screen, &projection, &zoomed), Some(21.0));

        // Closures cannot be inverted
        let closure = |lon: f64, lat: f64| Some(Point::new(lon as f32, lat as f32));
        assert_eq!(lookup.query_screen(Point::new(90.0, 45.0), &closure, &identity), None);
    }
}
