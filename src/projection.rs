//! Geographic projections from `(lon, lat)` degrees to map-space pixels.
//!
//! The renderer and the hover lookup only see the [`Projection`] trait, so
//! any closure `Fn(f64, f64) -> Option<Point>` can be injected. Two fitted
//! world projections are provided for callers without their own projection
//! library.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::geometry::Point;

const TO_RAD: f64 = PI / 180.0;
const TO_DEG: f64 = 180.0 / PI;

/// Maps geographic coordinates into map-space pixels.
pub trait Projection {
    /// Project `(lon, lat)` in degrees. Returns `None` if the point cannot be
    /// placed on the map.
    fn project(&self, lon: f64, lat: f64) -> Option<Point>;

    /// Invert a map-space point back to `(lon, lat)` degrees.
    ///
    /// The default implementation reports every point as not invertible.
    fn invert(&self, _point: Point) -> Option<(f64, f64)> {
        None
    }
}

impl<F> Projection for F
where
    F: Fn(f64, f64) -> Option<Point>,
{
    fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        self(lon, lat)
    }
}

/// Validate and convert degrees to radians, rejecting off-globe input.
fn to_radians(lon: f64, lat: f64) -> Option<(f64, f64)> {
    if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
        return None;
    }
    Some((lon * TO_RAD, lat * TO_RAD))
}

/// Screen placement of a raw projection: `x = tx + k·x_raw`, `y = ty - k·y_raw`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    k: f64,
    tx: f64,
    ty: f64,
}

impl Fit {
    /// Fit a raw extent of `±half_x × ±half_y` into a `width × height` box,
    /// centered, preserving aspect ratio.
    fn new(width: f64, height: f64, half_x: f64, half_y: f64) -> Self {
        let k = (width / (2.0 * half_x)).min(height / (2.0 * half_y));
        Self {
            k,
            tx: width / 2.0,
            ty: height / 2.0,
        }
    }

    fn place(self, x: f64, y: f64) -> Option<Point> {
        let point = Point::new((self.tx + self.k * x) as f32, (self.ty - self.k * y) as f32);
        point.is_finite().then_some(point)
    }

    fn unplace(self, point: Point) -> (f64, f64) {
        (
            (f64::from(point.x) - self.tx) / self.k,
            (self.ty - f64::from(point.y)) / self.k,
        )
    }
}

/// Natural Earth I pseudo-cylindrical projection fitted to an output size.
///
/// # Example
///
/// ```
/// use pm25_map::projection::{NaturalEarth1, Projection};
///
/// let projection = NaturalEarth1::fit_size(1000.0, 500.0);
/// let center = projection.project(0.0, 0.0).unwrap();
/// assert_eq!((center.x, center.y), (500.0, 250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalEarth1 {
    fit: Fit,
}

impl NaturalEarth1 {
    /// Fit the whole globe into a `width × height` box.
    #[must_use]
    pub fn fit_size(width: f64, height: f64) -> Self {
        let (half_x, _) = Self::raw(PI, 0.0);
        let (_, half_y) = Self::raw(0.0, FRAC_PI_2);
        Self {
            fit: Fit::new(width, height, half_x, half_y),
        }
    }

    /// Scale factor from raw units to pixels.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.fit.k
    }

    fn raw(lambda: f64, phi: f64) -> (f64, f64) {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let x = lambda
            * (0.870_700 - 0.131_979 * phi2
                + phi4 * (-0.013_791 + phi4 * (0.003_971 * phi2 - 0.001_529 * phi4)));
        let y = phi
            * (1.007_226
                + phi2 * (0.015_085 + phi4 * (-0.044_475 + 0.028_874 * phi2 - 0.005_916 * phi4)));
        (x, y)
    }

    /// Newton iteration on latitude, then closed-form longitude.
    fn raw_invert(x: f64, y: f64) -> Option<(f64, f64)> {
        let mut phi = y;
        for _ in 0..25 {
            let phi2 = phi * phi;
            let phi4 = phi2 * phi2;
            let f = phi
                * (1.007_226
                    + phi2
                        * (0.015_085 + phi4 * (-0.044_475 + 0.028_874 * phi2 - 0.005_916 * phi4)))
                - y;
            let df = 1.007_226
                + phi2
                    * (0.015_085 * 3.0
                        + phi4
                            * (-0.044_475 * 7.0 + 0.028_874 * 9.0 * phi2
                                - 0.005_916 * 11.0 * phi4));
            let delta = f / df;
            phi -= delta;
            if delta.abs() < 1e-9 {
                break;
            }
        }

        let phi2 = phi * phi;
        let lambda = x
            / (0.870_700
                + phi2 * (-0.131_979 + phi2 * (-0.013_791 + phi2 * phi2 * phi2 * (0.003_971 - 0.001_529 * phi2))));

        (lambda.is_finite() && phi.is_finite()).then_some((lambda, phi))
    }
}

impl Projection for NaturalEarth1 {
    fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        let (lambda, phi) = to_radians(lon, lat)?;
        let (x, y) = Self::raw(lambda, phi);
        self.fit.place(x, y)
    }

    fn invert(&self, point: Point) -> Option<(f64, f64)> {
        let (x, y) = self.fit.unplace(point);
        let (lambda, phi) = Self::raw_invert(x, y)?;
        let (lon, lat) = (lambda * TO_DEG, phi * TO_DEG);
        (lon.abs() <= 180.0 && lat.abs() <= 90.0).then_some((lon, lat))
    }
}

/// Plate carrée projection fitted to an output size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    fit: Fit,
}

impl Equirectangular {
    /// Fit the whole globe into a `width × height` box.
    #[must_use]
    pub fn fit_size(width: f64, height: f64) -> Self {
        Self {
            fit: Fit::new(width, height, PI, FRAC_PI_2),
        }
    }
}

impl Projection for Equirectangular {
    fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        let (lambda, phi) = to_radians(lon, lat)?;
        self.fit.place(lambda, phi)
    }

    fn invert(&self, point: Point) -> Option<(f64, f64)> {
        let (x, y) = self.fit.unplace(point);
        let (lon, lat) = (x * TO_DEG, y * TO_DEG);
        (lon.abs() <= 180.0 && lat.abs() <= 90.0).then_some((lon, lat))
    }
}
