//! Pure geodesy: validated coordinates, great-circle distance, and
//! human-readable distance formatting. No I/O.

use std::fmt;

/// Mean Earth radius in meters, used by the spherical haversine approximation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Validated on construction — accessors are infallible. Latitude is in
/// [-90, 90], longitude in [-180, 180], both finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn try_new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate(format!(
                "coordinate must be finite, got ({lat}, {lon})"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate(format!(
                "latitude must be in [-90, 90], got {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate(format!(
                "longitude must be in [-180, 180], got {lon}"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Panicking constructor. Use when the value is known at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the pair is out of range or non-finite.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self::try_new(lat, lon).unwrap_or_else(|e| panic!("{e}"))
    }

    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// Rejected latitude/longitude input.
#[derive(Debug)]
pub struct InvalidCoordinate(String);

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvalidCoordinate {}

/// Great-circle distance between two coordinates in meters.
///
/// Haversine on a sphere of radius [`EARTH_RADIUS_M`]. Symmetric, and
/// exactly `0.0` when both coordinates are equal.
#[must_use]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lam = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lam / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Format a distance for display: whole meters below 1 km, then km with one
/// decimal below 10 km and none above.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        return format!("{meters:.0} m");
    }
    let km = meters / 1000.0;
    if km < 10.0 {
        format!("{km:.1} km")
    } else {
        format!("{km:.0} km")
    }
}
