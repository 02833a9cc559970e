use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_traits::Float;
use serde::{Deserialize, Serialize};

use super::GeoDelta;
use crate::error::KartografTypesError;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;
/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Point on the surface of the Earth.
pub trait GeoPoint {
    /// Numeric type used to represent coordinates.
    type Num: Float;

    /// Latitude in degrees.
    fn lat(&self) -> Self::Num;
    /// Longitude in degrees.
    fn lon(&self) -> Self::Num;
}

/// Geo point that can be constructed from its coordinates.
pub trait NewGeoPoint<N = f64>: GeoPoint<Num = N> + Sized {
    /// Creates a point from latitude and longitude in degrees.
    fn latlon(lat: N, lon: N) -> Self;
    /// Creates a point from longitude and latitude in degrees.
    fn lonlat(lon: N, lat: N) -> Self {
        Self::latlon(lat, lon)
    }
}

/// 2d point in geographic coordinates (degrees).
///
/// The static map service and the geocoder both use the longitude-first order, so does the
/// [`Display`] and [`FromStr`] implementations of this type: `"37.6,55.7"` is longitude 37.6,
/// latitude 55.7.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint2d {
    lon: f64,
    lat: f64,
}

impl GeoPoint for GeoPoint2d {
    type Num = f64;

    fn lat(&self) -> f64 {
        self.lat
    }

    fn lon(&self) -> f64 {
        self.lon
    }
}

impl NewGeoPoint<f64> for GeoPoint2d {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self { lon, lat }
    }
}

impl GeoPoint2d {
    /// Returns true if the longitude is in `[-180, 180]` and the latitude in `[-90, 90]`.
    pub fn is_valid(&self) -> bool {
        (MIN_LON..=MAX_LON).contains(&self.lon) && (MIN_LAT..=MAX_LAT).contains(&self.lat)
    }

    /// Returns the point shifted by the delta, or `None` if the result is not a valid point.
    pub fn checked_add(&self, delta: GeoDelta) -> Option<Self> {
        let moved = Self {
            lon: self.lon + delta.d_lon,
            lat: self.lat + delta.d_lat,
        };

        moved.is_valid().then_some(moved)
    }

    /// Parses the space separated `"lon lat"` form used by the geocoder in `Point.pos`.
    pub fn from_pos(pos: &str) -> Result<Self, KartografTypesError> {
        let mut parts = pos.split_whitespace();
        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(KartografTypesError::InvalidCoordinate(pos.to_string()));
        };

        Self::parse_pair(lon, lat, pos)
    }

    fn parse_pair(lon: &str, lat: &str, source: &str) -> Result<Self, KartografTypesError> {
        let invalid = || KartografTypesError::InvalidCoordinate(source.to_string());
        let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;

        let point = Self { lon, lat };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(invalid())
        }
    }
}

impl Display for GeoPoint2d {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

impl FromStr for GeoPoint2d {
    type Err = KartografTypesError;

    /// Parses the comma separated `"lon,lat"` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((lon, lat)) => Self::parse_pair(lon, lat, s),
            None => Err(KartografTypesError::InvalidCoordinate(s.to_string())),
        }
    }
}

/// Creates a new GeoPoint2d from latitude and longitude values (in degrees).
///
/// ```
/// use kartograf_types::geo::GeoPoint;
/// use kartograf_types::latlon;
///
/// let point = latlon!(55.7, 37.6);
/// assert_eq!(point.lat(), 55.7);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::latlon($lat, $lon)
    };
}

/// Creates a new GeoPoint2d from longitude and latitude values (in degrees), in the order the
/// static map service uses.
///
/// ```
/// use kartograf_types::geo::GeoPoint;
/// use kartograf_types::lonlat;
///
/// let point = lonlat!(37.6, 55.7);
/// assert_eq!(point.lon(), 37.6);
/// ```
#[macro_export]
macro_rules! lonlat {
    ($lon:expr, $lat:expr) => {
        <$crate::geo::GeoPoint2d as $crate::geo::NewGeoPoint<f64>>::lonlat($lon, $lat)
    };
}
