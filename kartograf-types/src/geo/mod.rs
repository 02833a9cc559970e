//! Points in geographic coordinates (see [`GeoPoint`]) and the pixel to degree conversion used by
//! the static map service (see [`pixel_to_geo_delta`]).

mod math;
mod point;

pub use math::{pixel_to_geo_delta, GeoDelta, MAX_ZOOM, MIN_ZOOM};
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
