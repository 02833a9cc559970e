//! Value types shared by the kartograf core and the UI shells built on top of it.
//!
//! * [`geo`] contains points in geographic coordinates ([`GeoPoint2d`](geo::GeoPoint2d)) and the
//!   conversion between screen pixel offsets and geographic deltas used by the static map service.
//! * [`cartesian`] contains screen-space types: pixel positions and viewport sizes.

pub mod cartesian;
pub mod error;
pub mod geo;

pub use geo::{GeoDelta, GeoPoint, GeoPoint2d, NewGeoPoint};
