//! Screen-space types. Positions are in pixels from the top-left corner of the map viewport.

mod size;

pub use nalgebra::{Point2, Vector2 as NVector2};
pub use size::Size;

/// Pixel position on the screen.
pub type Point2d = Point2<f64>;

/// Pixel offset on the screen.
pub type Vector2 = NVector2<f64>;
