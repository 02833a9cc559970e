use serde::{Deserialize, Serialize};

use super::Point2;

/// Size of a rectangular screen area, e.g. the map viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size<Num = f64> {
    width: Num,
    height: Num,
}

impl<Num: num_traits::Num + PartialOrd + Copy> Size<Num> {
    /// Creates a new size.
    pub fn new(width: Num, height: Num) -> Self {
        Self { width, height }
    }

    /// Width of the area.
    pub fn width(&self) -> Num {
        self.width
    }

    /// Half of the width of the area.
    pub fn half_width(&self) -> Num {
        self.width / (Num::one() + Num::one())
    }

    /// Height of the area.
    pub fn height(&self) -> Num {
        self.height
    }

    /// Half of the height of the area.
    pub fn half_height(&self) -> Num {
        self.height / (Num::one() + Num::one())
    }

    /// Returns true if either of the dimensions is zero.
    pub fn is_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    /// Center of the area, measured from its top-left corner.
    pub fn center(&self) -> Point2<Num>
    where
        Num: std::fmt::Debug + 'static,
    {
        Point2::new(self.half_width(), self.half_height())
    }

    /// Returns true if the point lies inside the area. The left and top edges are inclusive, the
    /// right and bottom edges are not.
    pub fn contains(&self, point: Point2<Num>) -> bool
    where
        Num: std::fmt::Debug + 'static,
    {
        point.x >= Num::zero()
            && point.y >= Num::zero()
            && point.x < self.width
            && point.y < self.height
    }
}
