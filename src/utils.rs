//! Miscellaneous geometry helpers.

use crate::V2;

/// An axis-aligned rectangle, stored as its top-left corner and its (non-negative) size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    pub origin: V2,
    pub size: V2,
}

impl Rect2 {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: V2::new(x, y),
            size: V2::new(width, height),
        }
    }

    /// Returns the smallest `Rect2` which contains every point yielded by `points`, or `None` if
    /// the iterator didn't yield any points.
    pub fn bbox(points: impl IntoIterator<Item = V2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for v in points {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        Some(Self {
            origin: min,
            size: max - min,
        })
    }
}
