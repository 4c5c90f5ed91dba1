use nalgebra::Point3;

use super::Float;

/// Euclidean distance between two points.
#[inline]
pub fn distance<Real: Float>(a: &Point3<Real>, b: &Point3<Real>) -> Real {
    (0..3)
        .map(|axis| {
            let d = b[axis] - a[axis];
            d * d
        })
        .fold(Real::ZERO, |acc, sq| acc + sq)
        .sqrt()
}

/// A finite scanner ray, running from the scanner `origin` to the measured return at `end`.
///
/// Parametrically, the segment covers `origin + t * (end - origin)` for `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<Real: Float> {
    pub origin: Point3<Real>,
    pub end: Point3<Real>,
}

impl<Real: Float> Segment<Real> {
    #[inline]
    pub fn new(origin: Point3<Real>, end: Point3<Real>) -> Self {
        Self { origin, end }
    }

    #[inline]
    pub fn length(&self) -> Real {
        distance(&self.origin, &self.end)
    }

    /// Component of `end - origin` along `axis`.
    #[inline]
    pub fn direction_on(&self, axis: usize) -> Real {
        self.end[axis] - self.origin[axis]
    }

    /// The same segment, traversed from `end` to `origin`.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.end,
            end: self.origin,
        }
    }
}
