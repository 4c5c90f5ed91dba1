use nalgebra::{Point3, Vector3};

use super::Float;

/// Axis-Aligned Bounding Box
///
/// Containment is half-open: a point on a `mins` face is inside, a point on a `maxs` face is not.
/// This way, neighboring voxels sharing a face never both claim the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<Real: Float> {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl<Real: Float> Aabb<Real> {
    #[inline]
    pub fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// Construct the box of a voxel from its center and its full per-axis edge length.
    #[inline]
    pub fn from_center(center: &Point3<Real>, edge: &Vector3<Real>) -> Self {
        let half = |axis: usize| edge[axis] / Real::TWO;
        Self {
            mins: nalgebra::point![
                center.x - half(0),
                center.y - half(1),
                center.z - half(2)
            ],
            maxs: nalgebra::point![
                center.x + half(0),
                center.y + half(1),
                center.z + half(2)
            ],
        }
    }

    /// Whether `v` lies within `[mins, maxs)` along a single axis.
    #[inline]
    pub fn contains_on(&self, axis: usize, v: Real) -> bool {
        v >= self.mins[axis] && v < self.maxs[axis]
    }

    #[inline]
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        (0..3).all(|axis| self.contains_on(axis, p[axis]))
    }

    /// Determine the center of `self`.
    #[inline]
    pub fn center(&self) -> Point3<Real> {
        let Self { mins: i, maxs: a } = self;
        nalgebra::point![
            (i.x + a.x) / Real::TWO,
            (i.y + a.y) / Real::TWO,
            (i.z + a.z) / Real::TWO
        ]
    }

    /// Clamp a single coordinate onto the face it overshoots, if any.
    #[inline]
    pub fn clamp_on(&self, axis: usize, v: Real) -> Real {
        if v < self.mins[axis] {
            self.mins[axis]
        } else if v > self.maxs[axis] {
            self.maxs[axis]
        } else {
            v
        }
    }

    /// Snap `p` onto the faces of `self` it lies beyond, axis by axis.
    ///
    /// Points already within the box are returned unchanged.
    #[inline]
    pub fn clamp(&self, p: &Point3<Real>) -> Point3<Real> {
        nalgebra::point![
            self.clamp_on(0, p.x),
            self.clamp_on(1, p.y),
            self.clamp_on(2, p.z)
        ]
    }
}
