//! Segment/box interception.
//!
//! A scanner ray is a finite [Segment]; a voxel is an [Aabb]. For each pair we decide whether the
//! ray reaches the voxel at all, which of its endpoints lie inside, and how much of the ray's
//! length is spent inside the voxel.

use nalgebra::Point3;

use super::{distance, Aabb, Float, Segment};

/// How a [Segment] relates to an [Aabb].
///
/// The discriminants are the column indices used in interception tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum InterceptionCode {
    /// The segment never enters the box.
    Missed = 0,
    /// Both endpoints lie inside the box.
    Contained = 1,
    /// The origin lies inside; the segment leaves the box before its end.
    Exiting = 2,
    /// The end lies inside; the segment enters the box after its origin.
    Entering = 3,
    /// Neither endpoint lies inside, but the segment passes through the box.
    Crossing = 4,
}

impl InterceptionCode {
    /// Every code, in column order.
    pub const ALL: [Self; 5] = [
        Self::Missed,
        Self::Contained,
        Self::Exiting,
        Self::Entering,
        Self::Crossing,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The code the same ray would receive if traversed in the opposite direction.
    #[inline]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Exiting => Self::Entering,
            Self::Entering => Self::Exiting,
            other => other,
        }
    }

    /// Whether the measured return (the segment's end) lies inside the box.
    #[inline]
    pub const fn terminates_inside(self) -> bool {
        matches!(self, Self::Contained | Self::Entering)
    }
}

/// Result of intersecting one [Segment] with one [Aabb].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interception<Real: Float> {
    pub code: InterceptionCode,
    /// Length of the part of the segment lying inside the box; zero for [InterceptionCode::Missed].
    pub path: Real,
}

impl<Real: Float> Interception<Real> {
    #[inline]
    pub fn missed() -> Self {
        Self {
            code: InterceptionCode::Missed,
            path: Real::ZERO,
        }
    }

    #[inline]
    pub fn is_missed(&self) -> bool {
        self.code == InterceptionCode::Missed
    }
}

/// Intersect a segment with a box, measuring the covered path length.
///
/// Zero-length segments are treated as a single point: [Contained](InterceptionCode::Contained)
/// with a path of zero if that point lies inside, [Missed](InterceptionCode::Missed) otherwise.
pub fn intersect<Real: Float>(seg: &Segment<Real>, bb: &Aabb<Real>) -> Interception<Real> {
    intercept(seg, bb, true)
}

/// Classify a segment against a box without measuring path length.
pub fn classify<Real: Float>(seg: &Segment<Real>, bb: &Aabb<Real>) -> InterceptionCode {
    intercept(seg, bb, false).code
}

fn intercept<Real: Float>(
    seg: &Segment<Real>,
    bb: &Aabb<Real>,
    measure: bool,
) -> Interception<Real> {
    if (0..3).any(|axis| separated_on(seg, bb, axis)) {
        return Interception::missed();
    }

    let span = |a: &Point3<Real>, b: &Point3<Real>| {
        if measure {
            distance(a, b)
        } else {
            Real::ZERO
        }
    };

    match (bb.contains(&seg.origin), bb.contains(&seg.end)) {
        (true, true) => Interception {
            code: InterceptionCode::Contained,
            path: span(&seg.origin, &seg.end),
        },
        (true, false) => Interception {
            code: InterceptionCode::Exiting,
            path: span(&seg.origin, &bb.clamp(&seg.end)),
        },
        (false, true) => Interception {
            code: InterceptionCode::Entering,
            path: span(&bb.clamp(&seg.origin), &seg.end),
        },
        (false, false) => match slab(seg, bb) {
            Some((t_min, t_max)) => Interception {
                code: InterceptionCode::Crossing,
                path: if measure {
                    (t_max - t_min) * seg.length()
                } else {
                    Real::ZERO
                },
            },
            None => Interception::missed(),
        },
    }
}

/// Whether both endpoints lie on the same outer side of `bb` along `axis`.
#[inline]
fn separated_on<Real: Float>(seg: &Segment<Real>, bb: &Aabb<Real>, axis: usize) -> bool {
    let (o, e) = (seg.origin[axis], seg.end[axis]);
    let (lo, hi) = (bb.mins[axis], bb.maxs[axis]);
    (o < lo && e < lo) || (o >= hi && e >= hi)
}

/// Clip the segment's parametric range against each axis slab of `bb`.
///
/// Returns the covered `[t_min, t_max]` interval, or `None` when it is empty or falls outside the
/// segment.
fn slab<Real: Float>(seg: &Segment<Real>, bb: &Aabb<Real>) -> Option<(Real, Real)> {
    let mut t_min = Real::neg_infinity();
    let mut t_max = Real::infinity();

    for axis in 0..3 {
        let o = seg.origin[axis];
        let d = seg.direction_on(axis);
        if d == Real::ZERO {
            // parallel to this slab: no constraint from inside it, no hit from outside it
            if !bb.contains_on(axis, o) {
                return None;
            }
            continue;
        }
        let t0 = (bb.mins[axis] - o) / d;
        let t1 = (bb.maxs[axis] - o) / d;
        let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        t_min = t_min.max(near);
        t_max = t_max.min(far);
    }

    if t_min > t_max || t_min > Real::ONE || t_max > Real::ONE || t_max < Real::ZERO {
        return None;
    }
    Some((t_min.max(Real::ZERO), t_max))
}
