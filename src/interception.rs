//! Per-voxel aggregation of ray interceptions.

use crate::spatial::{classify, intersect, Aabb, Float, InterceptionCode, Segment};

/// Number of columns in a full interception row.
pub const FULL_WIDTH: usize = 9;

/// Number of columns in a reduced (occlusion) row.
pub const REDUCED_WIDTH: usize = 3;

/// Interception tallies for one voxel over a whole ray set.
///
/// `counts[c]` is the number of rays classified with code `c`; `paths[c]` is the summed path
/// length of those rays inside the voxel. `paths[0]` is always zero, and every path is zero when
/// the row was aggregated without path lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptionStats<Real: Float> {
    pub counts: [usize; 5],
    pub paths: [Real; 5],
}

impl<Real: Float> Default for InterceptionStats<Real> {
    fn default() -> Self {
        Self {
            counts: [0; 5],
            paths: [Real::ZERO; 5],
        }
    }
}

impl<Real: Float> InterceptionStats<Real> {
    #[inline]
    pub fn count(&self, code: InterceptionCode) -> usize {
        self.counts[code.index()]
    }

    #[inline]
    pub fn path(&self, code: InterceptionCode) -> Real {
        self.paths[code.index()]
    }

    /// Total number of rays tallied.
    #[inline]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    #[inline]
    fn record(&mut self, code: InterceptionCode, path: Real) {
        self.counts[code.index()] += 1;
        if code != InterceptionCode::Missed {
            self.paths[code.index()] += path;
        }
    }

    /// Collapse into entered/not-entered occlusion counts.
    ///
    /// Rays whose return lies inside the voxel entered without exiting; every other ray that
    /// reached the voxel left it again.
    pub fn occlusion(&self) -> OcclusionStats {
        let mut occ = OcclusionStats::default();
        for code in InterceptionCode::ALL {
            let n = self.count(code);
            match code {
                InterceptionCode::Missed => occ.not_entered += n,
                c if c.terminates_inside() => occ.entered_no_exit += n,
                _ => occ.entered_with_exit += n,
            }
        }
        occ
    }

    /// The row as `[count_0, .., count_4, path_1, .., path_4]`.
    pub fn to_row(&self) -> [Real; FULL_WIDTH] {
        let mut row = [Real::ZERO; FULL_WIDTH];
        for (dst, count) in row.iter_mut().zip(self.counts) {
            *dst = Real::from_count(count);
        }
        row[5..].copy_from_slice(&self.paths[1..]);
        row
    }
}

/// Occlusion tallies for one voxel.
///
/// A ray whose return lies inside the voxel was stopped there; a ray that leaves the voxel was
/// transmitted through it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OcclusionStats {
    pub not_entered: usize,
    pub entered_no_exit: usize,
    pub entered_with_exit: usize,
}

impl OcclusionStats {
    #[inline]
    pub fn total(&self) -> usize {
        self.not_entered + self.entered_no_exit + self.entered_with_exit
    }

    /// The row as `[not_entered, entered_no_exit, entered_with_exit]`.
    pub fn to_row<Real: Float>(&self) -> [Real; REDUCED_WIDTH] {
        [
            Real::from_count(self.not_entered),
            Real::from_count(self.entered_no_exit),
            Real::from_count(self.entered_with_exit),
        ]
    }
}

/// Tally every ray in `rays` against one voxel.
///
/// With `with_path_length` unset, rays are only classified and all path sums stay zero.
pub fn aggregate<Real: Float>(
    bb: &Aabb<Real>,
    rays: &[Segment<Real>],
    with_path_length: bool,
) -> InterceptionStats<Real> {
    let mut stats = InterceptionStats::default();
    if with_path_length {
        for ray in rays {
            let hit = intersect(ray, bb);
            stats.record(hit.code, hit.path);
        }
    } else {
        for ray in rays {
            stats.record(classify(ray, bb), Real::ZERO);
        }
    }
    stats
}
