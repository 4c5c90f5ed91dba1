//! Regular voxel grids.
//!
//! [voxelize] quantizes a point cloud into voxel centers; [VoxelGrid] turns a (deduplicated) set of
//! centers back into boxes for the interception engine.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::{
    error::Error,
    spatial::{Aabb, Float},
};

/// Full per-axis width of a voxel. Every component is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLength<Real: Float>(Vector3<Real>);

impl<Real: Float> EdgeLength<Real> {
    /// # Errors
    ///
    /// * [`InvalidEdgeLength`](Error::InvalidEdgeLength) if any component is zero, negative, or
    ///   not finite.
    pub fn new(edge: Vector3<Real>) -> Result<Self, Error<Real>> {
        if edge.iter().all(|e| e.is_finite() && *e > Real::ZERO) {
            Ok(Self(edge))
        } else {
            Err(Error::InvalidEdgeLength(edge))
        }
    }

    /// A cubic voxel.
    pub fn cube(length: Real) -> Result<Self, Error<Real>> {
        Self::new(Vector3::new(length, length, length))
    }

    #[inline]
    pub fn as_vector(&self) -> &Vector3<Real> {
        &self.0
    }
}

impl<Real: Float> TryFrom<Vector3<Real>> for EdgeLength<Real> {
    type Error = Error<Real>;

    fn try_from(edge: Vector3<Real>) -> Result<Self, Self::Error> {
        Self::new(edge)
    }
}

/// Snap every point to the center of the voxel containing it.
///
/// The grid is anchored at the per-axis minimum of `points`. Along each axis, a coordinate `c`
/// falls in voxel `floor((c - min) / edge)`, whose center is `min + index * edge + edge / 2`.
///
/// One center is returned per input point, in input order; duplicates are kept.
pub fn voxelize<Real: Float>(
    points: &[Point3<Real>],
    edge: &EdgeLength<Real>,
) -> Vec<Point3<Real>> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let origin = points.iter().fold(*first, |acc, p| acc.inf(p));
    let edge = edge.as_vector();

    let snap = |axis: usize, c: Real| {
        let index = ((c - origin[axis]) / edge[axis]).floor();
        origin[axis] + index * edge[axis] + edge[axis] / Real::TWO
    };

    points
        .iter()
        .map(|p| nalgebra::point![snap(0, p.x), snap(1, p.y), snap(2, p.z)])
        .collect()
}

/// An ordered set of voxels sharing one edge length.
///
/// Uniqueness of the centers is not checked.
#[derive(Debug, Clone)]
pub struct VoxelGrid<Real: Float> {
    centers: Vec<Point3<Real>>,
    edge: EdgeLength<Real>,
}

impl<Real: Float> VoxelGrid<Real> {
    pub fn new(centers: Vec<Point3<Real>>, edge: EdgeLength<Real>) -> Self {
        Self { centers, edge }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    #[inline]
    pub fn edge(&self) -> &EdgeLength<Real> {
        &self.edge
    }

    #[inline]
    pub fn centers(&self) -> &[Point3<Real>] {
        &self.centers
    }

    /// The box of the `index`th voxel.
    #[inline]
    pub fn aabb(&self, index: usize) -> Option<Aabb<Real>> {
        self.centers
            .get(index)
            .map(|c| Aabb::from_center(c, self.edge.as_vector()))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Aabb<Real>> + '_ {
        self.centers
            .iter()
            .map(|c| Aabb::from_center(c, self.edge.as_vector()))
    }

    pub fn par_aabbs(&self) -> impl IndexedParallelIterator<Item = Aabb<Real>> + '_ {
        let edge = self.edge.as_vector();
        self.centers
            .par_iter()
            .map(move |c| Aabb::from_center(c, edge))
    }
}
