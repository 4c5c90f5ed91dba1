//! Conversions at the boundary between row-major coordinate matrices and typed geometry.
//!
//! Rows are points; only the first three columns are read.

use nalgebra::{DMatrix, Point3, Vector3};

use crate::{
    error::Error,
    schedule::{intercept_voxels, Progress, SchedulerConfig},
    spatial::{Float, Segment},
    voxel::{voxelize, EdgeLength, VoxelGrid},
};

/// Read each row of an N × 3 (or wider) matrix as a point.
///
/// # Errors
///
/// * [`InvalidDimension`](Error::InvalidDimension) if `m` has fewer than 3 columns.
pub fn points_from_matrix<Real: Float>(
    m: &DMatrix<Real>,
    what: &'static str,
) -> Result<Vec<Point3<Real>>, Error<Real>> {
    if m.ncols() < 3 {
        return Err(Error::InvalidDimension {
            what,
            expected: 3,
            found: m.ncols(),
        });
    }
    Ok(m
        .row_iter()
        .map(|r| Point3::new(r[0], r[1], r[2]))
        .collect())
}

/// Write points as the rows of an N × 3 matrix.
pub fn points_to_matrix<Real: Float>(points: &[Point3<Real>]) -> DMatrix<Real> {
    DMatrix::from_fn(points.len(), 3, |i, j| points[i][j])
}

/// Pair up ray origins and ends.
///
/// # Errors
///
/// * [`InvalidDimension`](Error::InvalidDimension) if the two lists differ in length.
pub fn pair_rays<Real: Float>(
    origins: &[Point3<Real>],
    ends: &[Point3<Real>],
) -> Result<Vec<Segment<Real>>, Error<Real>> {
    if origins.len() != ends.len() {
        return Err(Error::InvalidDimension {
            what: "ray end rows",
            expected: origins.len(),
            found: ends.len(),
        });
    }
    Ok(origins
        .iter()
        .zip(ends)
        .map(|(o, e)| Segment::new(*o, *e))
        .collect())
}

/// Voxelize an N × 3 point matrix, returning one voxel center row per point.
///
/// # Errors
///
/// * [`InvalidDimension`](Error::InvalidDimension) if `points` has fewer than 3 columns.
/// * [`InvalidEdgeLength`](Error::InvalidEdgeLength) if any edge component isn't positive.
pub fn voxelize_matrix<Real: Float>(
    points: &DMatrix<Real>,
    edge: Vector3<Real>,
) -> Result<DMatrix<Real>, Error<Real>> {
    let points = points_from_matrix(points, "point columns")?;
    let edge = EdgeLength::new(edge)?;
    Ok(points_to_matrix(&voxelize(&points, &edge)))
}

/// Run the interception engine on raw matrices.
///
/// `origins` and `ends` are M × 3, paired by row; `voxels` is G × 3 voxel centers. The result is
/// G × 9 (`[count_0..count_4, path_1..path_4]`) or G × 3 (`[not_entered, entered_no_exit,
/// entered_with_exit]`) depending on `config.with_path_length`.
///
/// Every input is validated before any work is scheduled.
pub fn intercept_matrices<Real: Float>(
    origins: &DMatrix<Real>,
    ends: &DMatrix<Real>,
    voxels: &DMatrix<Real>,
    edge: Vector3<Real>,
    config: &SchedulerConfig,
    progress: Option<&Progress>,
) -> Result<DMatrix<Real>, Error<Real>> {
    let origins = points_from_matrix(origins, "ray origin columns")?;
    let ends = points_from_matrix(ends, "ray end columns")?;
    let rays = pair_rays(&origins, &ends)?;
    let centers = points_from_matrix(voxels, "voxel center columns")?;
    let grid = VoxelGrid::new(centers, EdgeLength::new(edge)?);
    intercept_voxels(&grid, &rays, config, progress).map(|table| table.to_matrix())
}
