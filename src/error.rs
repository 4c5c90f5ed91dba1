use nalgebra::Vector3;

use crate::spatial::Float;

/// Errors reported by the validation pass in front of voxelization and interception.
///
/// Nothing is computed when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum Error<Real: Float> {
    #[error("{what}: expected {expected}, found {found}")]
    InvalidDimension {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("edge lengths must be finite and positive; found {0:?}")]
    InvalidEdgeLength(Vector3<Real>),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("cancelled after {completed} of {total} voxels")]
    Cancelled { completed: usize, total: usize },
}
