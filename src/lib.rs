//! Ray/voxel interception statistics for terrestrial laser scans.
//!
//! Each scanner ray runs from the scanner position to a measured return. For every voxel of a
//! regular grid, the engine counts how the rays relate to it (missed, contained, exiting, entering,
//! or crossing) and how much ray length falls inside it. Those tallies feed gap-fraction and
//! light-transmission estimates.
//!
//! ```
//! use nalgebra::{point, vector};
//! use voxray::{intercept_voxels, EdgeLength, SchedulerConfig, Segment, VoxelGrid};
//!
//! let edge = EdgeLength::new(vector![1.0, 1.0, 1.0])?;
//! let grid = VoxelGrid::new(vec![point![0.5, 0.5, 0.5]], edge);
//! let rays = [Segment::new(point![-1.0, 0.5, 0.5], point![2.0, 0.5, 0.5])];
//! let table = intercept_voxels(&grid, &rays, &SchedulerConfig::default(), None)?;
//! assert_eq!(table.rows()[0].counts, [0, 0, 0, 0, 1]);
//! # Ok::<(), voxray::Error<f64>>(())
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod error;
pub mod interception;
pub mod matrix;
pub mod schedule;
pub mod spatial;
pub mod voxel;

pub use error::Error;
pub use interception::{aggregate, InterceptionStats, OcclusionStats};
pub use schedule::{intercept_voxels, InterceptionTable, Progress, SchedulerConfig};
pub use spatial::{classify, intersect, Aabb, Float, Interception, InterceptionCode, Segment};
pub use voxel::{voxelize, EdgeLength, VoxelGrid};
