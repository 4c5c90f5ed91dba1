//! Geometry shared by the voxel grid and the interception engine.

mod bounding_box;
pub use bounding_box::*;
mod intersect;
pub use intersect::*;
mod segment;
pub use segment::*;
mod traits;
pub use traits::*;
