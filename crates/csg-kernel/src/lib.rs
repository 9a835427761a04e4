//! Mesh geometry kernel for the chimney generator.
//!
//! The [`GeometryKernel`] trait is the boundary between layout code and
//! solid modeling. [`CsgKernel`] implements it with BSP-tree CSG over
//! planar polygons; [`RecordingKernel`] is a deterministic test double.

mod bsp;
pub mod csg_kernel;
mod extrude;
pub mod geometry;
pub mod mesh;
pub mod mock_kernel;
mod polygon;
pub mod stl;
pub mod traits;
mod triangulate;
pub mod types;
mod weld;

pub use csg_kernel::CsgKernel;
pub use mesh::TriangleMesh;
pub use mock_kernel::{KernelCall, RecordingKernel};
pub use traits::*;
pub use types::*;

/// Tolerances used by [`CsgKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Vertices closer than this to a splitting plane count as on the plane.
    pub plane: f64,
    /// Vertices closer than this are merged during welding and STL import.
    pub weld: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            plane: 1e-5,
            weld: 1e-5,
        }
    }
}

/// Construction options for [`CsgKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KernelOptions {
    pub tolerance: Tolerance,
    pub stl_format: StlFormat,
}
