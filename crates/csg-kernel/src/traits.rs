use std::path::Path;

use chimney_types::{Line, SketchPlane};

use crate::mesh::TriangleMesh;
use crate::types::{GeometryError, SolidHandle};

/// Solid modeling operations consumed by the chimney layout code.
/// Implemented by CsgKernel (BSP mesh booleans) and RecordingKernel (test double).
pub trait GeometryKernel {
    /// Sweep a closed planar profile along `direction`.
    ///
    /// `profile` is drawn on `plane`; its winding may be either way round,
    /// the resulting surface normals always point out of the solid.
    fn extrude(
        &mut self,
        profile: &Line,
        plane: &SketchPlane,
        direction: [f64; 3],
    ) -> Result<SolidHandle, GeometryError>;

    /// Boolean union. Consumes both operands.
    fn union(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, GeometryError>;

    /// Boolean subtraction: a minus b. Consumes both operands.
    fn difference(&mut self, a: SolidHandle, b: SolidHandle)
        -> Result<SolidHandle, GeometryError>;

    /// Merge coincident vertices and triangulate every face. Required before export.
    fn weld_and_triangulate(&mut self, solid: SolidHandle) -> Result<SolidHandle, GeometryError>;

    /// Serialize a triangulated solid as STL.
    fn export(&mut self, solid: &SolidHandle, path: &Path) -> Result<(), GeometryError>;
}

/// Read-only access to the boundary mesh of a solid.
pub trait KernelIntrospect {
    /// Triangle mesh of the solid. Solids not yet triangulated are
    /// welded and triangulated on the fly without being modified.
    fn triangle_mesh(&self, solid: &SolidHandle) -> Result<TriangleMesh, GeometryError>;
}
