//! CsgKernel: mesh geometry kernel backed by BSP-tree booleans.

use std::path::Path;

use chimney_types::{Line, SketchPlane};
use slotmap::SlotMap;
use tracing::{debug, info, instrument};

use crate::bsp;
use crate::extrude::extrude_profile;
use crate::geometry::{BoundingBox, Vec3};
use crate::mesh::TriangleMesh;
use crate::polygon::Polygon;
use crate::stl;
use crate::traits::{GeometryKernel, KernelIntrospect};
use crate::types::*;
use crate::weld;
use crate::KernelOptions;

/// Stored representation of a solid.
#[derive(Debug)]
enum Body {
    /// Convex boundary polygons straight out of extrusion or booleans.
    Polygons(Vec<Polygon>),
    /// Welded, watertight triangle mesh ready for export.
    Mesh(TriangleMesh),
}

impl Body {
    fn into_polygons(self) -> Vec<Polygon> {
        match self {
            Body::Polygons(polygons) => polygons,
            Body::Mesh(mesh) => mesh
                .triangle_soup()
                .into_iter()
                .filter_map(|tri| Polygon::new(tri.map(Vec3::from_array).to_vec()))
                .collect(),
        }
    }
}

fn bounds_of(polygons: &[Polygon]) -> BoundingBox {
    let mut bb = BoundingBox::empty();
    for polygon in polygons {
        for v in &polygon.vertices {
            bb.expand_to_include(v);
        }
    }
    bb
}

/// Boxes more than `eps` apart along some axis cannot interact.
fn separated(a: &BoundingBox, b: &BoundingBox, eps: f64) -> bool {
    a.is_empty()
        || b.is_empty()
        || a.max.x < b.min.x - eps
        || b.max.x < a.min.x - eps
        || a.max.y < b.min.y - eps
        || b.max.y < a.min.y - eps
        || a.max.z < b.min.z - eps
        || b.max.z < a.min.z - eps
}

/// Geometry kernel storing solids in a slot-map arena.
pub struct CsgKernel {
    solids: SlotMap<SolidKey, Body>,
    options: KernelOptions,
}

impl CsgKernel {
    pub fn new() -> Self {
        Self::with_options(KernelOptions::default())
    }

    pub fn with_options(options: KernelOptions) -> Self {
        Self {
            solids: SlotMap::with_key(),
            options,
        }
    }

    pub fn options(&self) -> &KernelOptions {
        &self.options
    }

    /// Number of live solids.
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    fn store(&mut self, body: Body) -> SolidHandle {
        SolidHandle::new(self.solids.insert(body))
    }

    /// Remove both operands, or neither if either is unknown.
    fn take_pair(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<(Body, Body), GeometryError> {
        if a.key() == b.key()
            || !self.solids.contains_key(a.key())
            || !self.solids.contains_key(b.key())
        {
            return Err(GeometryError::UnknownSolid);
        }
        let body_a = self
            .solids
            .remove(a.key())
            .ok_or(GeometryError::UnknownSolid)?;
        let body_b = self
            .solids
            .remove(b.key())
            .ok_or(GeometryError::UnknownSolid)?;
        Ok((body_a, body_b))
    }
}

impl Default for CsgKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for CsgKernel {
    #[instrument(skip(self, profile), fields(points = profile.len()))]
    fn extrude(
        &mut self,
        profile: &Line,
        plane: &SketchPlane,
        direction: [f64; 3],
    ) -> Result<SolidHandle, GeometryError> {
        let polygons = extrude_profile(profile, plane, direction, self.options.tolerance.weld)?;
        debug!(polygons = polygons.len(), "extruded profile");
        Ok(self.store(Body::Polygons(polygons)))
    }

    #[instrument(skip(self))]
    fn union(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, GeometryError> {
        let (a, b) = self.take_pair(&a, &b)?;
        let (mut a, b) = (a.into_polygons(), b.into_polygons());
        let eps = self.options.tolerance.plane;

        let result = if separated(&bounds_of(&a), &bounds_of(&b), eps) {
            debug!("operands are disjoint, concatenating");
            a.extend(b);
            a
        } else {
            bsp::union(a, b, eps)
        };
        if result.is_empty() {
            return Err(GeometryError::EmptyResult {
                operation: "union".to_string(),
            });
        }
        debug!(polygons = result.len(), "union complete");
        Ok(self.store(Body::Polygons(result)))
    }

    #[instrument(skip(self))]
    fn difference(
        &mut self,
        a: SolidHandle,
        b: SolidHandle,
    ) -> Result<SolidHandle, GeometryError> {
        let (a, b) = self.take_pair(&a, &b)?;
        let (a, b) = (a.into_polygons(), b.into_polygons());
        let eps = self.options.tolerance.plane;

        let result = if separated(&bounds_of(&a), &bounds_of(&b), eps) {
            debug!("operands are disjoint, keeping minuend");
            a
        } else {
            bsp::difference(a, b, eps)
        };
        if result.is_empty() {
            return Err(GeometryError::EmptyResult {
                operation: "difference".to_string(),
            });
        }
        debug!(polygons = result.len(), "difference complete");
        Ok(self.store(Body::Polygons(result)))
    }

    #[instrument(skip(self))]
    fn weld_and_triangulate(&mut self, solid: SolidHandle) -> Result<SolidHandle, GeometryError> {
        let body = self
            .solids
            .remove(solid.key())
            .ok_or(GeometryError::UnknownSolid)?;
        let mesh = match body {
            Body::Mesh(mesh) => mesh,
            Body::Polygons(polygons) => {
                weld::weld_and_triangulate(&polygons, self.options.tolerance.weld)
            }
        };
        if mesh.is_empty() {
            return Err(GeometryError::EmptyResult {
                operation: "weld_and_triangulate".to_string(),
            });
        }
        info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "welded and triangulated"
        );
        Ok(self.store(Body::Mesh(mesh)))
    }

    #[instrument(skip(self, solid), fields(path = %path.display()))]
    fn export(&mut self, solid: &SolidHandle, path: &Path) -> Result<(), GeometryError> {
        let mesh = match self.solids.get(solid.key()) {
            Some(Body::Mesh(mesh)) => mesh,
            Some(Body::Polygons(_)) => return Err(GeometryError::NotTriangulated),
            None => return Err(GeometryError::UnknownSolid),
        };
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "solid".to_string());
        let bytes = match self.options.stl_format {
            StlFormat::Binary => stl::write_binary(mesh, &name)?,
            StlFormat::Ascii => stl::write_ascii(mesh, &name)?.into_bytes(),
        };
        std::fs::write(path, bytes).map_err(|e| GeometryError::Io {
            reason: format!("{}: {}", path.display(), e),
        })?;
        info!(
            triangles = mesh.triangle_count(),
            format = ?self.options.stl_format,
            "exported STL"
        );
        Ok(())
    }
}

impl KernelIntrospect for CsgKernel {
    fn triangle_mesh(&self, solid: &SolidHandle) -> Result<TriangleMesh, GeometryError> {
        match self.solids.get(solid.key()) {
            Some(Body::Mesh(mesh)) => Ok(mesh.clone()),
            Some(Body::Polygons(polygons)) => Ok(weld::weld_and_triangulate(
                polygons,
                self.options.tolerance.weld,
            )),
            None => Err(GeometryError::UnknownSolid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit-height box over `[x0, x1] × [y0, y1]`.
    fn block(kernel: &mut CsgKernel, x0: f64, y0: f64, x1: f64, y1: f64) -> SolidHandle {
        kernel
            .extrude(
                &Line::rectangle(x0, y0, x1, y1),
                &SketchPlane::horizontal(0.0),
                [0.0, 0.0, 1.0],
            )
            .unwrap()
    }

    #[test]
    fn booleans_consume_operands() {
        let mut kernel = CsgKernel::new();
        let a = block(&mut kernel, 0.0, 0.0, 1.0, 1.0);
        let b = block(&mut kernel, 0.5, 0.5, 1.5, 1.5);
        assert_eq!(kernel.solid_count(), 2);
        let _u = kernel.union(a, b).unwrap();
        assert_eq!(kernel.solid_count(), 1);
    }

    #[test]
    fn stale_handle_is_unknown() {
        let mut kernel = CsgKernel::new();
        let a = block(&mut kernel, 0.0, 0.0, 1.0, 1.0);
        let stale = SolidHandle::new(a.key());
        let _welded = kernel.weld_and_triangulate(a).unwrap();
        let other = block(&mut kernel, 3.0, 0.0, 4.0, 1.0);
        assert_eq!(
            kernel.union(stale, other).unwrap_err(),
            GeometryError::UnknownSolid
        );
        // The valid operand survives a rejected call.
        assert_eq!(kernel.solid_count(), 2);
    }

    #[test]
    fn disjoint_union_takes_fast_path() {
        let mut kernel = CsgKernel::new();
        let a = block(&mut kernel, 0.0, 0.0, 1.0, 1.0);
        let b = block(&mut kernel, 5.0, 0.0, 6.0, 1.0);
        let u = kernel.union(a, b).unwrap();
        let mesh = kernel.triangle_mesh(&u).unwrap();
        assert_eq!(mesh.component_count(), 2);
        assert_relative_eq!(mesh.signed_volume(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn difference_to_nothing_is_an_error() {
        let mut kernel = CsgKernel::new();
        let a = block(&mut kernel, 0.0, 0.0, 1.0, 1.0);
        let b = kernel
            .extrude(
                &Line::rectangle(-1.0, -1.0, 2.0, 2.0),
                &SketchPlane::horizontal(-1.0),
                [0.0, 0.0, 3.0],
            )
            .unwrap();
        assert!(matches!(
            kernel.difference(a, b),
            Err(GeometryError::EmptyResult { .. })
        ));
    }

    #[test]
    fn export_requires_triangulation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box.stl");
        let mut kernel = CsgKernel::new();
        let a = block(&mut kernel, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            kernel.export(&a, &path).unwrap_err(),
            GeometryError::NotTriangulated
        );
        let a = kernel.weld_and_triangulate(a).unwrap();
        kernel.export(&a, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 84 + 12 * 50);
    }

    #[test]
    fn ascii_export_option() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("box.stl");
        let mut kernel = CsgKernel::with_options(KernelOptions {
            stl_format: StlFormat::Ascii,
            ..KernelOptions::default()
        });
        let a = block(&mut kernel, 0.0, 0.0, 1.0, 1.0);
        let a = kernel.weld_and_triangulate(a).unwrap();
        kernel.export(&a, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("solid box"));
    }
}
