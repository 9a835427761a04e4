use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Vec3};
use crate::weld::VertexWelder;

/// Indexed triangle mesh. Triangles wind counter-clockwise seen from outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub positions: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Build an indexed mesh from loose triangles, merging corners closer than `weld_tol`.
    /// Triangles that collapse under welding are dropped.
    pub fn from_triangle_soup(soup: &[[[f64; 3]; 3]], weld_tol: f64) -> Self {
        let mut welder = VertexWelder::new(weld_tol);
        let mut triangles = Vec::with_capacity(soup.len());
        for tri in soup {
            let [a, b, c] = tri.map(|p| welder.insert(Vec3::from_array(p)));
            if a != b && b != c && c != a {
                triangles.push([a, b, c]);
            }
        }
        Self {
            positions: welder.into_positions().iter().map(Vec3::to_array).collect(),
            triangles,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn corners(&self, tri: &[u32; 3]) -> [Vec3; 3] {
        tri.map(|i| Vec3::from_array(self.positions[i as usize]))
    }

    /// Corner positions of every triangle.
    pub fn triangle_soup(&self) -> Vec<[[f64; 3]; 3]> {
        self.triangles
            .iter()
            .map(|tri| tri.map(|i| self.positions[i as usize]))
            .collect()
    }

    /// Unit normal of triangle `index`, zero for degenerate triangles.
    pub fn triangle_normal(&self, index: usize) -> [f64; 3] {
        let [a, b, c] = self.corners(&self.triangles[index]);
        (b - a)
            .cross(&(c - a))
            .normalized()
            .unwrap_or(Vec3::ZERO)
            .to_array()
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = self.corners(tri);
                (b - a).cross(&(c - a)).length() * 0.5
            })
            .sum()
    }

    /// Enclosed volume by the divergence theorem. Positive for outward-facing closed meshes.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let [a, b, c] = self.corners(tri);
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for tri in &self.triangles {
            for p in self.corners(tri) {
                bb.expand_to_include(&p);
            }
        }
        bb
    }

    /// `V − E + F` over the vertices actually referenced by triangles.
    pub fn euler_characteristic(&self) -> i64 {
        let mut vertices = HashSet::new();
        let mut edges = HashSet::new();
        for tri in &self.triangles {
            for k in 0..3 {
                let (u, v) = (tri[k], tri[(k + 1) % 3]);
                vertices.insert(u);
                edges.insert((u.min(v), u.max(v)));
            }
        }
        vertices.len() as i64 - edges.len() as i64 + self.triangles.len() as i64
    }

    /// Every directed edge occurs exactly once and its reverse exactly once.
    pub fn is_closed(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                *directed.entry((tri[k], tri[(k + 1) % 3])).or_default() += 1;
            }
        }
        directed
            .iter()
            .all(|(&(u, v), &count)| count == 1 && directed.get(&(v, u)) == Some(&1))
    }

    /// Number of edge-connected pieces.
    pub fn component_count(&self) -> usize {
        let mut parent: Vec<u32> = (0..self.positions.len() as u32).collect();
        fn find(parent: &mut [u32], mut x: u32) -> u32 {
            while parent[x as usize] != x {
                parent[x as usize] = parent[parent[x as usize] as usize];
                x = parent[x as usize];
            }
            x
        }
        let mut used = HashSet::new();
        for tri in &self.triangles {
            used.extend(tri.iter().copied());
            for k in 1..3 {
                let (ra, rb) = (find(&mut parent, tri[0]), find(&mut parent, tri[k]));
                if ra != rb {
                    parent[ra as usize] = rb;
                }
            }
        }
        let roots: HashSet<u32> = used.into_iter().map(|v| find(&mut parent, v)).collect();
        roots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit tetrahedron with outward winding.
    fn tetrahedron() -> TriangleMesh {
        TriangleMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            triangles: vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        }
    }

    #[test]
    fn tetrahedron_is_a_closed_sphere() {
        let mesh = tetrahedron();
        assert!(mesh.is_closed());
        assert_eq!(mesh.euler_characteristic(), 2);
        assert_eq!(mesh.component_count(), 1);
        assert_relative_eq!(mesh.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn open_mesh_is_not_closed() {
        let mut mesh = tetrahedron();
        mesh.triangles.pop();
        assert!(!mesh.is_closed());
        assert_eq!(mesh.euler_characteristic(), 1);
    }

    #[test]
    fn flipped_triangle_breaks_closure() {
        let mut mesh = tetrahedron();
        mesh.triangles[3] = [1, 3, 2];
        assert!(!mesh.is_closed());
    }

    #[test]
    fn soup_is_welded() {
        let soup = tetrahedron().triangle_soup();
        let mesh = TriangleMesh::from_triangle_soup(&soup, 1e-6);
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.is_closed());
    }

    #[test]
    fn separate_pieces_are_counted() {
        let a = tetrahedron();
        let mut soup = a.triangle_soup();
        soup.extend(
            a.triangle_soup()
                .into_iter()
                .map(|tri| tri.map(|[x, y, z]| [x + 5.0, y, z])),
        );
        let mesh = TriangleMesh::from_triangle_soup(&soup, 1e-6);
        assert_eq!(mesh.component_count(), 2);
        assert_eq!(mesh.euler_characteristic(), 4);
        let bb = mesh.bounding_box();
        assert_relative_eq!(bb.max.x, 6.0);
    }
}
