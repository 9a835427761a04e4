//! Vertex welding, T-junction repair and triangulation of BSP output.

use std::collections::{HashMap, HashSet};

use crate::geometry::{BoundingBox, Vec3};
use crate::mesh::TriangleMesh;
use crate::polygon::Polygon;

type CellKey = (i64, i64, i64);

fn cell_of(p: &Vec3, size: f64) -> CellKey {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

fn neighbours(cell: CellKey) -> impl Iterator<Item = CellKey> {
    let (cx, cy, cz) = cell;
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (cx + dx, cy + dy, cz + dz)))
    })
}

/// Spatial-hash vertex merger: positions within `tol` of an existing vertex reuse its index.
pub(crate) struct VertexWelder {
    tol: f64,
    cells: HashMap<CellKey, Vec<u32>>,
    positions: Vec<Vec3>,
}

impl VertexWelder {
    pub fn new(tol: f64) -> Self {
        Self {
            tol: tol.max(f64::EPSILON),
            cells: HashMap::new(),
            positions: Vec::new(),
        }
    }

    pub fn insert(&mut self, p: Vec3) -> u32 {
        let cell = cell_of(&p, self.tol);
        for key in neighbours(cell) {
            if let Some(bucket) = self.cells.get(&key) {
                for &idx in bucket {
                    if self.positions[idx as usize].distance_to(&p) <= self.tol {
                        return idx;
                    }
                }
            }
        }
        let idx = self.positions.len() as u32;
        self.positions.push(p);
        self.cells.entry(cell).or_default().push(idx);
        idx
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Vec3> {
        self.positions
    }
}

/// Drop consecutive repeats (cyclically). Faces left with fewer than three
/// vertices return `None`.
fn dedup_face(mut face: Vec<u32>) -> Option<Vec<u32>> {
    face.dedup();
    while face.len() > 1 && face.first() == face.last() {
        face.pop();
    }
    (face.len() >= 3).then_some(face)
}

/// Uniform grid over welded vertices for edge proximity queries.
struct VertexGrid {
    size: f64,
    cells: HashMap<CellKey, Vec<u32>>,
}

impl VertexGrid {
    fn new(positions: &[Vec3], tol: f64) -> Self {
        let mut bounds = BoundingBox::empty();
        for p in positions {
            bounds.expand_to_include(p);
        }
        let size = (bounds.diagonal() / 64.0).max(4.0 * tol).max(f64::EPSILON);
        let mut cells: HashMap<CellKey, Vec<u32>> = HashMap::new();
        for (i, p) in positions.iter().enumerate() {
            cells.entry(cell_of(p, size)).or_default().push(i as u32);
        }
        Self { size, cells }
    }

    /// Vertices strictly inside segment `u`–`v` (within `tol`), ordered from `u`.
    fn vertices_on_edge(&self, positions: &[Vec3], u: u32, v: u32, tol: f64) -> Vec<u32> {
        let (pu, pv) = (positions[u as usize], positions[v as usize]);
        let axis = pv - pu;
        let len = axis.length();
        if len <= 2.0 * tol {
            return Vec::new();
        }
        let dir = axis / len;

        let samples = (len / (0.5 * self.size)).ceil() as usize + 1;
        let mut visited: HashSet<CellKey> = HashSet::new();
        let mut hits: Vec<(f64, u32)> = Vec::new();
        for k in 0..=samples {
            let p = pu.lerp(&pv, k as f64 / samples as f64);
            for key in neighbours(cell_of(&p, self.size)) {
                if !visited.insert(key) {
                    continue;
                }
                let Some(bucket) = self.cells.get(&key) else {
                    continue;
                };
                for &w in bucket {
                    if w == u || w == v {
                        continue;
                    }
                    let pw = positions[w as usize];
                    let t = (pw - pu).dot(&dir);
                    if t <= tol || t >= len - tol {
                        continue;
                    }
                    let foot = pu + dir * t;
                    if foot.distance_to(&pw) <= tol {
                        hits.push((t, w));
                    }
                }
            }
        }
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.dedup_by_key(|h| h.1);
        hits.into_iter().map(|(_, w)| w).collect()
    }
}

/// Insert every welded vertex that lies on a face edge into that edge.
fn split_t_junctions(faces: Vec<Vec<u32>>, positions: &[Vec3], tol: f64) -> Vec<Vec<u32>> {
    let grid = VertexGrid::new(positions, tol);
    let mut edge_cache: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
    faces
        .into_iter()
        .map(|face| {
            let n = face.len();
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                let (u, v) = (face[i], face[(i + 1) % n]);
                out.push(u);
                let key = (u.min(v), u.max(v));
                let inner = edge_cache
                    .entry(key)
                    .or_insert_with(|| grid.vertices_on_edge(positions, key.0, key.1, tol));
                if u < v {
                    out.extend(inner.iter().copied());
                } else {
                    out.extend(inner.iter().rev().copied());
                }
            }
            out
        })
        .collect()
}

fn face_normal(face: &[u32], positions: &[Vec3]) -> Option<Vec3> {
    let mut normal = Vec3::ZERO;
    for (i, &a) in face.iter().enumerate() {
        let vi = positions[a as usize];
        let vj = positions[face[(i + 1) % face.len()] as usize];
        normal.x += (vi.y - vj.y) * (vi.z + vj.z);
        normal.y += (vi.z - vj.z) * (vi.x + vj.x);
        normal.z += (vi.x - vj.x) * (vi.y + vj.y);
    }
    normal.normalized()
}

fn is_strictly_convex(face: &[u32], positions: &[Vec3]) -> bool {
    let Some(normal) = face_normal(face, positions) else {
        return false;
    };
    let n = face.len();
    (0..n).all(|i| {
        let a = positions[face[(i + n - 1) % n] as usize];
        let b = positions[face[i] as usize];
        let c = positions[face[(i + 1) % n] as usize];
        let (ab, bc) = (b - a, c - b);
        let scale = ab.length() * bc.length();
        scale > 0.0 && ab.cross(&bc).dot(&normal) > 1e-6 * scale
    })
}

/// Weld, repair and triangulate a polygon soup into an indexed mesh.
pub(crate) fn weld_and_triangulate(polygons: &[Polygon], tol: f64) -> TriangleMesh {
    let mut welder = VertexWelder::new(tol);
    let faces: Vec<Vec<u32>> = polygons
        .iter()
        .filter_map(|polygon| {
            let face = polygon.vertices.iter().map(|v| welder.insert(*v)).collect();
            dedup_face(face)
        })
        .collect();
    let mut positions = welder.into_positions();
    let faces = split_t_junctions(faces, &positions, tol);

    let mut triangles = Vec::new();
    for face in faces {
        let Some(face) = dedup_face(face) else {
            continue;
        };
        let n = face.len();
        if n == 3 {
            triangles.push([face[0], face[1], face[2]]);
        } else if is_strictly_convex(&face, &positions) {
            for i in 1..n - 1 {
                triangles.push([face[0], face[i], face[i + 1]]);
            }
        } else {
            // Collinear runs: fan from an added centroid so no triangle is degenerate.
            let centroid = face
                .iter()
                .fold(Vec3::ZERO, |acc, &i| acc + positions[i as usize])
                / n as f64;
            let c = positions.len() as u32;
            positions.push(centroid);
            for i in 0..n {
                triangles.push([c, face[i], face[(i + 1) % n]]);
            }
        }
    }

    TriangleMesh {
        positions: positions.iter().map(Vec3::to_array).collect(),
        triangles,
    }
}
