//! Planar convex polygons and the plane-splitting rule used by the BSP tree.

use crate::geometry::Vec3;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Plane {
    pub normal: Vec3,
    pub w: f64,
}

/// Output buckets for [`Plane::split_polygon`].
#[derive(Debug, Default)]
pub(crate) struct SplitBuffers {
    pub coplanar_front: Vec<Polygon>,
    pub coplanar_back: Vec<Polygon>,
    pub front: Vec<Polygon>,
    pub back: Vec<Polygon>,
}

impl Plane {
    /// Plane through a polygon, using Newell's method for the normal.
    pub fn from_vertices(vertices: &[Vec3]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let mut normal = Vec3::ZERO;
        let mut centroid = Vec3::ZERO;
        for (i, vi) in vertices.iter().enumerate() {
            let vj = vertices[(i + 1) % vertices.len()];
            normal.x += (vi.y - vj.y) * (vi.z + vj.z);
            normal.y += (vi.z - vj.z) * (vi.x + vj.x);
            normal.z += (vi.x - vj.x) * (vi.y + vj.y);
            centroid = centroid + *vi;
        }
        let normal = normal.normalized()?;
        let centroid = centroid / vertices.len() as f64;
        Some(Self {
            normal,
            w: normal.dot(&centroid),
        })
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn signed_distance(&self, p: &Vec3) -> f64 {
        self.normal.dot(p) - self.w
    }

    /// Classify `polygon` against this plane and push it (or its pieces)
    /// into the matching bucket. Vertices within `eps` count as on the plane.
    pub fn split_polygon(&self, polygon: Polygon, eps: f64, out: &mut SplitBuffers) {
        let mut polygon_type = COPLANAR;
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| {
                let t = self.signed_distance(v);
                let ty = if t < -eps {
                    BACK
                } else if t > eps {
                    FRONT
                } else {
                    COPLANAR
                };
                polygon_type |= ty;
                ty
            })
            .collect();

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    out.coplanar_front.push(polygon);
                } else {
                    out.coplanar_back.push(polygon);
                }
            }
            FRONT => out.front.push(polygon),
            BACK => out.back.push(polygon),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let t = (self.w - self.normal.dot(&vi)) / self.normal.dot(&(vj - vi));
                        let v = vi.lerp(&vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    out.front.push(Polygon {
                        vertices: f,
                        plane: polygon.plane,
                    });
                }
                if b.len() >= 3 {
                    out.back.push(Polygon {
                        vertices: b,
                        plane: polygon.plane,
                    });
                }
            }
        }
    }
}

/// A convex planar polygon. Vertices wind counter-clockwise around `plane.normal`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polygon {
    pub vertices: Vec<Vec3>,
    pub plane: Plane,
}

impl Polygon {
    /// Returns `None` for fewer than three vertices or zero area.
    pub fn new(vertices: Vec<Vec3>) -> Option<Self> {
        let plane = Plane::from_vertices(&vertices)?;
        Some(Self { vertices, plane })
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    pub fn area(&self) -> f64 {
        let mut sum = Vec3::ZERO;
        let origin = self.vertices[0];
        for w in self.vertices[1..].windows(2) {
            sum = sum + (w[0] - origin).cross(&(w[1] - origin));
        }
        sum.length() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Polygon {
        Polygon::new(vec![
            Vec3::new(0.0, 0.0, z),
            Vec3::new(1.0, 0.0, z),
            Vec3::new(1.0, 1.0, z),
            Vec3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn newell_normal_follows_winding() {
        let sq = square(2.0);
        assert!((sq.plane.normal.z - 1.0).abs() < 1e-12);
        assert!((sq.plane.w - 2.0).abs() < 1e-12);
        assert!((sq.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_have_no_plane() {
        let line = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        assert!(Polygon::new(line).is_none());
    }

    #[test]
    fn spanning_polygon_is_cut_in_two() {
        let plane = Plane {
            normal: Vec3::new(1.0, 0.0, 0.0),
            w: 0.25,
        };
        let mut out = SplitBuffers::default();
        plane.split_polygon(square(0.0), 1e-5, &mut out);
        assert_eq!(out.front.len(), 1);
        assert_eq!(out.back.len(), 1);
        assert!((out.front[0].area() - 0.75).abs() < 1e-12);
        assert!((out.back[0].area() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn coplanar_polygon_sorted_by_facing() {
        let plane = Plane {
            normal: Vec3::new(0.0, 0.0, -1.0),
            w: 0.0,
        };
        let mut out = SplitBuffers::default();
        plane.split_polygon(square(0.0), 1e-5, &mut out);
        assert_eq!(out.coplanar_back.len(), 1);
        assert!(out.coplanar_front.is_empty());
    }
}
