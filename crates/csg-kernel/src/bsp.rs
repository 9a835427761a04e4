//! BSP-tree constructive solid geometry over convex polygons.
//!
//! Follows the classic csg.js scheme: each solid becomes a BSP tree whose
//! nodes hold the polygons coplanar with their splitting plane; booleans are
//! expressed as clip/invert sequences over two trees. All traversals are
//! iterative so deep trees cannot exhaust the stack.

use crate::polygon::{Plane, Polygon, SplitBuffers};

#[derive(Debug, Default)]
pub(crate) struct Node {
    plane: Option<Plane>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
    polygons: Vec<Polygon>,
}

impl Node {
    pub fn new(polygons: Vec<Polygon>, eps: f64) -> Self {
        let mut node = Node::default();
        node.build(polygons, eps);
        node
    }

    /// Insert polygons, creating child nodes as needed.
    pub fn build(&mut self, polygons: Vec<Polygon>, eps: f64) {
        let mut stack: Vec<(&mut Node, Vec<Polygon>)> = vec![(self, polygons)];
        while let Some((node, batch)) = stack.pop() {
            if batch.is_empty() {
                continue;
            }
            let Node {
                plane,
                front,
                back,
                polygons,
            } = node;
            let split = *plane.get_or_insert(batch[0].plane);

            let mut out = SplitBuffers::default();
            for polygon in batch {
                split.split_polygon(polygon, eps, &mut out);
            }
            polygons.append(&mut out.coplanar_front);
            polygons.append(&mut out.coplanar_back);

            if !out.front.is_empty() {
                let child = front.get_or_insert_with(Box::default);
                stack.push((&mut **child, out.front));
            }
            if !out.back.is_empty() {
                let child = back.get_or_insert_with(Box::default);
                stack.push((&mut **child, out.back));
            }
        }
    }

    /// Swap solid and empty space.
    pub fn invert(&mut self) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            let Node {
                plane,
                front,
                back,
                polygons,
            } = node;
            for polygon in polygons.iter_mut() {
                polygon.flip();
            }
            if let Some(plane) = plane {
                plane.flip();
            }
            std::mem::swap(front, back);
            if let Some(child) = front.as_deref_mut() {
                stack.push(child);
            }
            if let Some(child) = back.as_deref_mut() {
                stack.push(child);
            }
        }
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>, eps: f64) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut stack: Vec<(&Node, Vec<Polygon>)> = vec![(self, polygons)];
        while let Some((node, batch)) = stack.pop() {
            if batch.is_empty() {
                continue;
            }
            let Some(plane) = node.plane else {
                kept.extend(batch);
                continue;
            };

            let mut out = SplitBuffers::default();
            for polygon in batch {
                plane.split_polygon(polygon, eps, &mut out);
            }
            let mut front = out.front;
            front.append(&mut out.coplanar_front);
            let mut back = out.back;
            back.append(&mut out.coplanar_back);

            match node.front.as_deref() {
                Some(child) => stack.push((child, front)),
                None => kept.extend(front),
            }
            // Polygons reaching an empty back slot are inside the solid.
            if let Some(child) = node.back.as_deref() {
                stack.push((child, back));
            }
        }
        kept
    }

    /// Clip every polygon of this tree against `other`.
    pub fn clip_to(&mut self, other: &Node, eps: f64) {
        let mut stack: Vec<&mut Node> = vec![self];
        while let Some(node) = stack.pop() {
            let Node {
                front,
                back,
                polygons,
                ..
            } = node;
            let taken = std::mem::take(polygons);
            *polygons = other.clip_polygons(taken, eps);
            if let Some(child) = front.as_deref_mut() {
                stack.push(child);
            }
            if let Some(child) = back.as_deref_mut() {
                stack.push(child);
            }
        }
    }

    pub fn into_polygons(mut self) -> Vec<Polygon> {
        let mut out = std::mem::take(&mut self.polygons);
        let mut stack: Vec<Box<Node>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            out.append(&mut node.polygons);
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
        out
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}

/// Boundary polygons of `a ∪ b`.
pub(crate) fn union(a: Vec<Polygon>, b: Vec<Polygon>, eps: f64) -> Vec<Polygon> {
    let mut a = Node::new(a, eps);
    let mut b = Node::new(b, eps);
    a.clip_to(&b, eps);
    b.clip_to(&a, eps);
    b.invert();
    b.clip_to(&a, eps);
    b.invert();
    a.build(b.into_polygons(), eps);
    a.into_polygons()
}

/// Boundary polygons of `a − b`.
pub(crate) fn difference(a: Vec<Polygon>, b: Vec<Polygon>, eps: f64) -> Vec<Polygon> {
    let mut a = Node::new(a, eps);
    let mut b = Node::new(b, eps);
    a.invert();
    a.clip_to(&b, eps);
    b.clip_to(&a, eps);
    b.invert();
    b.clip_to(&a, eps);
    b.invert();
    a.build(b.into_polygons(), eps);
    a.invert();
    a.into_polygons()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;

    const EPS: f64 = 1e-5;

    /// Six outward-facing quads of an axis-aligned box.
    fn cube(min: [f64; 3], max: [f64; 3]) -> Vec<Polygon> {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        let v = |x, y, z| Vec3::new(x, y, z);
        let faces = vec![
            vec![v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0), v(x1, y0, z0)],
            vec![v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)],
            vec![v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)],
            vec![v(x0, y1, z0), v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0)],
            vec![v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)],
            vec![v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1), v(x1, y0, z1)],
        ];
        faces.into_iter().filter_map(Polygon::new).collect()
    }

    fn total_area(polygons: &[Polygon]) -> f64 {
        polygons.iter().map(Polygon::area).sum()
    }

    #[test]
    fn cube_faces_point_outward() {
        for polygon in cube([0.0; 3], [1.0; 3]) {
            let centroid = polygon
                .vertices
                .iter()
                .fold(Vec3::ZERO, |acc, v| acc + *v)
                / polygon.vertices.len() as f64;
            let outward = centroid - Vec3::new(0.5, 0.5, 0.5);
            assert!(outward.dot(&polygon.plane.normal) > 0.0);
        }
    }

    #[test]
    fn union_of_disjoint_cubes_keeps_everything() {
        let a = cube([0.0; 3], [1.0; 3]);
        let b = cube([3.0; 3], [4.0; 3]);
        let result = union(a, b, EPS);
        assert!((total_area(&result) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn union_of_stacked_cubes_drops_shared_face() {
        let a = cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = cube([0.0, 0.0, 1.0], [1.0, 1.0, 2.0]);
        let result = union(a, b, EPS);
        // A 1x1x2 box has surface area 10.
        assert!((total_area(&result) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn difference_carves_a_notch() {
        let a = cube([0.0; 3], [2.0; 3]);
        let b = cube([1.0, 1.0, 1.0], [3.0, 3.0, 3.0]);
        let result = difference(a, b, EPS);
        // Removing a corner cube keeps the surface area of the original box.
        assert!((total_area(&result) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn difference_with_through_hole_adds_inner_walls() {
        let a = cube([0.0; 3], [3.0; 3]);
        let b = cube([1.0, 1.0, -1.0], [2.0, 2.0, 4.0]);
        let result = difference(a, b, EPS);
        // 54 - 2 (top/bottom openings) + 12 (four 1x3 inner walls)
        assert!((total_area(&result) - 64.0).abs() < 1e-9);
    }

    #[test]
    fn deep_tree_drops_without_recursion() {
        let mut root = Node::default();
        let mut cursor = &mut root;
        for _ in 0..100_000 {
            cursor = &mut **cursor.front.get_or_insert_with(Box::default);
        }
        drop(root);
    }
}
