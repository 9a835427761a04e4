use serde::{Deserialize, Serialize};

/// A point in a 2D sketch plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotate by `angle` radians about the origin, then translate by `(dx, dy)`.
    pub fn transformed(&self, angle: f64, dx: f64, dy: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: cos * self.x - sin * self.y + dx,
            y: sin * self.x + cos * self.y + dy,
        }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An ordered 2D polyline. Insertion order is winding order.
///
/// When used as a polygon, closure is implicit: the last point connects
/// back to the first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    points: Vec<Point2>,
}

impl Line {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().copied().map(Point2::from).collect(),
        }
    }

    /// Axis-aligned rectangle, counter-clockwise from `(x0, y0)`.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::from_coords(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2> {
        self.points.last()
    }

    pub fn push(&mut self, point: Point2) {
        self.points.push(point);
    }

    /// Append all points of `other`, keeping their order.
    pub fn extend_from(&mut self, other: &Line) {
        self.points.extend_from_slice(&other.points);
    }

    /// Drop the last `n` points (all of them if `n` exceeds the length).
    pub fn truncate_tail(&mut self, n: usize) {
        let keep = self.points.len().saturating_sub(n);
        self.points.truncate(keep);
    }

    /// Drop the first point, if any.
    pub fn remove_first(&mut self) {
        if !self.points.is_empty() {
            self.points.remove(0);
        }
    }

    /// Rotate every point by `angle` about the origin and translate by `(dx, dy)`.
    pub fn transformed(&self, angle: f64, dx: f64, dy: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| p.transformed(angle, dx, dy))
                .collect(),
        }
    }

    /// Shoelace area of the implicitly closed polygon. Positive when counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            twice += p.x * q.y - q.x * p.y;
        }
        twice * 0.5
    }

    /// Lengths of consecutive segments, not including the closing segment.
    pub fn segment_lengths(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .collect()
    }
}

impl FromIterator<Point2> for Line {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// A plane in world space that 2D profiles are drawn on.
///
/// A profile point `(u, v)` maps to `origin + u * x_axis + v * y_axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchPlane {
    pub origin: [f64; 3],
    pub x_axis: [f64; 3],
    pub y_axis: [f64; 3],
}

impl SketchPlane {
    /// Horizontal plane at height `z`, sketch axes along world X and Y.
    pub fn horizontal(z: f64) -> Self {
        Self {
            origin: [0.0, 0.0, z],
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 1.0, 0.0],
        }
    }

    /// Vertical plane at depth `y`, sketch axes along world X and Z.
    pub fn vertical_xz(y: f64) -> Self {
        Self {
            origin: [0.0, y, 0.0],
            x_axis: [1.0, 0.0, 0.0],
            y_axis: [0.0, 0.0, 1.0],
        }
    }

    pub fn to_world(&self, p: &Point2) -> [f64; 3] {
        [
            self.origin[0] + p.x * self.x_axis[0] + p.y * self.y_axis[0],
            self.origin[1] + p.x * self.x_axis[1] + p.y * self.y_axis[1],
            self.origin[2] + p.x * self.x_axis[2] + p.y * self.y_axis[2],
        ]
    }

    /// Unnormalized plane normal, `x_axis × y_axis`.
    pub fn normal(&self) -> [f64; 3] {
        let (u, v) = (self.x_axis, self.y_axis);
        [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ]
    }
}
