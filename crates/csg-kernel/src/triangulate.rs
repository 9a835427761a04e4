//! Ear-clipping triangulation of simple 2D polygons.

use chimney_types::Point2;

fn cross(o: &Point2, a: &Point2, b: &Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn orientation(points: &[Point2]) -> f64 {
    let n = points.len();
    let mut twice = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        twice += p.x * q.y - q.x * p.y;
    }
    twice.signum()
}

/// True when every turn of the closed polygon bends the same way and none is straight.
pub(crate) fn is_strictly_convex(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let sign = orientation(points);
    if sign == 0.0 {
        return false;
    }
    (0..n).all(|i| {
        let turn = cross(&points[i], &points[(i + 1) % n], &points[(i + 2) % n]);
        turn * sign > 0.0
    })
}

fn point_in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2, sign: f64) -> bool {
    cross(a, b, p) * sign >= 0.0 && cross(b, c, p) * sign >= 0.0 && cross(c, a, p) * sign >= 0.0
}

/// Whether `b` stands more than `tol` off the base `a`–`c` on the `sign` side.
fn stands_clear(a: &Point2, b: &Point2, c: &Point2, sign: f64, tol: f64) -> bool {
    cross(a, b, c) * sign > tol * a.distance_to(c)
}

/// Triangulate a simple polygon by ear clipping.
///
/// Returned triangles index into `points` and keep the input winding.
/// Degenerate input (fewer than three points, zero area) yields no triangles.
/// Corners within `tol` of a straight line are clipped without emitting a
/// triangle, so rounding noise on collinear vertices never produces slivers.
pub(crate) fn ear_clip(points: &[Point2], tol: f64) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let sign = orientation(points);
    if sign == 0.0 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let m = remaining.len();
        let mut ear = None;
        for i in 0..m {
            let (ia, ib, ic) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
            let (a, b, c) = (&points[ia], &points[ib], &points[ic]);
            if !stands_clear(a, b, c, sign, tol) {
                continue;
            }
            let blocked = remaining.iter().any(|&j| {
                j != ia
                    && j != ib
                    && j != ic
                    && points[j] != *a
                    && points[j] != *b
                    && points[j] != *c
                    && point_in_triangle(&points[j], a, b, c, sign)
            });
            if !blocked {
                ear = Some(i);
                break;
            }
        }

        // Numerically awkward input: clip the flattest corner and carry on.
        let i = ear.unwrap_or_else(|| {
            (0..m)
                .min_by(|&x, &y| {
                    let turn = |i: usize| {
                        cross(
                            &points[remaining[(i + m - 1) % m]],
                            &points[remaining[i]],
                            &points[remaining[(i + 1) % m]],
                        )
                        .abs()
                    };
                    turn(x).total_cmp(&turn(y))
                })
                .unwrap_or(0)
        });

        let tri = [remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]];
        if stands_clear(&points[tri[0]], &points[tri[1]], &points[tri[2]], sign, tol) {
            triangles.push(tri);
        }
        remaining.remove(i);
    }

    let tri = [remaining[0], remaining[1], remaining[2]];
    if stands_clear(&points[tri[0]], &points[tri[1]], &points[tri[2]], sign, tol) {
        triangles.push(tri);
    }
    triangles
}
