//! Linear sweep of a planar profile into a closed polygon soup.

use chimney_types::{Line, Point2, SketchPlane};

use crate::geometry::Vec3;
use crate::polygon::Polygon;
use crate::triangulate::{ear_clip, is_strictly_convex};
use crate::types::GeometryError;

fn degenerate_profile(reason: impl Into<String>) -> GeometryError {
    GeometryError::DegenerateProfile {
        reason: reason.into(),
    }
}

fn degenerate_extrusion(reason: impl Into<String>) -> GeometryError {
    GeometryError::DegenerateExtrusion {
        reason: reason.into(),
    }
}

/// Profile points with repeated neighbours (including a repeated closing point) removed.
fn distinct_points(profile: &Line, tol: f64) -> Vec<Point2> {
    let mut points: Vec<Point2> = Vec::with_capacity(profile.len());
    for p in profile.points() {
        if points.last().map_or(true, |q| q.distance_to(p) > tol) {
            points.push(*p);
        }
    }
    while points.len() > 1 {
        let (first, last) = (points[0], points[points.len() - 1]);
        if first.distance_to(&last) > tol {
            break;
        }
        points.pop();
    }
    points
}

/// Boundary polygons of `profile` swept along `direction`, normals pointing outward.
pub(crate) fn extrude_profile(
    profile: &Line,
    plane: &SketchPlane,
    direction: [f64; 3],
    tol: f64,
) -> Result<Vec<Polygon>, GeometryError> {
    if profile
        .points()
        .iter()
        .any(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(degenerate_profile("profile has non-finite coordinates"));
    }
    let mut points = distinct_points(profile, tol);
    if points.len() < 3 {
        return Err(degenerate_profile(format!(
            "profile has {} distinct points, at least 3 required",
            points.len()
        )));
    }
    let area = Line::new(points.clone()).signed_area();
    if area.abs() <= tol * tol {
        return Err(degenerate_profile("profile encloses zero area"));
    }

    let normal = Vec3::from_array(plane.normal())
        .normalized()
        .ok_or_else(|| degenerate_profile("sketch plane axes are parallel"))?;
    let d = Vec3::from_array(direction);
    if !d.is_finite() || d.length() <= tol {
        return Err(degenerate_extrusion("direction has zero length"));
    }
    let along = d.dot(&normal);
    if along.abs() <= tol {
        return Err(degenerate_extrusion("direction lies in the sketch plane"));
    }

    // Wind the profile so the far cap faces along the sweep direction.
    if area.signum() * along.signum() < 0.0 {
        points.reverse();
    }

    let bottom: Vec<Vec3> = points
        .iter()
        .map(|p| Vec3::from_array(plane.to_world(p)))
        .collect();
    let top: Vec<Vec3> = bottom.iter().map(|v| *v + d).collect();
    let n = points.len();

    let cap_faces: Vec<Vec<usize>> = if is_strictly_convex(&points) {
        vec![(0..n).collect()]
    } else {
        ear_clip(&points, tol).into_iter().map(|t| t.to_vec()).collect()
    };

    let mut polygons = Vec::with_capacity(2 * cap_faces.len() + n);
    for face in &cap_faces {
        polygons.extend(Polygon::new(face.iter().map(|&i| top[i]).collect()));
        polygons.extend(Polygon::new(face.iter().rev().map(|&i| bottom[i]).collect()));
    }
    for i in 0..n {
        let j = (i + 1) % n;
        polygons.extend(Polygon::new(vec![bottom[i], bottom[j], top[j], top[i]]));
    }

    if polygons.len() < n + 2 {
        return Err(degenerate_profile("profile collapses to a line"));
    }
    Ok(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-5;

    fn signed_volume(polygons: &[Polygon]) -> f64 {
        let mut volume = 0.0;
        for polygon in polygons {
            let v0 = polygon.vertices[0];
            for w in polygon.vertices[1..].windows(2) {
                volume += v0.dot(&w[0].cross(&w[1])) / 6.0;
            }
        }
        volume
    }

    #[test]
    fn box_has_positive_volume_either_winding() {
        let plane = SketchPlane::horizontal(0.0);
        let ccw = Line::rectangle(0.0, 0.0, 2.0, 3.0);
        let cw: Line = ccw.points().iter().rev().copied().collect();
        for profile in [ccw, cw] {
            for dz in [1.5, -1.5] {
                let polygons = extrude_profile(&profile, &plane, [0.0, 0.0, dz], TOL).unwrap();
                assert_eq!(polygons.len(), 6);
                assert!((signed_volume(&polygons) - 9.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn concave_profile_caps_are_ear_clipped() {
        let l = Line::from_coords(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ]);
        let polygons =
            extrude_profile(&l, &SketchPlane::vertical_xz(0.0), [0.0, 2.0, 0.0], TOL).unwrap();
        // 4 triangles per cap, 6 side quads.
        assert_eq!(polygons.len(), 14);
        assert!((signed_volume(&polygons) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_closing_point_is_ignored() {
        let closed = Line::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let polygons =
            extrude_profile(&closed, &SketchPlane::horizontal(0.0), [0.0, 0.0, 1.0], TOL).unwrap();
        assert_eq!(polygons.len(), 5);
    }

    #[test]
    fn rejects_degenerate_input() {
        let plane = SketchPlane::horizontal(0.0);
        let two = Line::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(
            extrude_profile(&two, &plane, [0.0, 0.0, 1.0], TOL),
            Err(GeometryError::DegenerateProfile { .. })
        ));
        let flat = Line::from_coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert!(matches!(
            extrude_profile(&flat, &plane, [0.0, 0.0, 1.0], TOL),
            Err(GeometryError::DegenerateProfile { .. })
        ));
        let square = Line::rectangle(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            extrude_profile(&square, &plane, [0.0, 0.0, 0.0], TOL),
            Err(GeometryError::DegenerateExtrusion { .. })
        ));
        assert!(matches!(
            extrude_profile(&square, &plane, [1.0, 0.0, 0.0], TOL),
            Err(GeometryError::DegenerateExtrusion { .. })
        ));
    }
}
