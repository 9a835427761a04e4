//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics,
//! so one pass over a mesh collects every failure.

use chimney_ops::ChimneyConfig;
use csg_kernel::TriangleMesh;
use serde::Serialize;

/// The result of a single oracle check.
#[derive(Debug, Clone, Serialize)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

// ── Topology Oracles ────────────────────────────────────────────────────────

/// Every edge is used exactly once in each direction.
pub fn check_closed(mesh: &TriangleMesh) -> OracleVerdict {
    if mesh.is_closed() {
        OracleVerdict::pass(
            "closed",
            format!("{} triangles, no boundary edges", mesh.triangle_count()),
        )
    } else {
        OracleVerdict::fail(
            "closed",
            format!(
                "{} triangles leave open or non-manifold edges",
                mesh.triangle_count()
            ),
        )
    }
}

/// `V − E + F` equals `expected`.
pub fn check_euler_characteristic(mesh: &TriangleMesh, expected: i64) -> OracleVerdict {
    let chi = mesh.euler_characteristic();
    if chi == expected {
        OracleVerdict::pass_val(
            "euler_characteristic",
            format!("V - E + F = {}", chi),
            chi as f64,
        )
    } else {
        OracleVerdict::fail_val(
            "euler_characteristic",
            format!("V - E + F = {} (expected {})", chi, expected),
            chi as f64,
        )
    }
}

/// The mesh is one connected shell.
pub fn check_single_component(mesh: &TriangleMesh) -> OracleVerdict {
    let n = mesh.component_count();
    if n == 1 {
        OracleVerdict::pass_val("single_component", "1 component".to_string(), 1.0)
    } else {
        OracleVerdict::fail_val(
            "single_component",
            format!("{} components (expected 1)", n),
            n as f64,
        )
    }
}

// ── Geometry Oracles ────────────────────────────────────────────────────────

/// Outward-facing normals give a positive enclosed volume.
pub fn check_positive_volume(mesh: &TriangleMesh) -> OracleVerdict {
    let v = mesh.signed_volume();
    if v > 0.0 {
        OracleVerdict::pass_val("positive_volume", format!("volume {:.4}", v), v)
    } else {
        OracleVerdict::fail_val(
            "positive_volume",
            format!("volume {:.4}; normals point inward or the mesh is empty", v),
            v,
        )
    }
}

fn triangle_area(a: &[f64; 3], b: &[f64; 3], c: &[f64; 3]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    0.5 * (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt()
}

/// No triangle has zero area.
pub fn check_no_degenerate_triangles(mesh: &TriangleMesh, min_area: f64) -> OracleVerdict {
    let degenerate = mesh
        .triangle_soup()
        .iter()
        .filter(|[a, b, c]| triangle_area(a, b, c) <= min_area)
        .count();
    if degenerate == 0 {
        OracleVerdict::pass(
            "no_degenerate_triangles",
            "all triangles have area".to_string(),
        )
    } else {
        OracleVerdict::fail_val(
            "no_degenerate_triangles",
            format!("{} triangles with area <= {:e}", degenerate, min_area),
            degenerate as f64,
        )
    }
}

/// The mesh stays inside the footprint and reaches the cap top.
///
/// Nothing may stick out past `0..a` or `0..b`, and the highest point is
/// the cap top at `z = h`.
pub fn check_footprint(mesh: &TriangleMesh, config: &ChimneyConfig, tol: f64) -> OracleVerdict {
    let bb = mesh.bounding_box();
    let inside = bb.min.x >= -tol
        && bb.min.y >= -tol
        && bb.max.x <= config.a() + tol
        && bb.max.y <= config.b() + tol;
    let top = (bb.max.z - config.h()).abs() <= tol;
    let detail = format!(
        "x {:.4}..{:.4}, y {:.4}..{:.4}, top {:.4} (footprint {} x {}, cap {})",
        bb.min.x,
        bb.max.x,
        bb.min.y,
        bb.max.y,
        bb.max.z,
        config.a(),
        config.b(),
        config.h(),
    );
    if inside && top {
        OracleVerdict::pass("footprint", detail)
    } else {
        OracleVerdict::fail("footprint", detail)
    }
}

/// Run the oracles that hold for every finished chimney.
pub fn run_all(mesh: &TriangleMesh, config: &ChimneyConfig) -> Vec<OracleVerdict> {
    vec![
        check_closed(mesh),
        check_positive_volume(mesh),
        check_no_degenerate_triangles(mesh, 1e-12),
        check_footprint(mesh, config, 1e-6),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> TriangleMesh {
        TriangleMesh {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            triangles: vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        }
    }

    #[test]
    fn tetrahedron_passes_topology_oracles() {
        let mesh = tetrahedron();
        assert!(check_closed(&mesh).passed);
        assert!(check_euler_characteristic(&mesh, 2).passed);
        assert!(check_single_component(&mesh).passed);
        assert!(check_positive_volume(&mesh).passed);
        assert!(check_no_degenerate_triangles(&mesh, 1e-12).passed);
    }

    #[test]
    fn open_mesh_fails_closed() {
        let mut mesh = tetrahedron();
        mesh.triangles.pop();
        let verdict = check_closed(&mesh);
        assert!(!verdict.passed);
        assert_eq!(verdict.oracle_name, "closed");
    }

    #[test]
    fn inverted_mesh_has_negative_volume() {
        let mut mesh = tetrahedron();
        for t in &mut mesh.triangles {
            t.swap(1, 2);
        }
        let verdict = check_positive_volume(&mesh);
        assert!(!verdict.passed);
        assert!(verdict.value.is_some_and(|v| v < 0.0));
    }

    #[test]
    fn wrong_euler_characteristic_reports_value() {
        let verdict = check_euler_characteristic(&tetrahedron(), 0);
        assert!(!verdict.passed);
        assert_eq!(verdict.value, Some(2.0));
    }
}
