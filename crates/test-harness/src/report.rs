//! Structured reports on a generated chimney.
//!
//! `to_text` is for reading in a terminal; `to_json` is for diffing runs.

use std::fmt;

use chimney_ops::{plan_courses, plan_openings, ChimneyConfig};
use csg_kernel::TriangleMesh;
use serde::Serialize;

use crate::helpers::{GeneratedChimney, HarnessError};
use crate::oracle::{self, OracleVerdict};

/// One course of the layout.
#[derive(Debug, Clone, Serialize)]
pub struct CourseEntry {
    pub number: u32,
    pub z: f64,
    pub perimeter_points: usize,
    pub bricks_a: usize,
    pub bricks_b: usize,
}

/// Mesh statistics of the finished solid.
#[derive(Debug, Clone, Serialize)]
pub struct MeshSummary {
    pub triangle_count: usize,
    pub vertex_count: usize,
    pub surface_area: f64,
    pub volume: f64,
    pub euler_characteristic: i64,
    pub components: usize,
    pub bounding_box: ([f64; 3], [f64; 3]),
}

impl MeshSummary {
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let bb = mesh.bounding_box();
        Self {
            triangle_count: mesh.triangle_count(),
            vertex_count: mesh.vertex_count(),
            surface_area: mesh.surface_area(),
            volume: mesh.signed_volume(),
            euler_characteristic: mesh.euler_characteristic(),
            components: mesh.component_count(),
            bounding_box: (bb.min.to_array(), bb.max.to_array()),
        }
    }
}

/// A complete chimney report with all sections.
#[derive(Debug, Clone, Serialize)]
pub struct ChimneyReport {
    pub name: String,
    pub footprint: (f64, f64),
    pub courses: Vec<CourseEntry>,
    pub flue_openings: usize,
    pub mesh: Option<MeshSummary>,
    pub oracle_results: Vec<OracleVerdict>,
}

impl ChimneyReport {
    /// Layout-only report, without geometry.
    pub fn from_config(name: &str, config: &ChimneyConfig) -> Self {
        let courses = plan_courses(config)
            .into_iter()
            .map(|plan| {
                let pair = config.course(plan.number as usize - 1);
                CourseEntry {
                    number: plan.number,
                    z: plan.z,
                    perimeter_points: plan.perimeter.len(),
                    bricks_a: pair.a.len(),
                    bricks_b: pair.b.len(),
                }
            })
            .collect();
        Self {
            name: name.to_string(),
            footprint: (config.a(), config.b()),
            courses,
            flue_openings: plan_openings(config).cells().len(),
            mesh: None,
            oracle_results: Vec::new(),
        }
    }

    /// Full report: layout, mesh statistics and every oracle.
    pub fn from_generated(name: &str, generated: &GeneratedChimney) -> Self {
        let config = generated.chimney.config();
        let mut report = Self::from_config(name, config);
        report.mesh = Some(MeshSummary::from_mesh(&generated.mesh));
        report.oracle_results = oracle::run_all(&generated.mesh, config);
        report
    }

    pub fn passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Chimney Report: {} ===\n\n", self.name));
        out.push_str(&format!(
            "Footprint: {} x {}, {} courses, {} flue openings\n",
            self.footprint.0,
            self.footprint.1,
            self.courses.len(),
            self.flue_openings,
        ));

        out.push_str("\nCourses:\n");
        for course in &self.courses {
            out.push_str(&format!(
                "  [{}] z={:.4} bricks a={} b={} ({} outline points)\n",
                course.number,
                course.z,
                course.bricks_a,
                course.bricks_b,
                course.perimeter_points,
            ));
        }

        if let Some(mesh) = &self.mesh {
            let (min, max) = mesh.bounding_box;
            out.push_str(&format!(
                "\nMesh: {} triangles, {} vertices, {} component(s), Euler V-E+F={}\n",
                mesh.triangle_count,
                mesh.vertex_count,
                mesh.components,
                mesh.euler_characteristic,
            ));
            out.push_str(&format!(
                "  volume {:.4}, surface area {:.4}\n",
                mesh.volume, mesh.surface_area,
            ));
            out.push_str(&format!(
                "  bounding box ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3})\n",
                min[0], min[1], min[2], max[0], max[1], max[2],
            ));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        out
    }
}

impl fmt::Display for ChimneyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
