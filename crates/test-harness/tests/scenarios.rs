//! End-to-end chimney scenarios against both kernels.

use chimney_ops::{assemble, plan_openings, Chimney, ChimneyConfig, Stage};
use csg_kernel::{
    CsgKernel, GeometryKernel, KernelIntrospect, KernelOptions, RecordingKernel, StlFormat,
};
use test_harness::assertions::{
    assert_boolean_counts, assert_bounding_box, assert_closed_shell, assert_volume,
};
use test_harness::fixtures::{sample_configurations, scenario_a, scenario_b, short_stack};
use test_harness::helpers::generate_with;
use test_harness::{generate, oracle};

// ── Scenario A: two courses and a cap ───────────────────────────────────

#[test]
fn scenario_a_is_a_single_closed_shell() {
    let config = ChimneyConfig::new(scenario_a()).unwrap();
    let mut kernel = CsgKernel::new();
    let solid = assemble(&mut kernel, &config).unwrap();
    let solid = kernel.weld_and_triangulate(solid).unwrap();
    let mesh = kernel.triangle_mesh(&solid).unwrap();

    assert_closed_shell(&mesh, 2, "scenario A").unwrap();
    let (a, b) = (config.a(), config.b());
    assert_bounding_box(&mesh, [0.0, 0.0, -1.25], [a, b, 0.75], 1e-9, "scenario A").unwrap();

    let e = config.e();
    let bricks = 2.0 * a * b - 26.0 * e * e;
    let gaps = 2.0 * (a - 2.0 * e) * (b - 2.0 * e);
    let expected = bricks * config.brick_height() + gaps * e + a * b * config.h();
    assert_volume(&mesh, expected, 1e-6, "scenario A").unwrap();
}

// ── Scenario B: eighteen courses, two flues ─────────────────────────────

#[test]
fn scenario_b_call_plan() {
    let chimney = Chimney::new(scenario_b()).unwrap();
    let mut kernel = RecordingKernel::new();
    chimney.generate(&mut kernel).unwrap();

    // 18 course unions, 17 stacking unions, the cap and the flashing.
    // Two flues and the roof cut.
    assert_boolean_counts(&kernel, 18 + 17 + 1 + 1, 2 + 1, "scenario B").unwrap();
    assert_eq!(plan_openings(chimney.config()).cells().len(), 2);
    assert_eq!(kernel.live_solids(), 1);
}

#[test]
fn every_sample_runs_on_the_recording_kernel() {
    for (i, params) in sample_configurations().into_iter().enumerate() {
        let chimney = Chimney::new(params).unwrap();
        let mut kernel = RecordingKernel::new();
        chimney
            .generate(&mut kernel)
            .unwrap_or_else(|e| panic!("sample {}: {}", i, e));
        let grid = plan_openings(chimney.config());
        let flues = (grid.xs.len() - 1) * (grid.ys.len() - 1);
        assert_eq!(kernel.difference_count(), flues + 1, "sample {}", i);
    }
}

// ── Full pipeline on the CSG kernel ─────────────────────────────────────

#[test]
fn short_stack_passes_geometry_oracles() {
    let generated = generate(short_stack()).unwrap();
    let config = generated.chimney.config();
    assert_closed_shell(&generated.mesh, 2, "short stack").unwrap();
    assert!(oracle::check_positive_volume(&generated.mesh).passed);
    assert!(oracle::check_footprint(&generated.mesh, config, 1e-6).passed);
    assert!(oracle::check_no_degenerate_triangles(&generated.mesh, 1e-12).passed);
}

#[test]
fn every_sample_is_one_closed_shell_on_the_csg_kernel() {
    // Sample 1 has its ridge on the x = a wall, where the roof line runs
    // through the mortar joint under course 8. Each of that course's five
    // bricks leaves a tunnel between stack and flashing.
    let expected_euler = [2, -8, 2];
    for (i, params) in sample_configurations().into_iter().enumerate() {
        let generated = generate(params).unwrap_or_else(|e| panic!("sample {}: {}", i, e));
        let mesh = &generated.mesh;
        let ctx = format!("sample {}", i);
        assert_closed_shell(mesh, expected_euler[i], &ctx).unwrap();
        assert!(oracle::check_no_degenerate_triangles(mesh, 1e-12).passed, "{}", ctx);
        assert!(
            oracle::check_footprint(mesh, generated.chimney.config(), 1e-6).passed,
            "{}",
            ctx
        );
    }
}

#[test]
fn ascii_export_writes_facets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.stl");
    let options = KernelOptions {
        stl_format: StlFormat::Ascii,
        ..KernelOptions::default()
    };
    let mut generated = generate_with(short_stack(), options).unwrap();
    generated.kernel.export(&generated.solid, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("solid short"));
    assert_eq!(
        text.matches("facet normal").count(),
        generated.mesh.triangle_count()
    );
}

#[test]
fn export_failure_is_reported_at_export_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("chimney.stl");
    let chimney = Chimney::new(short_stack()).unwrap();
    let mut kernel = CsgKernel::new();
    let err = chimney.export(&mut kernel, &path).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Export));
}
