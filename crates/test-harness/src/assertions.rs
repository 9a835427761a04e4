//! Assertion helpers with diagnostic output.
//!
//! Each helper returns `Err(HarnessError::AssertionFailed)` carrying the
//! expected and actual values plus a caller-supplied context tag.

use csg_kernel::{RecordingKernel, TriangleMesh};

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};

fn verdict(v: OracleVerdict, ctx: &str) -> Result<(), HarnessError> {
    if v.passed {
        Ok(())
    } else {
        Err(HarnessError::OracleFailure {
            oracle: v.oracle_name,
            detail: format!("[{}] {}", ctx, v.detail),
        })
    }
}

/// Assert the mesh is closed, connected and has the given Euler characteristic.
pub fn assert_closed_shell(
    mesh: &TriangleMesh,
    expected_euler: i64,
    ctx: &str,
) -> Result<(), HarnessError> {
    verdict(oracle::check_closed(mesh), ctx)?;
    verdict(oracle::check_single_component(mesh), ctx)?;
    verdict(oracle::check_euler_characteristic(mesh, expected_euler), ctx)
}

/// Assert the enclosed volume within a relative tolerance.
pub fn assert_volume(
    mesh: &TriangleMesh,
    expected: f64,
    rel_tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = mesh.signed_volume();
    if (actual - expected).abs() <= rel_tol * expected.abs().max(1.0) {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] volume: expected {:.6}, got {:.6} (rel_tol={})",
                ctx, expected, actual, rel_tol,
            ),
        })
    }
}

/// Assert the mesh bounding box matches expected values within tolerance.
pub fn assert_bounding_box(
    mesh: &TriangleMesh,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bb = mesh.bounding_box();
    let actual_min = bb.min.to_array();
    let actual_max = bb.max.to_array();

    for i in 0..3 {
        if (actual_min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.4}, got {:.4} (tol={})",
                    ctx, i, expected_min[i], actual_min[i], tol,
                ),
            });
        }
        if (actual_max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.4}, got {:.4} (tol={})",
                    ctx, i, expected_max[i], actual_max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the recorded kernel saw the given number of unions and differences.
pub fn assert_boolean_counts(
    kernel: &RecordingKernel,
    unions: usize,
    differences: usize,
    ctx: &str,
) -> Result<(), HarnessError> {
    let (u, d) = (kernel.union_count(), kernel.difference_count());
    if (u, d) == (unions, differences) {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] expected {} unions and {} differences, got {} and {}",
                ctx, unions, differences, u, d,
            ),
        })
    }
}

/// Assert every verdict passed, listing all failures at once.
pub fn assert_all_passed(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    let failures: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] {} oracle(s) failed:\n  {}",
                ctx,
                failures.len(),
                failures.join("\n  "),
            ),
        })
    }
}
