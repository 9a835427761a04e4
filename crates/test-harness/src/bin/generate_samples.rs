//! Writes every reference chimney to `out/chimney{i}.stl`, with a JSON report beside it.
//!
//! Usage: `generate_samples [OUT_DIR]`. Set `RUST_LOG=debug` for per-course detail.

use std::path::PathBuf;
use std::process::ExitCode;

use csg_kernel::GeometryKernel;
use test_harness::fixtures::sample_configurations;
use test_harness::helpers::{sample_path, write_text};
use test_harness::{generate, ChimneyReport, HarnessError};
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn run(out_dir: PathBuf) -> Result<(), HarnessError> {
    for (i, params) in sample_configurations().into_iter().enumerate() {
        let name = format!("chimney{}", i);
        let mut generated = generate(params)?;
        let path = sample_path(&out_dir, i)?;
        generated.kernel.export(&generated.solid, &path)?;

        let report = ChimneyReport::from_generated(&name, &generated);
        write_text(&path.with_extension("json"), &report.to_json()?)?;
        if report.passed() {
            info!(
                path = %path.display(),
                triangles = generated.mesh.triangle_count(),
                "wrote sample"
            );
        } else {
            warn!(path = %path.display(), "sample has failing checks\n{}", report);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("out"));
    match run(out_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
