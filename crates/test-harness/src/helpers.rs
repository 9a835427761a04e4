//! Helper functions: error type, kernel runs, file output.

use std::fs;
use std::path::{Path, PathBuf};

use chimney_ops::{Chimney, ChimneyError};
use chimney_types::ChimneyParams;
use csg_kernel::{
    CsgKernel, GeometryError, KernelIntrospect, KernelOptions, SolidHandle, TriangleMesh,
};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error(transparent)]
    Chimney(#[from] ChimneyError),

    #[error("kernel error: {0}")]
    Kernel(#[from] GeometryError),

    #[error("I/O error at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ── Kernel Runs ─────────────────────────────────────────────────────────────

/// A finished chimney on a real kernel, with its mesh already extracted.
pub struct GeneratedChimney {
    pub chimney: Chimney,
    pub kernel: CsgKernel,
    pub solid: SolidHandle,
    pub mesh: TriangleMesh,
}

/// Validate `params`, run the full pipeline on a fresh [`CsgKernel`] and read back the mesh.
pub fn generate(params: ChimneyParams) -> Result<GeneratedChimney, HarnessError> {
    generate_with(params, KernelOptions::default())
}

pub fn generate_with(
    params: ChimneyParams,
    options: KernelOptions,
) -> Result<GeneratedChimney, HarnessError> {
    let chimney = Chimney::new(params)?;
    let mut kernel = CsgKernel::with_options(options);
    let solid = chimney.generate(&mut kernel)?;
    let mesh = kernel.triangle_mesh(&solid)?;
    Ok(GeneratedChimney {
        chimney,
        kernel,
        solid,
        mesh,
    })
}

/// Create `dir` if needed and return `dir/chimney{index}.stl`.
pub fn sample_path(dir: &Path, index: usize) -> Result<PathBuf, HarnessError> {
    fs::create_dir_all(dir).map_err(|e| HarnessError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(dir.join(format!("chimney{}.stl", index)))
}

/// Write `text` to `path`, mapping failures into [`HarnessError::Io`].
pub fn write_text(path: &Path, text: &str) -> Result<(), HarnessError> {
    fs::write(path, text).map_err(|e| HarnessError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
