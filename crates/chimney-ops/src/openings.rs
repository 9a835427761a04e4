use chimney_types::{Line, SketchPlane};
use csg_kernel::{GeometryKernel, SolidHandle};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::ChimneyConfig;
use crate::error::{Axis, ChimneyError, Stage, StageContext};

/// How far flue prisms reach past the cap top and the bottom course.
pub const OVERSHOOT: f64 = 1.0;

/// One rectangular flue opening.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlueCell {
    /// Index along X.
    pub column: u32,
    /// Index along Y.
    pub row: u32,
    pub outline: Line,
}

/// Grid of flue openings over the footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlueGrid {
    /// Wall thickness kept around the openings along X.
    pub st_a: f64,
    /// Wall thickness kept around the openings along Y.
    pub st_b: f64,
    /// `div_a + 1` boundaries from `st_a` to `a − st_a`.
    pub xs: Vec<f64>,
    /// `div_b + 1` boundaries from `st_b` to `b − st_b`.
    pub ys: Vec<f64>,
}

impl FlueGrid {
    /// Openings in column-major order: every row of column 0, then column 1, ...
    pub fn cells(&self) -> Vec<FlueCell> {
        let mut cells = Vec::with_capacity((self.xs.len() - 1) * (self.ys.len() - 1));
        for (column, x) in self.xs.windows(2).enumerate() {
            for (row, y) in self.ys.windows(2).enumerate() {
                cells.push(FlueCell {
                    column: column as u32,
                    row: row as u32,
                    outline: Line::rectangle(
                        x[0] + self.st_a,
                        y[0] + self.st_b,
                        x[1] - self.st_a,
                        y[1] - self.st_b,
                    ),
                });
            }
        }
        cells
    }
}

fn boundaries(st: f64, length: f64, divisions: u32) -> Vec<f64> {
    let step = (length - 2.0 * st) / divisions as f64;
    (0..=divisions).map(|i| st + i as f64 * step).collect()
}

pub fn plan_openings(config: &ChimneyConfig) -> FlueGrid {
    let st_a = config.flue_inset(Axis::A);
    let st_b = config.flue_inset(Axis::B);
    FlueGrid {
        st_a,
        st_b,
        xs: boundaries(st_a, config.a(), config.div_a()),
        ys: boundaries(st_b, config.b(), config.div_b()),
    }
}

/// Subtract one prism per flue cell, running through the whole stack.
#[instrument(skip(kernel, chimney, config), fields(div_a = config.div_a(), div_b = config.div_b()))]
pub fn carve_openings(
    kernel: &mut dyn GeometryKernel,
    chimney: SolidHandle,
    config: &ChimneyConfig,
) -> Result<SolidHandle, ChimneyError> {
    let grid = plan_openings(config);
    let top = config.h() + OVERSHOOT;
    let depth = config.h() + config.stack_height() + 2.0 * OVERSHOOT;

    let mut result = chimney;
    for cell in grid.cells() {
        let stage = Stage::FlueOpening {
            column: cell.column,
            row: cell.row,
        };
        debug!(column = cell.column, row = cell.row, "carving flue");
        let prism = kernel
            .extrude(
                &cell.outline,
                &SketchPlane::horizontal(top),
                [0.0, 0.0, -depth],
            )
            .at_stage(stage)?;
        result = kernel.difference(result, prism).at_stage(stage)?;
    }
    info!(
        openings = (grid.xs.len() - 1) * (grid.ys.len() - 1),
        "carved flue openings"
    );
    Ok(result)
}
