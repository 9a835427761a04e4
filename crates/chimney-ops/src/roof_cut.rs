use chimney_types::{Line, SketchPlane};
use csg_kernel::{GeometryKernel, SolidHandle};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::ChimneyConfig;
use crate::error::{ChimneyError, Stage, StageContext};

/// Margin the roof cut reaches past the footprint on every side.
pub const ROOF_CUT_MARGIN: f64 = 1.0;

/// `s` within this distance of `0` or `a` counts as a ridge on the wall.
pub const RIDGE_SNAP_EPSILON: f64 = 1e-9;

/// A profile in a vertical `(x, z)` plane and the sweep that turns it into a prism.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutPrism {
    pub profile: Line,
    pub plane: SketchPlane,
    pub direction: [f64; 3],
}

impl CutPrism {
    fn extrude(
        &self,
        kernel: &mut dyn GeometryKernel,
        stage: Stage,
    ) -> Result<SolidHandle, ChimneyError> {
        kernel
            .extrude(&self.profile, &self.plane, self.direction)
            .at_stage(stage)
    }
}

/// Everything below the roof line, from the ridge point `(s, −t)` sloping
/// down at `φ` on both sides, to below the bottom course.
pub fn roof_cut_profile(config: &ChimneyConfig) -> CutPrism {
    let off = ROOF_CUT_MARGIN;
    let (a, b, s, t) = (config.a(), config.b(), config.s(), config.t());
    let slope = config.phi().tan();
    let floor = -config.stack_height() - config.h() - off;

    let profile = Line::from_coords(&[
        (s, -t),
        (-off, -t - slope * (s + off)),
        (-off, floor),
        (a + off, floor),
        (a + off, -t - slope * (a - s + off)),
    ]);
    CutPrism {
        profile,
        plane: SketchPlane::vertical_xz(-off),
        direction: [0.0, b + 2.0 * off, 0.0],
    }
}

/// The flashing skirt: a band of height `l` hanging below the roof line.
///
/// With the ridge on a wall (`s` at `0` or `a`) the leading point would
/// repeat its neighbour, so it is dropped.
pub fn flashing_profile(config: &ChimneyConfig) -> CutPrism {
    let (a, b, s, t, l) = (config.a(), config.b(), config.s(), config.t(), config.l());
    let slope = config.phi().tan();

    let mut profile = Line::from_coords(&[
        (s, -t),
        (0.0, -t - slope * s),
        (0.0, -t - l - slope * s),
        (s, -t - l),
        (a, -t - l - slope * (a - s)),
        (a, -t - slope * (a - s)),
    ]);
    if s.abs() <= RIDGE_SNAP_EPSILON || (s - a).abs() <= RIDGE_SNAP_EPSILON {
        profile.remove_first();
    }
    CutPrism {
        profile,
        plane: SketchPlane::vertical_xz(0.0),
        direction: [0.0, b, 0.0],
    }
}

/// Cut the chimney along the roof line, then add the flashing skirt.
#[instrument(skip(kernel, chimney, config), fields(phi = config.phi(), s = config.s()))]
pub fn trim(
    kernel: &mut dyn GeometryKernel,
    chimney: SolidHandle,
    config: &ChimneyConfig,
) -> Result<SolidHandle, ChimneyError> {
    let cut = roof_cut_profile(config);
    let flashing = flashing_profile(config);
    debug!(
        cut_points = cut.profile.len(),
        flashing_points = flashing.profile.len(),
        "roof profiles"
    );

    let cutter = cut.extrude(kernel, Stage::RoofCut)?;
    let trimmed = kernel
        .difference(chimney, cutter)
        .at_stage(Stage::RoofCut)?;
    let skirt = flashing.extrude(kernel, Stage::Flashing)?;
    let result = kernel.union(trimmed, skirt).at_stage(Stage::Flashing)?;
    info!("trimmed to roof line");
    Ok(result)
}
