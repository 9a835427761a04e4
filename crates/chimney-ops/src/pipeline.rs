use std::path::Path;

use chimney_types::ChimneyParams;
use csg_kernel::{GeometryKernel, SolidHandle};
use tracing::{info, info_span, instrument};

use crate::assemble::assemble;
use crate::config::ChimneyConfig;
use crate::error::{ChimneyError, Stage, StageContext};
use crate::openings::carve_openings;
use crate::roof_cut::trim;

/// A validated chimney, ready to be generated on any kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Chimney {
    config: ChimneyConfig,
}

impl Chimney {
    /// Validate `params`. No geometry is built.
    pub fn new(params: ChimneyParams) -> Result<Self, ChimneyError> {
        Ok(Self::from_config(ChimneyConfig::new(params)?))
    }

    pub fn from_config(config: ChimneyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChimneyConfig {
        &self.config
    }

    /// Build the finished, triangulated solid.
    ///
    /// Courses and cap are assembled first, flues are carved through the
    /// stack, the roof line is cut and the flashing added, and the result
    /// is welded and triangulated.
    #[instrument(skip_all, fields(a = self.config.a(), b = self.config.b(), count = self.config.count()))]
    pub fn generate(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ChimneyError> {
        let stack = info_span!("assemble").in_scope(|| assemble(kernel, &self.config))?;
        let carved =
            info_span!("carve_openings").in_scope(|| carve_openings(kernel, stack, &self.config))?;
        let trimmed = info_span!("trim").in_scope(|| trim(kernel, carved, &self.config))?;
        let solid = info_span!("cleanup").in_scope(|| {
            kernel
                .weld_and_triangulate(trimmed)
                .at_stage(Stage::Cleanup)
        })?;
        info!("chimney generated");
        Ok(solid)
    }

    /// Generate and write the solid to `path`. Returns the exported solid.
    #[instrument(skip(self, kernel))]
    pub fn export(
        &self,
        kernel: &mut dyn GeometryKernel,
        path: &Path,
    ) -> Result<SolidHandle, ChimneyError> {
        let solid = self.generate(kernel)?;
        kernel.export(&solid, path).at_stage(Stage::Export)?;
        info!(path = %path.display(), "exported chimney");
        Ok(solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use chimney_types::CoursePair;
    use csg_kernel::{KernelCall, RecordingKernel};

    fn params() -> ChimneyParams {
        ChimneyParams::new(
            10.8333,
            4.3333,
            1.75,
            2,
            vec![CoursePair::new([3, 4, 4, 4, 2, 3], [2, 2, 2, 2])],
        )
        .with_divisions(3, 1)
        .with_roof(std::f64::consts::FRAC_PI_4, 7.583333)
    }

    #[test]
    fn invalid_params_never_reach_the_kernel() {
        let mut p = params();
        p.seqs[0].a.push(5);
        let err = Chimney::new(p).unwrap_err();
        assert!(matches!(
            err,
            ChimneyError::Configuration(ConfigurationError::BrickWidth { width: 5, .. })
        ));
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn stages_run_in_order() {
        let chimney = Chimney::new(params()).unwrap();
        let mut kernel = RecordingKernel::new();
        let solid = chimney.generate(&mut kernel).unwrap();

        // 2 courses × 3 calls, stack union, cap extrude + union.
        let assembled = 2 * 3 + 1 + 2;
        // 3 flues × (extrude + difference).
        let carved = assembled + 3 * 2;
        // Roof cut and flashing.
        let trimmed = carved + 4;
        let calls = kernel.calls();
        assert_eq!(calls.len(), trimmed + 1);
        assert!(matches!(calls[assembled], KernelCall::Extrude { .. }));
        assert!(matches!(calls[carved + 1], KernelCall::Difference { .. }));
        assert!(matches!(calls[trimmed], KernelCall::WeldAndTriangulate { .. }));
        assert_eq!(kernel.serial_of(&solid), Some(trimmed));
        assert_eq!(kernel.live_solids(), 1);
    }

    #[test]
    fn export_follows_cleanup() {
        let chimney = Chimney::new(params()).unwrap();
        let mut kernel = RecordingKernel::new();
        let path = Path::new("chimney.stl");
        chimney.export(&mut kernel, path).unwrap();
        match kernel.calls().last() {
            Some(KernelCall::Export { path: written, .. }) => assert_eq!(written, path),
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    fn failures_carry_their_stage() {
        let chimney = Chimney::new(params()).unwrap();
        let cases = [
            (0, Stage::Course { number: 1 }),
            (6, Stage::CourseStack),
            (7, Stage::Cap),
            (11, Stage::FlueOpening { column: 1, row: 0 }),
            (15, Stage::RoofCut),
            (18, Stage::Flashing),
            (19, Stage::Cleanup),
            (20, Stage::Export),
        ];
        for (call, stage) in cases {
            let mut kernel = RecordingKernel::failing_at(call);
            let err = chimney
                .export(&mut kernel, Path::new("chimney.stl"))
                .unwrap_err();
            assert_eq!(err.stage(), Some(stage), "call {}", call);
        }
    }
}
