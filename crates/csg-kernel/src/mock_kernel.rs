//! RecordingKernel: deterministic test double implementing GeometryKernel.
//!
//! Performs no geometry. Every call is appended to a log with serial solid
//! numbers so layout code can be checked call by call. A failure can be
//! injected at a chosen call index.

use std::path::{Path, PathBuf};

use chimney_types::{Line, SketchPlane};
use slotmap::SlotMap;

use crate::traits::GeometryKernel;
use crate::types::*;

/// One logged kernel call. Solids are identified by creation serial, starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelCall {
    Extrude {
        profile: Line,
        plane: SketchPlane,
        direction: [f64; 3],
        result: usize,
    },
    Union {
        a: usize,
        b: usize,
        result: usize,
    },
    Difference {
        a: usize,
        b: usize,
        result: usize,
    },
    WeldAndTriangulate {
        solid: usize,
        result: usize,
    },
    Export {
        solid: usize,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy)]
struct MockSolid {
    serial: usize,
    triangulated: bool,
}

#[derive(Debug, Default)]
pub struct RecordingKernel {
    solids: SlotMap<SolidKey, MockSolid>,
    next_serial: usize,
    calls: Vec<KernelCall>,
    attempts: usize,
    fail_at: Option<usize>,
}

impl RecordingKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kernel whose `call`-th invocation (0-based, counting every trait method) fails.
    pub fn failing_at(call: usize) -> Self {
        Self {
            fail_at: Some(call),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[KernelCall] {
        &self.calls
    }

    /// Profiles, planes and directions of every extrusion, in call order.
    pub fn extrusions(&self) -> impl Iterator<Item = (&Line, &SketchPlane, [f64; 3])> {
        self.calls.iter().filter_map(|call| match call {
            KernelCall::Extrude {
                profile,
                plane,
                direction,
                ..
            } => Some((profile, plane, *direction)),
            _ => None,
        })
    }

    pub fn union_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, KernelCall::Union { .. }))
            .count()
    }

    pub fn difference_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, KernelCall::Difference { .. }))
            .count()
    }

    /// Number of solids not yet consumed.
    pub fn live_solids(&self) -> usize {
        self.solids.len()
    }

    pub fn serial_of(&self, solid: &SolidHandle) -> Option<usize> {
        self.solids.get(solid.key()).map(|s| s.serial)
    }

    fn begin_call(&mut self) -> Result<(), GeometryError> {
        let call = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(call) {
            return Err(GeometryError::Injected { call });
        }
        Ok(())
    }

    fn create(&mut self, triangulated: bool) -> (SolidHandle, usize) {
        let serial = self.next_serial;
        self.next_serial += 1;
        let key = self.solids.insert(MockSolid {
            serial,
            triangulated,
        });
        (SolidHandle::new(key), serial)
    }

    fn consume_pair(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<(usize, usize), GeometryError> {
        if a.key() == b.key() {
            return Err(GeometryError::UnknownSolid);
        }
        let sa = *self.solids.get(a.key()).ok_or(GeometryError::UnknownSolid)?;
        let sb = *self.solids.get(b.key()).ok_or(GeometryError::UnknownSolid)?;
        self.solids.remove(a.key());
        self.solids.remove(b.key());
        Ok((sa.serial, sb.serial))
    }
}

impl GeometryKernel for RecordingKernel {
    fn extrude(
        &mut self,
        profile: &Line,
        plane: &SketchPlane,
        direction: [f64; 3],
    ) -> Result<SolidHandle, GeometryError> {
        self.begin_call()?;
        if profile.len() < 3 {
            return Err(GeometryError::DegenerateProfile {
                reason: format!("profile has {} points", profile.len()),
            });
        }
        if direction.iter().all(|c| *c == 0.0) {
            return Err(GeometryError::DegenerateExtrusion {
                reason: "direction has zero length".to_string(),
            });
        }
        let (handle, result) = self.create(false);
        self.calls.push(KernelCall::Extrude {
            profile: profile.clone(),
            plane: *plane,
            direction,
            result,
        });
        Ok(handle)
    }

    fn union(&mut self, a: SolidHandle, b: SolidHandle) -> Result<SolidHandle, GeometryError> {
        self.begin_call()?;
        let (a, b) = self.consume_pair(&a, &b)?;
        let (handle, result) = self.create(false);
        self.calls.push(KernelCall::Union { a, b, result });
        Ok(handle)
    }

    fn difference(
        &mut self,
        a: SolidHandle,
        b: SolidHandle,
    ) -> Result<SolidHandle, GeometryError> {
        self.begin_call()?;
        let (a, b) = self.consume_pair(&a, &b)?;
        let (handle, result) = self.create(false);
        self.calls.push(KernelCall::Difference { a, b, result });
        Ok(handle)
    }

    fn weld_and_triangulate(&mut self, solid: SolidHandle) -> Result<SolidHandle, GeometryError> {
        self.begin_call()?;
        let old = self
            .solids
            .remove(solid.key())
            .ok_or(GeometryError::UnknownSolid)?;
        let (handle, result) = self.create(true);
        self.calls.push(KernelCall::WeldAndTriangulate {
            solid: old.serial,
            result,
        });
        Ok(handle)
    }

    fn export(&mut self, solid: &SolidHandle, path: &Path) -> Result<(), GeometryError> {
        self.begin_call()?;
        let state = self
            .solids
            .get(solid.key())
            .ok_or(GeometryError::UnknownSolid)?;
        if !state.triangulated {
            return Err(GeometryError::NotTriangulated);
        }
        self.calls.push(KernelCall::Export {
            solid: state.serial,
            path: path.to_path_buf(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Line {
        Line::rectangle(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn records_calls_with_serials() {
        let mut kernel = RecordingKernel::new();
        let plane = SketchPlane::horizontal(0.0);
        let a = kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).unwrap();
        let b = kernel.extrude(&square(), &plane, [0.0, 0.0, 2.0]).unwrap();
        let u = kernel.union(a, b).unwrap();
        assert_eq!(kernel.serial_of(&u), Some(2));
        assert_eq!(kernel.live_solids(), 1);
        assert_eq!(
            kernel.calls()[2],
            KernelCall::Union {
                a: 0,
                b: 1,
                result: 2
            }
        );
        assert_eq!(kernel.extrusions().count(), 2);
    }

    #[test]
    fn injected_failure_hits_the_chosen_call() {
        let mut kernel = RecordingKernel::failing_at(1);
        let plane = SketchPlane::horizontal(0.0);
        assert!(kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).is_ok());
        assert_eq!(
            kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).unwrap_err(),
            GeometryError::Injected { call: 1 }
        );
        assert!(kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).is_ok());
    }

    #[test]
    fn export_requires_triangulation() {
        let mut kernel = RecordingKernel::new();
        let a = kernel
            .extrude(&square(), &SketchPlane::horizontal(0.0), [0.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(
            kernel.export(&a, Path::new("x.stl")).unwrap_err(),
            GeometryError::NotTriangulated
        );
        let a = kernel.weld_and_triangulate(a).unwrap();
        kernel.export(&a, Path::new("x.stl")).unwrap();
        assert!(matches!(
            kernel.calls().last(),
            Some(KernelCall::Export { solid: 1, .. })
        ));
    }

    #[test]
    fn consumed_handle_is_unknown() {
        let mut kernel = RecordingKernel::new();
        let plane = SketchPlane::horizontal(0.0);
        let a = kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).unwrap();
        let forged = SolidHandle::new(a.key());
        let b = kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).unwrap();
        let _u = kernel.union(a, b).unwrap();
        let c = kernel.extrude(&square(), &plane, [0.0, 0.0, 1.0]).unwrap();
        assert_eq!(
            kernel.difference(forged, c).unwrap_err(),
            GeometryError::UnknownSolid
        );
    }
}
