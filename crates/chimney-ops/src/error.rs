use std::fmt;

use csg_kernel::GeometryError;

/// Wall axis: `A` walls run along X (width `a`), `B` walls along Y (depth `b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    A,
    B,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::A => write!(f, "a"),
            Axis::B => write!(f, "b"),
        }
    }
}

/// A chimney configuration that violates one of its invariants.
/// Raised before any geometry work.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("at least one course pair is required")]
    NoCourses,

    #[error("course pair {pair} has an empty sequence on axis {axis}")]
    EmptySequence { pair: usize, axis: Axis },

    #[error("course pair {pair}, axis {axis}: brick width {width} is not one of 2, 3, 4")]
    BrickWidth { pair: usize, axis: Axis, width: u32 },

    #[error("course pair {pair}, axis {axis}: {found} modules, expected {expected}")]
    Rectangularity {
        pair: usize,
        axis: Axis,
        expected: u32,
        found: u32,
    },

    #[error("ridge offset s = {s} must lie within [0, {a}]")]
    OffsetBound { s: f64, a: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("course count must be at least 1")]
    ZeroCount,

    #[error("flue divisions must be at least 1, got {div_a} x {div_b}")]
    ZeroDivisions { div_a: u32, div_b: u32 },

    #[error("mortar reveal e = {e} must be smaller than course pitch f = {f}")]
    GapExceedsPitch { e: f64, f: f64 },

    #[error("roof pitch {phi} must lie in [0, pi/2)")]
    RoofPitch { phi: f64 },

    #[error("axis {axis}: a two-module brick ({brick}) is not wider than the mortar reveal {e}")]
    MortarTooWide { axis: Axis, brick: f64, e: f64 },

    #[error("axis {axis}: flue cells collapse to extent {extent}")]
    FlueCellCollapsed { axis: Axis, extent: f64 },
}

/// Pipeline step a kernel failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building the solid of one course (1-based, counted downward from the cap).
    Course { number: u32 },
    /// Fold-union of the course solids.
    CourseStack,
    Cap,
    FlueOpening { column: u32, row: u32 },
    RoofCut,
    Flashing,
    /// Weld and triangulate.
    Cleanup,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Course { number } => write!(f, "course {}", number),
            Stage::CourseStack => write!(f, "course stack"),
            Stage::Cap => write!(f, "cap"),
            Stage::FlueOpening { column, row } => {
                write!(f, "flue opening ({}, {})", column, row)
            }
            Stage::RoofCut => write!(f, "roof cut"),
            Stage::Flashing => write!(f, "flashing"),
            Stage::Cleanup => write!(f, "cleanup"),
            Stage::Export => write!(f, "export"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChimneyError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("geometry error during {stage}: {source}")]
    Geometry {
        stage: Stage,
        source: GeometryError,
    },
}

impl ChimneyError {
    /// Stage of a geometry failure, `None` for configuration errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ChimneyError::Configuration(_) => None,
            ChimneyError::Geometry { stage, .. } => Some(*stage),
        }
    }
}

/// Attach a pipeline stage to kernel results.
pub trait StageContext<T> {
    fn at_stage(self, stage: Stage) -> Result<T, ChimneyError>;
}

impl<T> StageContext<T> for Result<T, GeometryError> {
    fn at_stage(self, stage: Stage) -> Result<T, ChimneyError> {
        self.map_err(|source| ChimneyError::Geometry { stage, source })
    }
}
