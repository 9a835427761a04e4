use std::f64::consts::FRAC_PI_2;

use chimney_types::{ChimneyParams, CoursePair};

use crate::error::{Axis, ConfigurationError};
use crate::sequence::{validate_sequences, ModuleCounts};

/// Validated, immutable chimney configuration.
///
/// Built once from [`ChimneyParams`]; every invariant is checked in
/// [`ChimneyConfig::new`] so the planners can rely on them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChimneyConfig {
    params: ChimneyParams,
    modules: ModuleCounts,
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NonFinite { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive { name, value })
    }
}

impl ChimneyConfig {
    pub fn new(params: ChimneyParams) -> Result<Self, ConfigurationError> {
        let p = &params;
        for (name, value) in [
            ("a", p.a),
            ("b", p.b),
            ("e", p.e),
            ("f", p.f),
            ("h", p.h),
            ("l", p.l),
            ("phi", p.phi),
            ("s", p.s),
            ("t", p.t),
        ] {
            finite(name, value)?;
        }
        for (name, value) in [
            ("a", p.a),
            ("b", p.b),
            ("e", p.e),
            ("f", p.f),
            ("h", p.h),
            ("l", p.l),
        ] {
            positive(name, value)?;
        }
        if p.count == 0 {
            return Err(ConfigurationError::ZeroCount);
        }
        if p.div_a == 0 || p.div_b == 0 {
            return Err(ConfigurationError::ZeroDivisions {
                div_a: p.div_a,
                div_b: p.div_b,
            });
        }

        let modules = validate_sequences(&p.seqs)?;

        if p.e >= p.f {
            return Err(ConfigurationError::GapExceedsPitch { e: p.e, f: p.f });
        }
        if !(0.0..FRAC_PI_2).contains(&p.phi) {
            return Err(ConfigurationError::RoofPitch { phi: p.phi });
        }
        if p.s < 0.0 || p.s > p.a {
            return Err(ConfigurationError::OffsetBound { s: p.s, a: p.a });
        }

        let config = Self { params, modules };
        for axis in [Axis::A, Axis::B] {
            let brick = 2.0 * config.module_width(axis);
            if brick <= config.e() {
                return Err(ConfigurationError::MortarTooWide {
                    axis,
                    brick,
                    e: config.e(),
                });
            }
            let extent = config.flue_cell_extent(axis);
            if extent <= 0.0 {
                return Err(ConfigurationError::FlueCellCollapsed { axis, extent });
            }
        }
        Ok(config)
    }

    pub fn params(&self) -> &ChimneyParams {
        &self.params
    }

    pub fn a(&self) -> f64 {
        self.params.a
    }

    pub fn b(&self) -> f64 {
        self.params.b
    }

    pub fn e(&self) -> f64 {
        self.params.e
    }

    pub fn f(&self) -> f64 {
        self.params.f
    }

    pub fn h(&self) -> f64 {
        self.params.h
    }

    pub fn l(&self) -> f64 {
        self.params.l
    }

    pub fn div_a(&self) -> u32 {
        self.params.div_a
    }

    pub fn div_b(&self) -> u32 {
        self.params.div_b
    }

    pub fn phi(&self) -> f64 {
        self.params.phi
    }

    pub fn s(&self) -> f64 {
        self.params.s
    }

    pub fn t(&self) -> f64 {
        self.params.t
    }

    pub fn count(&self) -> u32 {
        self.params.count
    }

    pub fn seqs(&self) -> &[CoursePair] {
        &self.params.seqs
    }

    /// Course pattern for 0-based course `index`; the table repeats cyclically.
    pub fn course(&self, index: usize) -> &CoursePair {
        &self.params.seqs[index % self.params.seqs.len()]
    }

    pub fn modules(&self) -> ModuleCounts {
        self.modules
    }

    /// Wall length per axis.
    pub fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::A => self.a(),
            Axis::B => self.b(),
        }
    }

    /// Width of one module, `(w + e) / modules`.
    pub fn module_width(&self, axis: Axis) -> f64 {
        (self.length(axis) + self.e()) / self.modules.along(axis) as f64
    }

    /// Wall thickness left around each flue cell, `module_width − e/2`.
    pub fn flue_inset(&self, axis: Axis) -> f64 {
        self.module_width(axis) - self.e() / 2.0
    }

    fn divisions(&self, axis: Axis) -> u32 {
        match axis {
            Axis::A => self.div_a(),
            Axis::B => self.div_b(),
        }
    }

    /// Extent of one flue opening along `axis`.
    pub fn flue_cell_extent(&self, axis: Axis) -> f64 {
        let st = self.flue_inset(axis);
        (self.length(axis) - 2.0 * st) / self.divisions(axis) as f64 - 2.0 * st
    }

    /// Height of the brick slab in one course, `f − e`.
    pub fn brick_height(&self) -> f64 {
        self.f() - self.e()
    }

    /// Height of all courses, `count · f`.
    pub fn stack_height(&self) -> f64 {
        self.count() as f64 * self.f()
    }
}

impl TryFrom<ChimneyParams> for ChimneyConfig {
    type Error = ConfigurationError;

    fn try_from(params: ChimneyParams) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}
