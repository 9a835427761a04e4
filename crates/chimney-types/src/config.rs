use serde::{Deserialize, Serialize};

/// One course of the stack: brick module counts along each wall axis.
///
/// Each entry is the width of one brick in modules (2, 3 or 4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePair {
    /// Bricks along the `a` walls (the walls parallel to the X axis).
    pub a: Vec<u32>,
    /// Bricks along the `b` walls (the walls parallel to the Y axis).
    pub b: Vec<u32>,
}

impl CoursePair {
    pub fn new(a: impl Into<Vec<u32>>, b: impl Into<Vec<u32>>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn modules_a(&self) -> u32 {
        self.a.iter().sum()
    }

    pub fn modules_b(&self) -> u32 {
        self.b.iter().sum()
    }
}

/// Raw chimney parameters, before validation.
///
/// Lengths share one unit (the exported STL uses it as-is). Angles are radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChimneyParams {
    /// Footprint width along X.
    pub a: f64,
    /// Footprint depth along Y.
    pub b: f64,
    /// Mortar reveal: joint gap and notch depth.
    #[serde(default = "defaults::e")]
    pub e: f64,
    /// Course pitch: brick height plus one joint.
    #[serde(default = "defaults::f")]
    pub f: f64,
    /// Cap height.
    #[serde(default = "defaults::h")]
    pub h: f64,
    /// Flashing skirt length below the roof line.
    #[serde(default = "defaults::l")]
    pub l: f64,
    /// Flue divisions along X.
    #[serde(default = "defaults::div")]
    pub div_a: u32,
    /// Flue divisions along Y.
    #[serde(default = "defaults::div")]
    pub div_b: u32,
    /// Roof pitch.
    #[serde(default)]
    pub phi: f64,
    /// Ridge offset along X, `0 <= s <= a`.
    #[serde(default)]
    pub s: f64,
    /// Drop of the roof line below the cap bottom at offset `s`.
    pub t: f64,
    /// Number of courses.
    pub count: u32,
    /// Course pattern, repeated cyclically up to `count` courses.
    pub seqs: Vec<CoursePair>,
}

impl ChimneyParams {
    /// Parameters with the required fields set and everything else at its default.
    pub fn new(a: f64, b: f64, t: f64, count: u32, seqs: Vec<CoursePair>) -> Self {
        Self {
            a,
            b,
            e: defaults::e(),
            f: defaults::f(),
            h: defaults::h(),
            l: defaults::l(),
            div_a: defaults::div(),
            div_b: defaults::div(),
            phi: 0.0,
            s: 0.0,
            t,
            count,
            seqs,
        }
    }

    pub fn with_divisions(mut self, div_a: u32, div_b: u32) -> Self {
        self.div_a = div_a;
        self.div_b = div_b;
        self
    }

    pub fn with_roof(mut self, phi: f64, s: f64) -> Self {
        self.phi = phi;
        self.s = s;
        self
    }

    pub fn with_mortar(mut self, e: f64, f: f64) -> Self {
        self.e = e;
        self.f = f;
        self
    }

    pub fn with_cap(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    pub fn with_flashing(mut self, l: f64) -> Self {
        self.l = l;
        self
    }
}

mod defaults {
    pub(super) fn e() -> f64 {
        0.15
    }

    pub(super) fn f() -> f64 {
        0.625
    }

    pub(super) fn h() -> f64 {
        0.75
    }

    pub(super) fn l() -> f64 {
        1.0
    }

    pub(super) fn div() -> u32 {
        1
    }
}
