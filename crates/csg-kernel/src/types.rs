use slotmap::new_key_type;

new_key_type! {
    /// Arena key of a solid inside a kernel.
    pub struct SolidKey;
}

/// Owned handle to a solid stored in a geometry kernel.
///
/// Deliberately neither `Clone` nor `Copy`: boolean operations take their
/// operands by value, so a solid cannot be used again once consumed.
/// NEVER persisted. Valid only for the kernel instance that issued it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SolidHandle(SolidKey);

impl SolidHandle {
    /// Wrap an arena key. Kernel implementations call this when storing a solid.
    pub fn new(key: SolidKey) -> Self {
        Self(key)
    }

    pub fn key(&self) -> SolidKey {
        self.0
    }
}

/// STL flavor written by `export`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("degenerate profile: {reason}")]
    DegenerateProfile { reason: String },

    #[error("degenerate extrusion: {reason}")]
    DegenerateExtrusion { reason: String },

    #[error("solid handle is not known to this kernel")]
    UnknownSolid,

    #[error("{operation} produced an empty solid")]
    EmptyResult { operation: String },

    #[error("solid must be welded and triangulated before export")]
    NotTriangulated,

    #[error("STL parse error: {reason}")]
    StlParse { reason: String },

    #[error("I/O error: {reason}")]
    Io { reason: String },

    #[error("injected failure at kernel call {call}")]
    Injected { call: usize },
}
