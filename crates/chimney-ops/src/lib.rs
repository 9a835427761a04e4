//! Parametric layout of a brick chimney stack.
//!
//! Everything here talks to geometry through [`csg_kernel::GeometryKernel`];
//! the planners (`plan_courses`, `plan_openings`, the roof profiles) are pure
//! and can be inspected without a kernel.

pub mod assemble;
pub mod config;
pub mod error;
pub mod openings;
pub mod outline;
pub mod perimeter;
pub mod pipeline;
pub mod roof_cut;
pub mod sequence;

pub use assemble::{assemble, plan_courses, CoursePlan};
pub use config::ChimneyConfig;
pub use error::*;
pub use openings::{carve_openings, plan_openings, FlueCell, FlueGrid, OVERSHOOT};
pub use outline::build_wall_outline;
pub use perimeter::build_course_perimeter;
pub use pipeline::Chimney;
pub use roof_cut::{flashing_profile, roof_cut_profile, trim, CutPrism, RIDGE_SNAP_EPSILON};
pub use sequence::{validate_sequences, ModuleCounts};
