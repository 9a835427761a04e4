//! Test harness for the chimney generator.
//!
//! Runs configurations through the real kernel, checks the resulting meshes
//! and produces diagnostic output.
//!
//! # Key Components
//!
//! - [`fixtures`]: Reference configurations and named scenarios
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Text and JSON descriptions of a generated chimney
//! - [`helpers`]: Error type, kernel runs, file output
//! - [`assertions`]: Assertion helpers with diagnostics

pub mod assertions;
pub mod fixtures;
pub mod helpers;
pub mod oracle;
pub mod report;

pub use helpers::{generate, GeneratedChimney, HarnessError};
pub use oracle::OracleVerdict;
pub use report::ChimneyReport;
