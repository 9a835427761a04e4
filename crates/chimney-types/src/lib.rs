pub mod config;
pub mod line;

pub use config::*;
pub use line::*;
