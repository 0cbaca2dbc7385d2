//! Trait definitions and types for adaptive cubature.

mod algorithms;
mod types;

pub use algorithms::CubatureAlgorithms;
pub use types::{CubatureOptions, CubatureRegion, CubatureResult, CubatureStatus};
