//! Generic implementations shared by all Runtime backends.
//!
//! Everything here is generic over `R: Runtime` and a client bound of numr
//! op traits, so the same code backs the CPU, CUDA and WebGPU impls of
//! [`CubatureAlgorithms`](crate::traits::CubatureAlgorithms).

mod cubature;
mod gauss_kronrod;
mod gauss_legendre;
mod genz_malik;
mod newton_cotes;
mod product;
mod rule;

pub use cubature::cubature_impl;
pub use gauss_kronrod::GaussKronrod;
pub use gauss_legendre::{roots_legendre, GaussLegendre};
pub use genz_malik::GenzMalik;
pub use newton_cotes::NewtonCotes;
pub use product::Product;
pub use rule::{CubatureRule, ErrorFromDifference, FixedRule};
