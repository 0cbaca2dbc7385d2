//! cubr - Adaptive Multidimensional Cubature
//!
//! cubr estimates integrals of vector- and array-valued functions over
//! axis-aligned hyperrectangles to a requested tolerance. Built on numr's
//! foundational math primitives, it works across all backends (CPU, CUDA,
//! WebGPU).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       cubr                               │
//! │   (adaptive driver, cubature rules, rule composition)   │
//! └──────────────────────────┬──────────────────────────────┘
//!                            │ uses
//! ┌──────────────────────────▼──────────────────────────────┐
//! │                       numr                               │
//! │     (tensors, basic linalg, runtime clients)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Rule nodes and weights are constructed once, on the host, when a rule
//! is built; integrand evaluation batches all nodes of a region into a
//! single `(ndim, npoints)` tensor and reduces with tensor ops, so the
//! heavy part of the computation stays on device.
//!
//! # Cubature Rules
//!
//! - [`NewtonCotes`] - equally spaced nodes, weights solved from moment
//!   conditions (open or closed)
//! - [`GaussLegendre`] - classical Gauss-Legendre nodes via
//!   [`roots_legendre`]
//! - [`GaussKronrod`] - embedded 15- or 21-point pair with built-in error
//!   estimation
//! - [`GenzMalik`] - embedded degree-7/5 multidimensional rule for
//!   `ndim >= 2`
//! - [`Product`] - n-dimensional rule from the Cartesian product of
//!   error-capable factors
//! - [`ErrorFromDifference`] - pairs any two rules of different order to
//!   give error estimation to rules that lack it
//!
//! Custom rules plug in through [`FixedRule`] and the [`CubatureRule`]
//! trait.
//!
//! # Adaptive Driver
//!
//! [`CubatureAlgorithms::cubature`] refines the subregion with the
//! largest error estimate, bisecting it along every axis, until every
//! component of the output satisfies `error <= atol + rtol * |estimate|`
//! or the subdivision budget runs out. Running out of budget is a normal
//! terminal state carried in the result, not an error.
//!
//! # Backend Support
//!
//! cubr is generic over numr's `Runtime` trait. The same code works on:
//! - CPU (with SIMD acceleration)
//! - CUDA (NVIDIA GPUs)
//! - WebGPU (cross-platform GPU)
//!
//! # Feature Flags
//!
//! | Feature | Description | Dependencies |
//! |---------|-------------|--------------|
//! | `cuda`  | Enable CUDA GPU acceleration | CUDA 12.x, numr/cuda |
//! | `wgpu`  | Enable WebGPU cross-platform GPU | numr/wgpu |
//!
//! ## Usage
//!
//! ```toml
//! # CPU only (default)
//! cubr = "0.1"
//!
//! # With CUDA support
//! cubr = { version = "0.1", features = ["cuda"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cubr::{CubatureAlgorithms, CubatureOptions, GaussKronrod, Product};
//! use numr::runtime::cpu::{CpuClient, CpuDevice};
//! use numr::tensor::Tensor;
//!
//! let device = CpuDevice::new();
//! let client = CpuClient::new(device.clone());
//!
//! // Integrate cos(x_1) + cos(x_2) over [0, 1]^2; exact value 2*sin(1).
//! let gk = GaussKronrod::new(15)?;
//! let rule = Product::new(&[&gk, &gk])?;
//!
//! let result = client.cubature(
//!     |x| {
//!         // x has shape (2, m); return one value per evaluation point.
//!         let m = x.shape()[1];
//!         let data: Vec<f64> = x.to_vec();
//!         let mut out = vec![0.0; m];
//!         for i in 0..2 {
//!             for k in 0..m {
//!                 out[k] += data[i * m + k].cos();
//!             }
//!         }
//!         Ok(Tensor::from_slice(&out, &[m], &device))
//!     },
//!     &[0.0, 0.0],
//!     &[1.0, 1.0],
//!     &rule,
//!     &CubatureOptions::default(),
//! )?;
//!
//! assert!(result.success);
//! ```

mod cpu;
#[cfg(feature = "cuda")]
mod cuda;
pub mod error;
pub mod impl_generic;
pub mod traits;
#[cfg(feature = "wgpu")]
mod wgpu;

// Re-export main types for convenience
pub use error::{CubatureError, Result};
pub use impl_generic::{
    cubature_impl, roots_legendre, CubatureRule, ErrorFromDifference, FixedRule, GaussKronrod,
    GaussLegendre, GenzMalik, NewtonCotes, Product,
};
pub use traits::{
    CubatureAlgorithms, CubatureOptions, CubatureRegion, CubatureResult, CubatureStatus,
};
