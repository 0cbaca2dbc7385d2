//! Types for adaptive cubature.

use std::cmp::Ordering;
use std::fmt;

use numr::runtime::Runtime;
use numr::tensor::Tensor;

/// Options for adaptive cubature.
#[derive(Debug, Clone)]
pub struct CubatureOptions {
    /// Relative tolerance (default: 1e-5)
    pub rtol: f64,
    /// Absolute tolerance (default: 1e-8)
    pub atol: f64,
    /// Maximum number of subdivisions (default: 10,000; `None` = unbounded)
    pub max_subdivisions: Option<usize>,
}

impl Default for CubatureOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-5,
            atol: 1e-8,
            max_subdivisions: Some(10_000),
        }
    }
}

impl CubatureOptions {
    /// Options with custom tolerances and the default subdivision budget.
    pub fn with_tolerances(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Default::default()
        }
    }
}

/// Terminal state of the adaptive driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubatureStatus {
    /// Every output component satisfies `error <= atol + rtol * |estimate|`.
    Converged,
    /// The subdivision budget ran out first; the result is best-effort.
    NotConverged,
}

impl CubatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::NotConverged => "not_converged",
        }
    }
}

impl fmt::Display for CubatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subregion together with the integral and error estimated over it.
///
/// Regions order by the max-norm of their error estimate, largest first,
/// so a `BinaryHeap` serves the worst region at the top.
#[derive(Debug, Clone)]
pub struct CubatureRegion<R: Runtime> {
    /// Estimated integral over `[a, b]`.
    pub estimate: Tensor<R>,
    /// Elementwise error estimate, same shape as `estimate`.
    pub error: Tensor<R>,
    /// Lower bounds per axis.
    pub a: Vec<f64>,
    /// Upper bounds per axis.
    pub b: Vec<f64>,
    max_error: f64,
}

impl<R: Runtime> CubatureRegion<R> {
    pub(crate) fn new(estimate: Tensor<R>, error: Tensor<R>, a: Vec<f64>, b: Vec<f64>) -> Self {
        let err_data: Vec<f64> = error.to_vec();
        let max_error = err_data.iter().fold(0.0f64, |acc, &e| acc.max(e.abs()));

        Self {
            estimate,
            error,
            a,
            b,
            max_error,
        }
    }

    /// Max-norm of the error estimate, the priority key for refinement.
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Volume of the region's hyperrectangle.
    pub fn volume(&self) -> f64 {
        self.a
            .iter()
            .zip(self.b.iter())
            .map(|(&lo, &hi)| hi - lo)
            .product()
    }
}

impl<R: Runtime> PartialEq for CubatureRegion<R> {
    fn eq(&self, other: &Self) -> bool {
        self.max_error == other.max_error
    }
}

impl<R: Runtime> Eq for CubatureRegion<R> {}

impl<R: Runtime> PartialOrd for CubatureRegion<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Runtime> Ord for CubatureRegion<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.max_error.total_cmp(&other.max_error)
    }
}

/// Result of adaptive cubature.
#[derive(Debug, Clone)]
pub struct CubatureResult<R: Runtime> {
    /// Estimated integral, shaped like the integrand output minus the
    /// trailing evaluation-point axis.
    pub estimate: Tensor<R>,
    /// Elementwise error estimate, same shape as `estimate`.
    pub error: Tensor<R>,
    /// Whether the tolerance was met within the subdivision budget.
    pub success: bool,
    /// Terminal state, `"converged"` or `"not_converged"`.
    pub status: CubatureStatus,
    /// Number of subdivisions performed.
    pub subdivisions: usize,
    /// The residual region set at termination.
    pub regions: Vec<CubatureRegion<R>>,
    /// Absolute tolerance used.
    pub atol: f64,
    /// Relative tolerance used.
    pub rtol: f64,
}
