//! Gauss-Legendre cubature.
//!
//! An n-point Gauss-Legendre rule integrates polynomials of degree 2n-1
//! exactly. The rule has no error estimator of its own; pair two rules of
//! different order with [`ErrorFromDifference`](super::ErrorFromDifference)
//! to obtain one, or take a [`Product`](super::Product) for
//! multidimensional integrals.

use crate::error::{CubatureError, Result};

use super::rule::{CubatureRule, FixedRule};

/// Classical Gauss-Legendre nodes and weights of degree `n` on `[-1, 1]`.
///
/// Roots of the Legendre polynomial found by Newton iteration from
/// Chebyshev initial guesses, weights from the derivative at each root.
/// A pure function of `n`.
pub fn roots_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];

    let m = n.div_ceil(2);

    for i in 0..m {
        // Initial guess using Chebyshev approximation
        let mut z = ((i as f64 + 0.75) / (n as f64 + 0.5) * std::f64::consts::PI).cos();

        // Newton iteration to find root of Legendre polynomial
        loop {
            let (p, dp) = legendre_p_and_dp(n, z);
            let z_new = z - p / dp;

            if (z_new - z).abs() < 1e-15 {
                z = z_new;
                break;
            }
            z = z_new;
        }

        let (_, dp) = legendre_p_and_dp(n, z);
        let w = 2.0 / ((1.0 - z * z) * dp * dp);

        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    (nodes, weights)
}

/// Evaluate Legendre polynomial P_n(x) and its derivative.
fn legendre_p_and_dp(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    if n == 1 {
        return (x, 1.0);
    }

    let mut p_prev = 1.0;
    let mut p_curr = x;

    for k in 2..=n {
        let p_next = ((2 * k - 1) as f64 * x * p_curr - (k - 1) as f64 * p_prev) / k as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    // Derivative: P'_n(x) = n * (x * P_n - P_{n-1}) / (x^2 - 1)
    let dp = n as f64 * (x * p_curr - p_prev) / (x * x - 1.0);

    (p_curr, dp)
}

/// Gauss-Legendre rule with `npoints` nodes on `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct GaussLegendre {
    npoints: usize,
    fixed: FixedRule,
}

impl GaussLegendre {
    /// Create an `npoints`-node Gauss-Legendre rule.
    pub fn new(npoints: usize) -> Result<Self> {
        if npoints < 2 {
            return Err(CubatureError::InvalidParameter {
                parameter: "npoints".to_string(),
                message: "at least 2 nodes required for Gauss-Legendre cubature".to_string(),
            });
        }

        let (nodes, weights) = roots_legendre(npoints);

        Ok(Self {
            npoints,
            fixed: FixedRule::new(1, nodes, weights)?,
        })
    }

    /// Number of nodes.
    pub fn npoints(&self) -> usize {
        self.npoints
    }
}

impl CubatureRule for GaussLegendre {
    fn rule(&self) -> &FixedRule {
        &self.fixed
    }
}
