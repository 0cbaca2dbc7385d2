//! Cartesian-product composition of cubature rules.

use crate::error::{CubatureError, Result};

use super::rule::{CubatureRule, FixedRule};

/// The n-dimensional rule built from the Cartesian product of error-capable
/// factor rules.
///
/// Product nodes are every combination of the factors' nodes (the first
/// factor varies slowest); each product weight is the product of the
/// corresponding factor weights. The lower-order companion is built the
/// same way from each factor's lower rule, so every factor must implement
/// error estimation.
///
/// ```ignore
/// // 2-D rule from two 15-point Gauss-Kronrod rules.
/// let gk = GaussKronrod::new(15)?;
/// let rule = Product::new(&[&gk, &gk])?;
/// ```
#[derive(Debug, Clone)]
pub struct Product {
    fixed: FixedRule,
    lower: FixedRule,
}

impl Product {
    /// Compose the Cartesian product of `factors`.
    pub fn new(factors: &[&dyn CubatureRule]) -> Result<Self> {
        if factors.is_empty() {
            return Err(CubatureError::InvalidParameter {
                parameter: "factors".to_string(),
                message: "at least one factor rule is required".to_string(),
            });
        }

        let higher: Vec<&FixedRule> = factors.iter().map(|r| r.rule()).collect();

        let mut lower = Vec::with_capacity(factors.len());
        for (i, factor) in factors.iter().enumerate() {
            lower.push(factor.lower_rule().ok_or_else(|| {
                CubatureError::InvalidParameter {
                    parameter: "factors".to_string(),
                    message: format!("factor {} does not implement error estimation", i),
                }
            })?);
        }

        Ok(Self {
            fixed: cartesian_product(&higher)?,
            lower: cartesian_product(&lower)?,
        })
    }
}

impl CubatureRule for Product {
    fn rule(&self) -> &FixedRule {
        &self.fixed
    }

    fn lower_rule(&self) -> Option<&FixedRule> {
        Some(&self.lower)
    }
}

/// Cartesian product of the factors' nodes and elementwise product of
/// their weights.
///
/// Combined point `p` decomposes in mixed radix over the factor sizes with
/// the first factor's index varying slowest; nodes and weights share the
/// decomposition, so they cannot fall out of alignment.
fn cartesian_product(factors: &[&FixedRule]) -> Result<FixedRule> {
    let ndim: usize = factors.iter().map(|f| f.ndim()).sum();
    let npoints: usize = factors.iter().map(|f| f.npoints()).product();

    let mut nodes = vec![0.0; ndim * npoints];
    let mut weights = vec![1.0; npoints];

    let mut block = npoints;
    let mut dim_offset = 0;

    for factor in factors {
        let m = factor.npoints();
        block /= m;

        for p in 0..npoints {
            let idx = (p / block) % m;
            weights[p] *= factor.weights()[idx];

            for i in 0..factor.ndim() {
                nodes[(dim_offset + i) * npoints + p] = factor.nodes()[i * m + idx];
            }
        }

        dim_offset += factor.ndim();
    }

    FixedRule::new(ndim, nodes, weights)
}
