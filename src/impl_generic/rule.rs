//! Fixed cubature rules and the rule capability trait.
//!
//! A fixed rule is a `(nodes, weights)` pair on the reference region
//! `[-1, 1]^d`. Node and weight construction is scalar host code; the
//! weighted evaluation maps the nodes onto the target hyperrectangle,
//! batches them into a single `(d, m)` tensor and reduces with tensor ops.

use numr::ops::{ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{CubatureError, Result};

/// A `(nodes, weights)` pair on the reference region `[-1, 1]^d`.
///
/// Nodes are stored row-major with shape `(ndim, npoints)`: axis 0 is the
/// spatial dimension, axis 1 the evaluation point. For any rule that
/// integrates the constant function exactly, the weights sum to `2^ndim`.
#[derive(Debug, Clone)]
pub struct FixedRule {
    ndim: usize,
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl FixedRule {
    /// Create a fixed rule from reference nodes and weights.
    ///
    /// `nodes` must hold `ndim * weights.len()` values in `(ndim, npoints)`
    /// row-major order.
    pub fn new(ndim: usize, nodes: Vec<f64>, weights: Vec<f64>) -> Result<Self> {
        if ndim == 0 {
            return Err(CubatureError::InvalidParameter {
                parameter: "ndim".to_string(),
                message: "rule dimension must be at least 1".to_string(),
            });
        }

        if nodes.len() != ndim * weights.len() {
            return Err(CubatureError::InvalidParameter {
                parameter: "nodes".to_string(),
                message: format!(
                    "expected {} node coordinates for {} weights in dimension {}, got {}",
                    ndim * weights.len(),
                    weights.len(),
                    ndim,
                    nodes.len()
                ),
            });
        }

        Ok(Self {
            ndim,
            nodes,
            weights,
        })
    }

    /// Spatial dimension of the rule.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Number of evaluation points.
    pub fn npoints(&self) -> usize {
        self.weights.len()
    }

    /// Reference nodes, `(ndim, npoints)` row-major.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights, one per evaluation point.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weighted sum of integrand evaluations over the hyperrectangle `[a, b]`.
    ///
    /// The reference nodes are mapped by `node' = (node + 1) * (b - a)/2 + a`
    /// per axis and the weights are scaled by the Jacobian determinant
    /// `prod((b[i] - a[i]) / 2)` of that change of coordinates. The integrand
    /// receives a `(ndim, npoints)` tensor and must return values whose last
    /// axis has length `npoints`; the result is the weighted sum over that
    /// axis.
    pub fn apply<R, C, F>(&self, client: &C, f: &F, a: &[f64], b: &[f64]) -> Result<Tensor<R>>
    where
        R: Runtime<DType = numr::dtype::DType>,
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
        F: Fn(&Tensor<R>) -> numr::error::Result<Tensor<R>>,
    {
        if self.ndim != a.len() || self.ndim != b.len() {
            return Err(CubatureError::DimensionMismatch {
                rule_ndim: self.ndim,
                a_ndim: a.len(),
                b_ndim: b.len(),
            });
        }

        let npoints = self.npoints();

        // Map the reference nodes from [-1, 1]^d onto [a, b].
        let mut mapped = Vec::with_capacity(self.nodes.len());
        for i in 0..self.ndim {
            let half_width = (b[i] - a[i]) / 2.0;
            for &x in &self.nodes[i * npoints..(i + 1) * npoints] {
                mapped.push((x + 1.0) * half_width + a[i]);
            }
        }

        // Jacobian determinant of the coordinate change.
        let scale: f64 = a
            .iter()
            .zip(b.iter())
            .map(|(&lo, &hi)| (hi - lo) / 2.0)
            .product();

        let x = Tensor::<R>::from_slice(&mapped, &[self.ndim, npoints], client.device());
        let values = f(&x)?;

        let out_shape = values.shape().to_vec();
        if out_shape.last() != Some(&npoints) {
            return Err(CubatureError::InvalidInput {
                context: format!(
                    "integrand returned shape {:?}, expected the last axis to have \
                     length {} (one value per evaluation point)",
                    out_shape, npoints
                ),
            });
        }

        let weights = Tensor::<R>::from_slice(&self.weights, &[npoints], client.device());
        let weighted = client.mul(&values, &weights.broadcast_to(&out_shape)?)?;
        let summed = client.sum(&weighted, &[out_shape.len() - 1], false)?;

        Ok(client.mul_scalar(&summed, scale)?)
    }
}

/// A cubature rule: an estimate of the integral over a hyperrectangle,
/// optionally paired with a lower-order rule for error estimation.
///
/// Concrete rules only provide their `(nodes, weights)` pairs; `estimate`
/// and `error_estimate` are derived. The error estimate evaluates the
/// integrand once over the concatenation of the higher and lower node
/// sets with the lower weights negated, which is numerically identical to
/// `|H(f) - L(f)|` without a second pass over the shared nodes.
pub trait CubatureRule {
    /// Reference nodes and weights used for the integral estimate.
    fn rule(&self) -> &FixedRule;

    /// Lower-order companion used for error estimation, if the rule has one.
    fn lower_rule(&self) -> Option<&FixedRule> {
        None
    }

    /// Estimate of the integral of `f` over `[a, b]`.
    fn estimate<R, C, F>(&self, client: &C, f: &F, a: &[f64], b: &[f64]) -> Result<Tensor<R>>
    where
        Self: Sized,
        R: Runtime<DType = numr::dtype::DType>,
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
        F: Fn(&Tensor<R>) -> numr::error::Result<Tensor<R>>,
    {
        self.rule().apply(client, f, a, b)
    }

    /// Estimate of the error of this rule for the integral of `f` over
    /// `[a, b]`.
    ///
    /// Fails with [`CubatureError::ErrorEstimateUnsupported`] when the rule
    /// has no lower-order companion.
    fn error_estimate<R, C, F>(&self, client: &C, f: &F, a: &[f64], b: &[f64]) -> Result<Tensor<R>>
    where
        Self: Sized,
        R: Runtime<DType = numr::dtype::DType>,
        C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
        F: Fn(&Tensor<R>) -> numr::error::Result<Tensor<R>>,
    {
        let lower = self
            .lower_rule()
            .ok_or(CubatureError::ErrorEstimateUnsupported)?;

        let signed = difference_rule(self.rule(), lower)?.apply(client, f, a, b)?;
        Ok(client.abs(&signed)?)
    }
}

/// Concatenate a higher and lower rule into the single-pass difference rule:
/// nodes `H ++ L`, weights `w_H ++ (-w_L)`.
pub(crate) fn difference_rule(higher: &FixedRule, lower: &FixedRule) -> Result<FixedRule> {
    if higher.ndim() != lower.ndim() {
        return Err(CubatureError::InvalidParameter {
            parameter: "lower".to_string(),
            message: format!(
                "higher and lower rules have mismatched dimensions ({} vs {})",
                higher.ndim(),
                lower.ndim()
            ),
        });
    }

    let ndim = higher.ndim();
    let (hm, lm) = (higher.npoints(), lower.npoints());

    let mut nodes = Vec::with_capacity(ndim * (hm + lm));
    for i in 0..ndim {
        nodes.extend_from_slice(&higher.nodes[i * hm..(i + 1) * hm]);
        nodes.extend_from_slice(&lower.nodes[i * lm..(i + 1) * lm]);
    }

    let mut weights = Vec::with_capacity(hm + lm);
    weights.extend_from_slice(&higher.weights);
    weights.extend(lower.weights.iter().map(|&w| -w));

    FixedRule::new(ndim, nodes, weights)
}

/// A rule with error estimation given by the difference between two
/// underlying rules of different order.
///
/// This gives error estimation to rules that have none of their own, such
/// as [`NewtonCotes`](super::NewtonCotes) or
/// [`GaussLegendre`](super::GaussLegendre):
///
/// ```ignore
/// let rule = ErrorFromDifference::new(
///     NewtonCotes::new(&client, 10, false)?,
///     NewtonCotes::new(&client, 8, false)?,
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct ErrorFromDifference<H, L> {
    higher: H,
    lower: L,
}

impl<H: CubatureRule, L: CubatureRule> ErrorFromDifference<H, L> {
    /// Pair a higher- and lower-order rule of the same dimension.
    pub fn new(higher: H, lower: L) -> Result<Self> {
        if higher.rule().ndim() != lower.rule().ndim() {
            return Err(CubatureError::InvalidParameter {
                parameter: "lower".to_string(),
                message: format!(
                    "higher and lower rules have mismatched dimensions ({} vs {})",
                    higher.rule().ndim(),
                    lower.rule().ndim()
                ),
            });
        }

        Ok(Self { higher, lower })
    }
}

impl<H: CubatureRule, L: CubatureRule> CubatureRule for ErrorFromDifference<H, L> {
    fn rule(&self) -> &FixedRule {
        self.higher.rule()
    }

    fn lower_rule(&self) -> Option<&FixedRule> {
        Some(self.lower.rule())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    /// 1-D midpoint rule as a minimal custom fixed rule.
    fn midpoint() -> FixedRule {
        FixedRule::new(1, vec![0.0], vec![2.0]).unwrap()
    }

    struct Midpoint {
        fixed: FixedRule,
    }

    impl CubatureRule for Midpoint {
        fn rule(&self) -> &FixedRule {
            &self.fixed
        }
    }

    #[test]
    fn test_constant_integrates_to_volume() {
        let (device, client) = setup();

        let rule = midpoint();
        let result = rule
            .apply(
                &client,
                &|x: &Tensor<CpuRuntime>| {
                    let m = x.shape()[1];
                    Ok(Tensor::<CpuRuntime>::from_slice(
                        &vec![1.0; m],
                        &[m],
                        &device,
                    ))
                },
                &[3.0],
                &[7.0],
            )
            .unwrap();

        let values: Vec<f64> = result.to_vec();
        assert!((values[0] - 4.0).abs() < 1e-14);
    }

    #[test]
    fn test_apply_dimension_mismatch() {
        let (_device, client) = setup();

        let rule = midpoint();
        let result = rule.apply(
            &client,
            &|x: &Tensor<CpuRuntime>| Ok(x.clone()),
            &[0.0, 0.0],
            &[1.0, 1.0],
        );

        assert!(matches!(
            result,
            Err(CubatureError::DimensionMismatch {
                rule_ndim: 1,
                a_ndim: 2,
                b_ndim: 2,
            })
        ));
    }

    #[test]
    fn test_apply_rejects_bad_integrand_shape() {
        let (device, client) = setup();

        let rule = midpoint();
        let result = rule.apply(
            &client,
            &|_x: &Tensor<CpuRuntime>| {
                Ok(Tensor::<CpuRuntime>::from_slice(&[1.0, 2.0], &[2], &device))
            },
            &[0.0],
            &[1.0],
        );

        assert!(matches!(result, Err(CubatureError::InvalidInput { .. })));
    }

    #[test]
    fn test_error_estimate_unsupported() {
        let (device, client) = setup();

        let rule = Midpoint { fixed: midpoint() };
        let result = rule.error_estimate(
            &client,
            &|x: &Tensor<CpuRuntime>| {
                let m = x.shape()[1];
                Ok(Tensor::<CpuRuntime>::from_slice(
                    &vec![1.0; m],
                    &[m],
                    &device,
                ))
            },
            &[0.0],
            &[1.0],
        );

        assert!(matches!(
            result,
            Err(CubatureError::ErrorEstimateUnsupported)
        ));
    }

    #[test]
    fn test_difference_rule_concatenates() {
        let two_point = FixedRule::new(1, vec![-0.5, 0.5], vec![1.0, 1.0]).unwrap();
        let diff = difference_rule(&two_point, &midpoint()).unwrap();

        assert_eq!(diff.npoints(), 3);
        assert_eq!(diff.nodes(), &[-0.5, 0.5, 0.0]);
        assert_eq!(diff.weights(), &[1.0, 1.0, -2.0]);
    }

    #[test]
    fn test_error_from_difference_exact_on_constants() {
        let (device, client) = setup();

        // Both rules integrate constants exactly, so the error estimate of
        // their difference on a constant integrand is zero.
        let two_point = Midpoint {
            fixed: FixedRule::new(1, vec![-0.5, 0.5], vec![1.0, 1.0]).unwrap(),
        };
        let one_point = Midpoint { fixed: midpoint() };
        let paired = ErrorFromDifference::new(two_point, one_point).unwrap();

        let err = paired
            .error_estimate(
                &client,
                &|x: &Tensor<CpuRuntime>| {
                    let m = x.shape()[1];
                    Ok(Tensor::<CpuRuntime>::from_slice(
                        &vec![3.0; m],
                        &[m],
                        &device,
                    ))
                },
                &[0.0],
                &[2.0],
            )
            .unwrap();

        let err_v: Vec<f64> = err.to_vec();
        assert!(err_v[0].abs() < 1e-14);
    }

    #[test]
    fn test_error_from_difference_rejects_mixed_dimensions() {
        let rule_1d = Midpoint { fixed: midpoint() };
        let rule_2d = Midpoint {
            fixed: FixedRule::new(2, vec![0.0, 0.0], vec![4.0]).unwrap(),
        };

        assert!(matches!(
            ErrorFromDifference::new(rule_1d, rule_2d),
            Err(CubatureError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fixed_rule_validates_lengths() {
        assert!(FixedRule::new(2, vec![0.0; 5], vec![1.0, 1.0]).is_err());
        assert!(FixedRule::new(0, vec![], vec![]).is_err());
    }
}
