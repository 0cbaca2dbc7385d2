use numr::runtime::Runtime;
use numr::tensor::Tensor;

use crate::error::Result;
use crate::impl_generic::CubatureRule;

use super::{CubatureOptions, CubatureResult};

/// Trait for adaptive cubature over all Runtime backends.
///
/// Estimates the integral of a tensor-valued function over the
/// hyperrectangle `[a, b]` with any rule that implements error
/// estimation, refining the worst subregion until the tolerance is met
/// or the subdivision budget runs out.
///
/// # Example
///
/// ```ignore
/// use cubr::{CubatureAlgorithms, CubatureOptions, GaussKronrod};
/// use numr::runtime::cpu::{CpuClient, CpuDevice};
///
/// let device = CpuDevice::new();
/// let client = CpuClient::new(device.clone());
///
/// // Integrate cos(x) over [0, 1]; the integrand receives points of
/// // shape (1, m) and returns values of shape (m,).
/// let rule = GaussKronrod::new(21)?;
/// let res = client.cubature(
///     |x| {
///         let data: Vec<f64> = x.to_vec();
///         let cos: Vec<f64> = data.iter().map(|&xi| xi.cos()).collect();
///         Ok(Tensor::from_slice(&cos, &[cos.len()], x.device()))
///     },
///     &[0.0],
///     &[1.0],
///     &rule,
///     &CubatureOptions::default(),
/// )?;
/// assert!(res.success);
/// ```
pub trait CubatureAlgorithms<R: Runtime> {
    /// Adaptive cubature of `f` over the hyperrectangle `[a, b]`.
    ///
    /// # Arguments
    /// * `f` - Integrand; receives evaluation points of shape `(d, m)`
    ///   and returns values of shape `(out_1, ..., out_k, m)`
    /// * `a` - Lower bounds, one per axis
    /// * `b` - Upper bounds, one per axis
    /// * `rule` - Cubature rule with error estimation
    /// * `options` - Tolerances and subdivision budget
    ///
    /// # Returns
    /// A [`CubatureResult`] with the estimate, error, convergence status
    /// and the residual region set.
    fn cubature<K, F>(
        &self,
        f: F,
        a: &[f64],
        b: &[f64],
        rule: &K,
        options: &CubatureOptions,
    ) -> Result<CubatureResult<R>>
    where
        K: CubatureRule,
        F: Fn(&Tensor<R>) -> numr::error::Result<Tensor<R>>;
}
