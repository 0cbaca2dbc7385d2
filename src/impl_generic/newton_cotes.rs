//! Newton-Cotes cubature: equally spaced nodes with moment-matched weights.

use numr::ops::LinalgOps;
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{CubatureError, Result};

use super::rule::{CubatureRule, FixedRule};

/// Newton-Cotes rule on `npoints` equally spaced nodes.
///
/// Closed rules place nodes on a uniform grid spanning `[-1, 1]` including
/// both endpoints; open rules use the interior points of an
/// `npoints`-subinterval partition, excluding the endpoints.
///
/// Newton-Cotes has no error estimator of its own; pair two rules of
/// different order with [`ErrorFromDifference`](super::ErrorFromDifference)
/// to obtain one.
#[derive(Debug, Clone)]
pub struct NewtonCotes {
    npoints: usize,
    open: bool,
    fixed: FixedRule,
}

impl NewtonCotes {
    /// Create an `npoints`-node Newton-Cotes rule.
    ///
    /// The weights are solved from the moment conditions requiring exact
    /// integration of the monomials `x^0 .. x^(npoints-1)` over `[-1, 1]`,
    /// which needs the client's dense solver.
    pub fn new<R, C>(client: &C, npoints: usize, open: bool) -> Result<Self>
    where
        R: Runtime<DType = numr::dtype::DType>,
        C: LinalgOps<R> + RuntimeClient<R>,
    {
        if npoints < 2 {
            return Err(CubatureError::InvalidParameter {
                parameter: "npoints".to_string(),
                message: "at least 2 points required for Newton-Cotes cubature".to_string(),
            });
        }

        let nodes = if open {
            let h = 2.0 / npoints as f64;
            linspace(-1.0 + h, 1.0 - h, npoints)
        } else {
            linspace(-1.0, 1.0, npoints)
        };

        let weights = newton_cotes_weights(client, &nodes)?;

        Ok(Self {
            npoints,
            open,
            fixed: FixedRule::new(1, nodes, weights)?,
        })
    }

    /// Number of nodes.
    pub fn npoints(&self) -> usize {
        self.npoints
    }

    /// Whether the endpoints are excluded.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl CubatureRule for NewtonCotes {
    fn rule(&self) -> &FixedRule {
        &self.fixed
    }
}

fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Solve the moment system `V^T w = m` for the weights, where `V` is the
/// Vandermonde matrix of the nodes and `m_i` is the exact integral of
/// `x^i` over `[-1, 1]` (`2/(i+1)` for even `i`, zero for odd `i`).
fn newton_cotes_weights<R, C>(client: &C, nodes: &[f64]) -> Result<Vec<f64>>
where
    R: Runtime<DType = numr::dtype::DType>,
    C: LinalgOps<R> + RuntimeClient<R>,
{
    let n = nodes.len();

    // Row i holds node_j^i: the transposed Vandermonde matrix.
    let mut vt = Vec::with_capacity(n * n);
    for i in 0..n {
        for &x in nodes {
            vt.push(x.powi(i as i32));
        }
    }

    let mut moments = Vec::with_capacity(n);
    for i in 0..n {
        let p = (i + 1) as f64;
        moments.push((1.0 - (-1.0f64).powi(i as i32 + 1)) / p);
    }

    let a = Tensor::<R>::from_slice(&vt, &[n, n], client.device());
    let b = Tensor::<R>::from_slice(&moments, &[n, 1], client.device());

    let w = client.solve(&a, &b)?;
    let weights: Vec<f64> = w.to_vec();

    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_generic::ErrorFromDifference;
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    fn powers(x: &Tensor<CpuRuntime>, n: i32) -> numr::error::Result<Tensor<CpuRuntime>> {
        let data: Vec<f64> = x.to_vec();
        let out: Vec<f64> = data.iter().map(|&xi| xi.powi(n)).collect();
        Ok(Tensor::<CpuRuntime>::from_slice(
            &out,
            &[out.len()],
            x.device(),
        ))
    }

    #[test]
    fn test_closed_nodes_span_interval() {
        let (_device, client) = setup();

        let rule = NewtonCotes::new(&client, 5, false).unwrap();
        let nodes = rule.rule().nodes();
        assert_eq!(nodes.len(), 5);
        assert!((nodes[0] + 1.0).abs() < 1e-15);
        assert!((nodes[4] - 1.0).abs() < 1e-15);
        assert!((nodes[2]).abs() < 1e-15);
    }

    #[test]
    fn test_open_nodes_exclude_endpoints() {
        let (_device, client) = setup();

        // Open rule: interior points of an npoints-subinterval partition,
        // spacing h = 2/npoints.
        let rule = NewtonCotes::new(&client, 4, true).unwrap();
        let nodes = rule.rule().nodes();
        let h = 2.0 / 4.0;
        assert!((nodes[0] - (-1.0 + h)).abs() < 1e-15);
        assert!((nodes[3] - (1.0 - h)).abs() < 1e-15);
        assert!(nodes.iter().all(|&x| x > -1.0 && x < 1.0));
    }

    #[test]
    fn test_weights_sum_to_two() {
        let (_device, client) = setup();

        for &open in &[false, true] {
            for npoints in 2..=8 {
                let rule = NewtonCotes::new(&client, npoints, open).unwrap();
                let sum: f64 = rule.rule().weights().iter().sum();
                assert!(
                    (sum - 2.0).abs() < 1e-10,
                    "npoints={}, open={}, sum={}",
                    npoints,
                    open,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_exact_for_degree_n_minus_1() {
        let (_device, client) = setup();

        // An n-point rule integrates x^(n-1) exactly over [-1, 1].
        for npoints in 2..=6 {
            let rule = NewtonCotes::new(&client, npoints, false).unwrap();
            for degree in 0..npoints {
                let d = degree as i32;
                let est = rule
                    .estimate(&client, &|x| powers(x, d), &[-1.0], &[1.0])
                    .unwrap();
                let est_v: Vec<f64> = est.to_vec();

                let exact = if degree % 2 == 0 {
                    2.0 / (degree + 1) as f64
                } else {
                    0.0
                };
                assert!(
                    (est_v[0] - exact).abs() < 1e-10,
                    "npoints={}, degree={}, est={}, exact={}",
                    npoints,
                    degree,
                    est_v[0],
                    exact
                );
            }
        }
    }

    #[test]
    fn test_paired_error_estimate_small_on_smooth_integrand() {
        let (_device, client) = setup();

        let rule = ErrorFromDifference::new(
            NewtonCotes::new(&client, 10, false).unwrap(),
            NewtonCotes::new(&client, 8, false).unwrap(),
        )
        .unwrap();

        let cos = |x: &Tensor<CpuRuntime>| {
            let data: Vec<f64> = x.to_vec();
            let out: Vec<f64> = data.iter().map(|&xi| xi.cos()).collect();
            Ok(Tensor::<CpuRuntime>::from_slice(
                &out,
                &[out.len()],
                x.device(),
            ))
        };

        let est = rule.estimate(&client, &cos, &[0.0], &[1.0]).unwrap();
        let err = rule.error_estimate(&client, &cos, &[0.0], &[1.0]).unwrap();

        let est_v: Vec<f64> = est.to_vec();
        let err_v: Vec<f64> = err.to_vec();

        assert!((est_v[0] - 1.0f64.sin()).abs() < 1e-9);
        assert!(err_v[0] < 1e-6);
    }

    #[test]
    fn test_rejects_too_few_points() {
        let (_device, client) = setup();

        assert!(matches!(
            NewtonCotes::new(&client, 1, false),
            Err(CubatureError::InvalidParameter { .. })
        ));
        assert!(matches!(
            NewtonCotes::new(&client, 0, true),
            Err(CubatureError::InvalidParameter { .. })
        ));
    }
}
