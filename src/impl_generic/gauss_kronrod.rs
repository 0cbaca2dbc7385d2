//! Gauss-Kronrod cubature.
//!
//! The classical embedded pair: a Kronrod extension supplies the integral
//! estimate and the underlying Gauss-Legendre rule of half the order
//! supplies the companion for error estimation. Node and weight tables
//! follow QUADPACK (dqk15.f, dqk21.f).

use crate::error::{CubatureError, Result};

use super::gauss_legendre::GaussLegendre;
use super::rule::{CubatureRule, FixedRule};

const K15_NODES: [f64; 15] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144838258730,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
    -0.207784955007898467600689403773245,
    -0.405845151377397166906606412076961,
    -0.586087235467691130294144838258730,
    -0.741531185599394439863864773280788,
    -0.864864423359769072789712788640926,
    -0.949107912342758524526189684047851,
    -0.991455371120812639206854697526329,
];

const K15_WEIGHTS: [f64; 15] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
    0.204432940075298892414161999234649,
    0.190350578064785409913256402421014,
    0.169004726639267902826583426598550,
    0.140653259715525918745189590510238,
    0.104790010322250183839876322541518,
    0.063092092629978553290700663189204,
    0.022935322010529224963732008058970,
];

const K21_NODES: [f64; 21] = [
    0.995657163025808080735527280689003,
    0.973906528517171720077964012084452,
    0.930157491355708226001207180059508,
    0.865063366688984510732096688423493,
    0.780817726586416897063717578345042,
    0.679409568299024406234327365114874,
    0.562757134668604683339000099272694,
    0.433395394129247190799265943165784,
    0.294392862701460198131126603103866,
    0.148874338981631210884826001129720,
    0.0,
    -0.148874338981631210884826001129720,
    -0.294392862701460198131126603103866,
    -0.433395394129247190799265943165784,
    -0.562757134668604683339000099272694,
    -0.679409568299024406234327365114874,
    -0.780817726586416897063717578345042,
    -0.865063366688984510732096688423493,
    -0.930157491355708226001207180059508,
    -0.973906528517171720077964012084452,
    -0.995657163025808080735527280689003,
];

const K21_WEIGHTS: [f64; 21] = [
    0.011694638867371874278064396062192,
    0.032558162307964727478818972459390,
    0.054755896574351996031381300244580,
    0.075039674810919952767043140916190,
    0.093125454583697605535065465083366,
    0.109387158802297641899210590325805,
    0.123491976262065851077958109831074,
    0.134709217311473325928054001771707,
    0.142775938577060080797094273138717,
    0.147739104901338491374841515972068,
    0.149445554002916905664936468389821,
    0.147739104901338491374841515972068,
    0.142775938577060080797094273138717,
    0.134709217311473325928054001771707,
    0.123491976262065851077958109831074,
    0.109387158802297641899210590325805,
    0.093125454583697605535065465083366,
    0.075039674810919952767043140916190,
    0.054755896574351996031381300244580,
    0.032558162307964727478818972459390,
    0.011694638867371874278064396062192,
];

/// Gauss-Kronrod rule with `npoints` nodes, `npoints` in {15, 21}.
///
/// The higher-order Kronrod table estimates the integral; the lower rule
/// is the `npoints/2`-node Gauss-Legendre rule whose nodes the Kronrod
/// extension embeds, and the error is the single-pass difference of the
/// two.
#[derive(Debug, Clone)]
pub struct GaussKronrod {
    npoints: usize,
    fixed: FixedRule,
    lower: FixedRule,
}

impl GaussKronrod {
    /// Create an `npoints`-node Gauss-Kronrod rule (15 or 21 nodes).
    pub fn new(npoints: usize) -> Result<Self> {
        let (nodes, weights): (&[f64], &[f64]) = match npoints {
            15 => (&K15_NODES, &K15_WEIGHTS),
            21 => (&K21_NODES, &K21_WEIGHTS),
            _ => {
                return Err(CubatureError::InvalidParameter {
                    parameter: "npoints".to_string(),
                    message: "Gauss-Kronrod cubature is only supported for 15 or 21 nodes"
                        .to_string(),
                });
            }
        };

        let lower = GaussLegendre::new(npoints / 2)?;

        Ok(Self {
            npoints,
            fixed: FixedRule::new(1, nodes.to_vec(), weights.to_vec())?,
            lower: lower.rule().clone(),
        })
    }

    /// Number of nodes of the higher-order rule.
    pub fn npoints(&self) -> usize {
        self.npoints
    }
}

impl CubatureRule for GaussKronrod {
    fn rule(&self) -> &FixedRule {
        &self.fixed
    }

    fn lower_rule(&self) -> Option<&FixedRule> {
        Some(&self.lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};
    use numr::tensor::Tensor;

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    fn cos(x: &Tensor<CpuRuntime>) -> numr::error::Result<Tensor<CpuRuntime>> {
        let data: Vec<f64> = x.to_vec();
        let out: Vec<f64> = data.iter().map(|&xi| xi.cos()).collect();
        Ok(Tensor::<CpuRuntime>::from_slice(
            &out,
            &[out.len()],
            x.device(),
        ))
    }

    #[test]
    fn test_weights_sum_to_two() {
        for &npoints in &[15, 21] {
            let rule = GaussKronrod::new(npoints).unwrap();
            let sum: f64 = rule.rule().weights().iter().sum();
            assert!((sum - 2.0).abs() < 1e-12, "npoints={}, sum={}", npoints, sum);

            let lower_sum: f64 = rule.lower_rule().unwrap().weights().iter().sum();
            assert!((lower_sum - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lower_rule_is_half_order_gauss() {
        let rule = GaussKronrod::new(21).unwrap();
        assert_eq!(rule.lower_rule().unwrap().npoints(), 10);

        let rule = GaussKronrod::new(15).unwrap();
        assert_eq!(rule.lower_rule().unwrap().npoints(), 7);

        // Every Gauss node appears in the Kronrod table.
        let kronrod = rule.rule().nodes();
        for &g in rule.lower_rule().unwrap().nodes() {
            assert!(
                kronrod.iter().any(|&k| (k - g).abs() < 1e-9),
                "Gauss node {} missing from Kronrod extension",
                g
            );
        }
    }

    #[test]
    fn test_estimate_cos() {
        let (_device, client) = setup();

        // True value sin(1), approximately 0.84147.
        let rule = GaussKronrod::new(21).unwrap();
        let est = rule.estimate(&client, &cos, &[0.0], &[1.0]).unwrap();
        let est_v: Vec<f64> = est.to_vec();
        assert!((est_v[0] - 1.0f64.sin()).abs() < 1e-14);

        let err = rule.error_estimate(&client, &cos, &[0.0], &[1.0]).unwrap();
        let err_v: Vec<f64> = err.to_vec();
        assert!(err_v[0] < 1e-13);
    }

    #[test]
    fn test_rejects_unsupported_sizes() {
        for npoints in [0, 2, 7, 14, 16, 20, 31] {
            assert!(matches!(
                GaussKronrod::new(npoints),
                Err(CubatureError::InvalidParameter { .. })
            ));
        }
    }
}
