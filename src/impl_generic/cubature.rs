//! Adaptive subdivision driver.
//!
//! Maintains a max-heap of regions keyed on the max-norm of their error
//! estimates and a pair of global accumulators equal to the sum over all
//! live regions. Each iteration pops the worst region, removes its
//! contribution, bisects it at the midpoint along every axis and adds the
//! `2^d` children back, until every output component passes the tolerance
//! test or the subdivision budget runs out.

use std::collections::BinaryHeap;

use numr::ops::{ScalarOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

use crate::error::{CubatureError, Result};
use crate::traits::{CubatureOptions, CubatureRegion, CubatureResult, CubatureStatus};

use super::rule::CubatureRule;

/// Adaptive cubature of `f` over the hyperrectangle `[a, b]`.
///
/// The rule must implement error estimation; rules without it are rejected
/// before any refinement starts. Running out of the subdivision budget is
/// not an error: the result then carries `success = false`,
/// `status = NotConverged` and the best estimate accumulated so far.
pub fn cubature_impl<R, C, K, F>(
    client: &C,
    f: F,
    a: &[f64],
    b: &[f64],
    rule: &K,
    options: &CubatureOptions,
) -> Result<CubatureResult<R>>
where
    R: Runtime<DType = numr::dtype::DType>,
    C: TensorOps<R> + ScalarOps<R> + RuntimeClient<R>,
    K: CubatureRule,
    F: Fn(&Tensor<R>) -> numr::error::Result<Tensor<R>>,
{
    if a.len() != b.len() {
        return Err(CubatureError::DimensionMismatch {
            rule_ndim: rule.rule().ndim(),
            a_ndim: a.len(),
            b_ndim: b.len(),
        });
    }

    for (axis, (&lo, &hi)) in a.iter().zip(b.iter()).enumerate() {
        if lo > hi {
            return Err(CubatureError::InvalidInterval { axis, a: lo, b: hi });
        }
    }

    let mut est = rule.estimate(client, &f, a, b)?;
    let mut err = match rule.error_estimate(client, &f, a, b) {
        Ok(e) => e,
        Err(CubatureError::ErrorEstimateUnsupported) => {
            return Err(CubatureError::InvalidRule {
                message: "attempting cubature with a rule that does not implement error \
                          estimation"
                    .to_string(),
            });
        }
        Err(other) => return Err(other),
    };

    let mut regions = BinaryHeap::new();
    regions.push(CubatureRegion::new(
        est.clone(),
        err.clone(),
        a.to_vec(),
        b.to_vec(),
    ));

    let mut subdivisions = 0;
    let mut success = true;

    while violates_tolerance(&est, &err, options.atol, options.rtol) {
        // The region with the largest max-norm error is refined first.
        let Some(region) = regions.pop() else {
            break;
        };

        // Remove this region's contribution; it is replaced by the more
        // accurate contributions of its children below.
        est = client.sub(&est, &region.estimate)?;
        err = client.sub(&err, &region.error)?;

        for (a_sub, b_sub) in subregion_coordinates(&region.a, &region.b) {
            let est_sub = rule.estimate(client, &f, &a_sub, &b_sub)?;
            let err_sub = rule.error_estimate(client, &f, &a_sub, &b_sub)?;

            est = client.add(&est, &est_sub)?;
            err = client.add(&err, &err_sub)?;

            regions.push(CubatureRegion::new(est_sub, err_sub, a_sub, b_sub));
        }

        subdivisions += 1;

        if let Some(limit) = options.max_subdivisions {
            if subdivisions >= limit {
                success = false;
                break;
            }
        }
    }

    let status = if success {
        CubatureStatus::Converged
    } else {
        CubatureStatus::NotConverged
    };

    Ok(CubatureResult {
        estimate: est,
        error: err,
        success,
        status,
        subdivisions,
        regions: regions.into_vec(),
        atol: options.atol,
        rtol: options.rtol,
    })
}

/// Elementwise convergence test: true while any output component has
/// `error > atol + rtol * |estimate|`.
fn violates_tolerance<R: Runtime>(est: &Tensor<R>, err: &Tensor<R>, atol: f64, rtol: f64) -> bool {
    let est_v: Vec<f64> = est.to_vec();
    let err_v: Vec<f64> = err.to_vec();

    err_v
        .iter()
        .zip(est_v.iter())
        .any(|(&e, &v)| e > atol + rtol * v.abs())
}

/// The `2^d` subregions obtained by bisecting `[a, b]` at its midpoint
/// along every axis. The children partition the parent exactly: each axis
/// splits into `[a[i], m[i]]` and `[m[i], b[i]]` with the same
/// floating-point midpoint on both sides.
pub(crate) fn subregion_coordinates(a: &[f64], b: &[f64]) -> Vec<(Vec<f64>, Vec<f64>)> {
    let d = a.len();
    let mid: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(&lo, &hi)| (lo + hi) / 2.0)
        .collect();

    (0..1usize << d)
        .map(|mask| {
            let mut lo = Vec::with_capacity(d);
            let mut hi = Vec::with_capacity(d);

            for i in 0..d {
                if mask & (1 << i) == 0 {
                    lo.push(a[i]);
                    hi.push(mid[i]);
                } else {
                    lo.push(mid[i]);
                    hi.push(b[i]);
                }
            }

            (lo, hi)
        })
        .collect()
}
