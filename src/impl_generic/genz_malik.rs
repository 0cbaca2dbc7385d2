//! Genz-Malik cubature.
//!
//! A true multidimensional rule (not a product of 1-D rules): the degree-7
//! rule and its embedded degree-5 companion share five symmetric node
//! families with closed-form weights in the dimension. Defined only for
//! `ndim >= 2`.
//!
//! Reference: A.C. Genz, A.A. Malik, Remarks on algorithm 006: An adaptive
//! algorithm for numerical integration over an N-dimensional rectangular
//! region, J. Comput. Appl. Math. 6 (1980) 295-302.

use crate::error::{CubatureError, Result};

use super::rule::{CubatureRule, FixedRule};

/// Genz-Malik embedded degree-7/5 rule in `ndim >= 2` dimensions.
#[derive(Debug, Clone)]
pub struct GenzMalik {
    ndim: usize,
    fixed: FixedRule,
    lower: FixedRule,
}

impl GenzMalik {
    /// Create the degree-7 Genz-Malik rule with its embedded degree-5
    /// companion.
    pub fn new(ndim: usize) -> Result<Self> {
        Self::with_degree(ndim, 7, 5)
    }

    /// Create a Genz-Malik rule of the given degree pair.
    ///
    /// Only `(degree, lower_degree) == (7, 5)` is implemented.
    pub fn with_degree(ndim: usize, degree: usize, lower_degree: usize) -> Result<Self> {
        if ndim < 2 {
            return Err(CubatureError::InvalidParameter {
                parameter: "ndim".to_string(),
                message: "Genz-Malik cubature is only defined for ndim >= 2".to_string(),
            });
        }

        if degree != 7 || lower_degree != 5 {
            return Err(CubatureError::InvalidParameter {
                parameter: "degree".to_string(),
                message: format!(
                    "only degree 7 with embedded degree 5 is implemented, got ({}, {})",
                    degree, lower_degree
                ),
            });
        }

        Ok(Self {
            ndim,
            fixed: degree_7_rule(ndim)?,
            lower: degree_5_rule(ndim)?,
        })
    }

    /// Spatial dimension.
    pub fn ndim(&self) -> usize {
        self.ndim
    }
}

impl CubatureRule for GenzMalik {
    fn rule(&self) -> &FixedRule {
        &self.fixed
    }

    fn lower_rule(&self) -> Option<&FixedRule> {
        Some(&self.lower)
    }
}

// Scale parameters shared by both rules.
fn lambdas() -> (f64, f64, f64, f64) {
    let l_2 = (9.0f64 / 70.0).sqrt();
    let l_3 = (9.0f64 / 10.0).sqrt();
    let l_4 = l_3;
    let l_5 = (9.0f64 / 19.0).sqrt();
    (l_2, l_3, l_4, l_5)
}

fn degree_7_rule(ndim: usize) -> Result<FixedRule> {
    let (l_2, l_3, l_4, l_5) = lambdas();
    let two_pow = 2.0f64.powi(ndim as i32);
    let n = ndim as f64;

    let w_1 = two_pow * (12824.0 - 9120.0 * n + 400.0 * n * n) / 19683.0;
    let w_2 = two_pow * 980.0 / 6561.0;
    let w_3 = two_pow * (1820.0 - 400.0 * n) / 19683.0;
    let w_4 = two_pow * 200.0 / 19683.0;
    let w_5 = 6859.0 / 19683.0;

    let mut points = Vec::new();
    let mut weights = Vec::new();

    push_family(&mut points, &mut weights, vec![vec![0.0; ndim]], w_1);
    push_axis_families(&mut points, &mut weights, ndim, l_2, w_2);
    push_axis_families(&mut points, &mut weights, ndim, l_3, w_3);
    push_pair_families(&mut points, &mut weights, ndim, l_4, w_4);
    push_family(&mut points, &mut weights, sign_combinations(ndim, l_5), w_5);

    pack(ndim, points, weights)
}

fn degree_5_rule(ndim: usize) -> Result<FixedRule> {
    let (l_2, l_3, l_4, _l_5) = lambdas();
    let two_pow = 2.0f64.powi(ndim as i32);
    let n = ndim as f64;

    let w_1 = two_pow * (729.0 - 950.0 * n + 50.0 * n * n) / 729.0;
    let w_2 = two_pow * 245.0 / 486.0;
    let w_3 = two_pow * (265.0 - 100.0 * n) / 1458.0;
    let w_4 = two_pow * 25.0 / 729.0;

    // Same node families as the degree-7 rule minus the l_5 corners.
    let mut points = Vec::new();
    let mut weights = Vec::new();

    push_family(&mut points, &mut weights, vec![vec![0.0; ndim]], w_1);
    push_axis_families(&mut points, &mut weights, ndim, l_2, w_2);
    push_axis_families(&mut points, &mut weights, ndim, l_3, w_3);
    push_pair_families(&mut points, &mut weights, ndim, l_4, w_4);

    pack(ndim, points, weights)
}

fn push_family(points: &mut Vec<Vec<f64>>, weights: &mut Vec<f64>, family: Vec<Vec<f64>>, w: f64) {
    for p in family {
        points.push(p);
        weights.push(w);
    }
}

/// All distinct placements of a single `+/-lambda` coordinate.
fn push_axis_families(
    points: &mut Vec<Vec<f64>>,
    weights: &mut Vec<f64>,
    ndim: usize,
    lambda: f64,
    w: f64,
) {
    for sign in [1.0, -1.0] {
        let mut pattern = vec![0.0; ndim];
        pattern[0] = sign * lambda;
        push_family(points, weights, distinct_permutations(&pattern), w);
    }
}

/// All distinct placements of two `+/-lambda` coordinates, covering the
/// same-sign and mixed-sign patterns.
fn push_pair_families(
    points: &mut Vec<Vec<f64>>,
    weights: &mut Vec<f64>,
    ndim: usize,
    lambda: f64,
    w: f64,
) {
    for signs in [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
        let mut pattern = vec![0.0; ndim];
        pattern[0] = signs.0 * lambda;
        pattern[1] = signs.1 * lambda;
        push_family(points, weights, distinct_permutations(&pattern), w);
    }
}

/// The full `2^ndim` sign combinations of `(+/-lambda, ..., +/-lambda)`.
fn sign_combinations(ndim: usize, lambda: f64) -> Vec<Vec<f64>> {
    (0..1usize << ndim)
        .map(|mask| {
            (0..ndim)
                .map(|i| {
                    if mask & (1 << i) == 0 {
                        lambda
                    } else {
                        -lambda
                    }
                })
                .collect()
        })
        .collect()
}

/// The distinct permutations of `pattern`, generated by a lexicographic
/// next-permutation walk from the sorted pattern. Repeated values yield
/// each distinct placement exactly once.
fn distinct_permutations(pattern: &[f64]) -> Vec<Vec<f64>> {
    let mut items = pattern.to_vec();
    items.sort_by(f64::total_cmp);

    let mut perms = vec![items.clone()];
    while next_permutation(&mut items) {
        perms.push(items.clone());
    }

    perms
}

/// Advance `items` to the lexicographically next permutation; `false` when
/// no further increasing swap exists.
fn next_permutation(items: &mut [f64]) -> bool {
    let n = items.len();
    if n < 2 {
        return false;
    }

    // Largest i such that items[i] < items[i + 1].
    let mut i = n - 1;
    loop {
        if i == 0 {
            return false;
        }
        i -= 1;
        if items[i] < items[i + 1] {
            break;
        }
    }

    // Largest j > i such that items[i] < items[j].
    let mut j = n - 1;
    while items[j] <= items[i] {
        j -= 1;
    }

    items.swap(i, j);
    items[i + 1..].reverse();
    true
}

/// Pack a point list into the `(ndim, npoints)` row-major node layout.
fn pack(ndim: usize, points: Vec<Vec<f64>>, weights: Vec<f64>) -> Result<FixedRule> {
    let npoints = points.len();
    let mut nodes = vec![0.0; ndim * npoints];

    for (k, p) in points.iter().enumerate() {
        for (i, &coord) in p.iter().enumerate() {
            nodes[i * npoints + k] = coord;
        }
    }

    FixedRule::new(ndim, nodes, weights)
}
