//! CPU implementation of cubature.

use numr::runtime::cpu::{CpuClient, CpuRuntime};
use numr::tensor::Tensor;

use crate::error::Result;
use crate::impl_generic::{cubature_impl, CubatureRule};
use crate::traits::{CubatureAlgorithms, CubatureOptions, CubatureResult};

impl CubatureAlgorithms<CpuRuntime> for CpuClient {
    fn cubature<K, F>(
        &self,
        f: F,
        a: &[f64],
        b: &[f64],
        rule: &K,
        options: &CubatureOptions,
    ) -> Result<CubatureResult<CpuRuntime>>
    where
        K: CubatureRule,
        F: Fn(&Tensor<CpuRuntime>) -> numr::error::Result<Tensor<CpuRuntime>>,
    {
        cubature_impl(self, f, a, b, rule, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_generic::{ErrorFromDifference, GaussKronrod, NewtonCotes, Product};
    use numr::runtime::cpu::CpuDevice;

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    #[test]
    fn test_cubature_cpu() {
        let (device, client) = setup();

        // Integrate sin(x) over [0, pi] adaptively; exact value 2.
        let rule = GaussKronrod::new(21).unwrap();
        let result = client
            .cubature(
                |x| {
                    let data: Vec<f64> = x.to_vec();
                    let out: Vec<f64> = data.iter().map(|&xi| xi.sin()).collect();
                    Ok(Tensor::<CpuRuntime>::from_slice(
                        &out,
                        &[out.len()],
                        &device,
                    ))
                },
                &[0.0],
                &[std::f64::consts::PI],
                &rule,
                &CubatureOptions::default(),
            )
            .unwrap();

        assert!(result.success);
        let est: Vec<f64> = result.estimate.to_vec();
        assert!((est[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_cubature_cpu_2d_newton_cotes_product() {
        let (device, client) = setup();

        // Product of error-paired Newton-Cotes rules over [0, 1]^2 of
        // cos(x_1) + cos(x_2); exact value 2*sin(1).
        let paired = ErrorFromDifference::new(
            NewtonCotes::new(&client, 10, false).unwrap(),
            NewtonCotes::new(&client, 8, false).unwrap(),
        )
        .unwrap();
        let rule = Product::new(&[&paired, &paired]).unwrap();

        let result = client
            .cubature(
                |x| {
                    let m = x.shape()[1];
                    let data: Vec<f64> = x.to_vec();
                    let mut out = vec![0.0; m];
                    for i in 0..2 {
                        for k in 0..m {
                            out[k] += data[i * m + k].cos();
                        }
                    }
                    Ok(Tensor::<CpuRuntime>::from_slice(&out, &[m], &device))
                },
                &[0.0, 0.0],
                &[1.0, 1.0],
                &rule,
                &CubatureOptions::default(),
            )
            .unwrap();

        assert!(result.success);
        let est: Vec<f64> = result.estimate.to_vec();
        assert!((est[0] - 2.0 * 1.0f64.sin()).abs() < 1e-8);
    }

    #[test]
    fn test_cubature_cpu_tight_tolerance_matrix_output() {
        let (device, client) = setup();

        // Integrand returning a (2, 2, m) tensor; each component converges
        // against its own tolerance.
        let rule = GaussKronrod::new(15).unwrap();
        let options = CubatureOptions::with_tolerances(1e-10, 1e-12);

        let result = client
            .cubature(
                |x| {
                    let data: Vec<f64> = x.to_vec();
                    let m = data.len();
                    let mut out = Vec::with_capacity(4 * m);
                    for n in 1..=4 {
                        for &xi in &data {
                            out.push((n as f64 * xi).cos());
                        }
                    }
                    Ok(Tensor::<CpuRuntime>::from_slice(&out, &[2, 2, m], &device))
                },
                &[0.0],
                &[1.0],
                &rule,
                &options,
            )
            .unwrap();

        assert!(result.success);
        let est: Vec<f64> = result.estimate.to_vec();
        assert_eq!(est.len(), 4);
        for (i, &value) in est.iter().enumerate() {
            let n = (i + 1) as f64;
            let exact = n.sin() / n;
            assert!(
                (value - exact).abs() < 1e-9,
                "component {}: est={}, exact={}",
                i,
                value,
                exact
            );
        }
    }
}
