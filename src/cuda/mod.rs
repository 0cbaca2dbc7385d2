//! CUDA implementation of cubature.

use numr::runtime::cuda::{CudaClient, CudaRuntime};
use numr::tensor::Tensor;

use crate::error::Result;
use crate::impl_generic::{cubature_impl, CubatureRule};
use crate::traits::{CubatureAlgorithms, CubatureOptions, CubatureResult};

impl CubatureAlgorithms<CudaRuntime> for CudaClient {
    fn cubature<K, F>(
        &self,
        f: F,
        a: &[f64],
        b: &[f64],
        rule: &K,
        options: &CubatureOptions,
    ) -> Result<CubatureResult<CudaRuntime>>
    where
        K: CubatureRule,
        F: Fn(&Tensor<CudaRuntime>) -> numr::error::Result<Tensor<CudaRuntime>>,
    {
        cubature_impl(self, f, a, b, rule, options)
    }
}
