//! WebGPU implementation of cubature.

use numr::runtime::wgpu::{WgpuClient, WgpuRuntime};
use numr::tensor::Tensor;

use crate::error::Result;
use crate::impl_generic::{cubature_impl, CubatureRule};
use crate::traits::{CubatureAlgorithms, CubatureOptions, CubatureResult};

impl CubatureAlgorithms<WgpuRuntime> for WgpuClient {
    fn cubature<K, F>(
        &self,
        f: F,
        a: &[f64],
        b: &[f64],
        rule: &K,
        options: &CubatureOptions,
    ) -> Result<CubatureResult<WgpuRuntime>>
    where
        K: CubatureRule,
        F: Fn(&Tensor<WgpuRuntime>) -> numr::error::Result<Tensor<WgpuRuntime>>,
    {
        cubature_impl(self, f, a, b, rule, options)
    }
}
