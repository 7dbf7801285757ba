// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use crate::{
    config,
    error::{ExtensionError, Result},
    tensor::{DataType, Element, Shape, Tensor, TensorData},
};
use rayon::prelude::*;
use std::{
    ops::{Add, Mul},
    sync::Arc,
};

/// Element types the multiply-add kernel is defined for
pub trait MulAddElement: Element + Mul<Output = Self> + Add<Output = Self> {
    fn from_f64(value: f64) -> Self;
}

impl MulAddElement for f32 {
    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl MulAddElement for f64 {
    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// CPU kernel computing `a * b + c` elementwise.
///
/// `a` and `b` must share a floating dtype, live on the CPU and have
/// broadcast-compatible shapes. The output has the broadcast shape and the
/// input dtype; `c` is cast to that dtype.
pub fn muladd_cpu(a: &Tensor, b: &Tensor, c: f64) -> Result<Tensor> {
    muladd_cpu_with_threshold(a, b, c, config::config().parallel_threshold)
}

pub(crate) fn muladd_cpu_with_threshold(
    a: &Tensor,
    b: &Tensor,
    c: f64,
    parallel_threshold: usize,
) -> Result<Tensor> {
    if a.dtype() != b.dtype() {
        return Err(ExtensionError::type_mismatch(a.dtype().name(), b.dtype().name()));
    }

    if !a.dtype().is_float() {
        return Err(ExtensionError::invalid_operation(format!(
            "muladd expects float32 or float64 tensors, got {}",
            a.dtype()
        )));
    }

    for tensor in [a, b] {
        if !tensor.device().is_cpu() {
            return Err(ExtensionError::backend_error(format!(
                "CPU muladd kernel received a tensor on {}",
                tensor.device()
            )));
        }
    }

    let output_shape = a.shape().broadcast_with(b.shape())?;

    tracing::trace!(
        shape = %output_shape,
        dtype = %a.dtype(),
        parallel = output_shape.numel() >= parallel_threshold,
        "muladd_cpu"
    );

    let output_data = match a.dtype() {
        DataType::Float32 => muladd_typed::<f32>(a, b, c, &output_shape, parallel_threshold)?,
        DataType::Float64 => muladd_typed::<f64>(a, b, c, &output_shape, parallel_threshold)?,
        dtype => {
            return Err(ExtensionError::internal_error(format!(
                "no muladd implementation for {dtype}"
            )))
        }
    };

    Tensor::new(Arc::new(output_data), output_shape, a.device())
}

fn muladd_typed<T: MulAddElement>(
    a: &Tensor,
    b: &Tensor,
    c: f64,
    output_shape: &Shape,
    parallel_threshold: usize,
) -> Result<TensorData> {
    let lhs = a.as_slice::<T>()?;
    let rhs = b.as_slice::<T>()?;
    let c = T::from_f64(c);
    let mut output = vec![c; output_shape.numel()];
    let parallel = output.len() >= parallel_threshold;

    if a.shape() == b.shape() {
        muladd_contiguous(lhs, rhs, c, &mut output, parallel);
    } else {
        let lhs_map = BroadcastMap::new(a.shape(), output_shape);
        let rhs_map = BroadcastMap::new(b.shape(), output_shape);
        let kernel = |(idx, out): (usize, &mut T)| {
            *out = lhs[lhs_map.index(idx)] * rhs[rhs_map.index(idx)] + c;
        };
        if parallel {
            output.par_iter_mut().enumerate().for_each(kernel);
        } else {
            output.iter_mut().enumerate().for_each(kernel);
        }
    }

    Ok(TensorData::from_vec(output))
}

/// Elementwise loop over equally sized slices
pub(crate) fn muladd_contiguous<T: MulAddElement>(lhs: &[T], rhs: &[T], c: T, output: &mut [T], parallel: bool) {
    debug_assert_eq!(lhs.len(), output.len());
    debug_assert_eq!(rhs.len(), output.len());

    if parallel {
        output
            .par_iter_mut()
            .zip(lhs.par_iter().zip(rhs.par_iter()))
            .for_each(|(out, (&x, &y))| *out = x * y + c);
    } else {
        for ((out, &x), &y) in output.iter_mut().zip(lhs).zip(rhs) {
            *out = x * y + c;
        }
    }
}

/// Maps a linear output index to the linear index of a broadcast input
struct BroadcastMap {
    output_dims: Vec<usize>,
    output_strides: Vec<usize>,
    /// Input stride per output axis, zero where the input is broadcast
    input_strides: Vec<usize>,
}

impl BroadcastMap {
    fn new(input: &Shape, output: &Shape) -> Self {
        let output_dims = output.dims().to_vec();
        let output_strides = output.strides().to_vec();
        let strides = input.strides();
        let offset = output.ndim() - input.ndim();

        let input_strides = (0..output.ndim())
            .map(|axis| {
                if axis < offset || input.dims()[axis - offset] == 1 {
                    0
                } else {
                    strides[axis - offset]
                }
            })
            .collect();

        Self {
            output_dims,
            output_strides,
            input_strides,
        }
    }

    #[inline(always)]
    fn index(&self, linear: usize) -> usize {
        self.output_dims
            .iter()
            .zip(&self.output_strides)
            .zip(&self.input_strides)
            .map(|((&dim, &out_stride), &in_stride)| (linear / out_stride) % dim * in_stride)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;

    #[test]
    fn test_muladd_basic() {
        let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0]);
        let b = Tensor::from_slice(&[4.0f32, 5.0, 6.0]);
        let out = muladd_cpu(&a, &b, 2.0).unwrap();
        assert_eq!(out.to_vec::<f32>().unwrap(), vec![6.0, 12.0, 20.0]);
        assert_eq!(out.dtype(), DataType::Float32);
        assert_eq!(out.shape(), a.shape());
    }

    #[test]
    fn test_muladd_f64() {
        let a = Tensor::from_slice(&[0.5f64, -1.0]);
        let b = Tensor::from_slice(&[4.0f64, 3.0]);
        let out = muladd_cpu(&a, &b, -1.0).unwrap();
        assert_eq!(out.to_vec::<f64>().unwrap(), vec![1.0, -4.0]);
    }

    #[test]
    fn test_muladd_broadcast() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0], vec![2, 1], Device::cpu()).unwrap();
        let b = Tensor::from_slice(&[10.0f32, 20.0, 30.0]);
        let out = muladd_cpu(&a, &b, 1.0).unwrap();
        assert_eq!(out.shape().dims(), &[2, 3]);
        assert_eq!(
            out.to_vec::<f32>().unwrap(),
            vec![11.0, 21.0, 31.0, 21.0, 41.0, 61.0]
        );
    }

    #[test]
    fn test_muladd_scalar_tensor_broadcast() {
        let a = Tensor::scalar(3.0f64);
        let b = Tensor::from_vec(vec![1.0f64, 2.0, 3.0, 4.0], vec![2, 2], Device::cpu()).unwrap();
        let out = muladd_cpu(&a, &b, 0.0).unwrap();
        assert_eq!(out.to_vec::<f64>().unwrap(), vec![3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_muladd_shape_mismatch() {
        let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0]);
        let b = Tensor::from_slice(&[1.0f32, 2.0]);
        let err = muladd_cpu(&a, &b, 1.0).unwrap_err();
        assert!(matches!(err, ExtensionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_muladd_dtype_mismatch() {
        let a = Tensor::from_slice(&[1.0f32]);
        let b = Tensor::from_slice(&[1.0f64]);
        let err = muladd_cpu(&a, &b, 1.0).unwrap_err();
        assert!(matches!(err, ExtensionError::TypeMismatch { .. }));
    }

    #[test]
    fn test_muladd_rejects_integers() {
        let a = Tensor::from_slice(&[1i32, 2]);
        let b = Tensor::from_slice(&[3i32, 4]);
        let err = muladd_cpu(&a, &b, 1.0).unwrap_err();
        assert!(matches!(err, ExtensionError::InvalidOperation(_)));
    }

    #[test]
    fn test_muladd_rejects_non_cpu() {
        let a = Tensor::from_slice(&[1.0f32]).to_device(Device::cuda(0));
        let b = Tensor::from_slice(&[1.0f32]);
        let err = muladd_cpu(&a, &b, 1.0).unwrap_err();
        assert!(matches!(err, ExtensionError::Backend(_)));
    }

    #[test]
    fn test_muladd_empty() {
        let a = Tensor::from_vec(Vec::<f32>::new(), vec![0], Device::cpu()).unwrap();
        let out = muladd_cpu(&a, &a, 1.0).unwrap();
        assert_eq!(out.numel(), 0);
        assert_eq!(out.shape().dims(), &[0]);
    }

    #[test]
    fn test_parallel_path_matches_serial() {
        let n = 10_000;
        let lhs: Vec<f64> = (0..n).map(|i| i as f64 * 0.5).collect();
        let rhs: Vec<f64> = (0..n).map(|i| (n - i) as f64).collect();
        let a = Tensor::from_slice(&lhs);
        let b = Tensor::from_slice(&rhs);

        let parallel = muladd_cpu_with_threshold(&a, &b, 3.0, 1).unwrap();
        let serial = muladd_cpu_with_threshold(&a, &b, 3.0, usize::MAX).unwrap();
        assert_eq!(parallel.to_vec::<f64>().unwrap(), serial.to_vec::<f64>().unwrap());
    }

    #[test]
    fn test_parallel_broadcast_matches_serial() {
        let col = Tensor::from_vec((0..64).map(|i| i as f32).collect(), vec![64, 1], Device::cpu())
            .unwrap();
        let row = Tensor::from_slice(&(0..128).map(|i| i as f32 * 0.25).collect::<Vec<_>>());

        let parallel = muladd_cpu_with_threshold(&col, &row, 1.0, 1).unwrap();
        let serial = muladd_cpu_with_threshold(&col, &row, 1.0, usize::MAX).unwrap();
        assert_eq!(parallel.shape().dims(), &[64, 128]);
        assert!(parallel.allclose(&serial, 0.0, 0.0));
    }
}
