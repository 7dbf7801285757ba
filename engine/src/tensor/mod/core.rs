// Copyright (c) 2026 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

pub use data::{Element, TensorData};
pub use dtype::DataType;
pub use shape::Shape;

use crate::{
    device::Device,
    error::{ExtensionError, Result},
};
use std::sync::Arc;

/// Dense, contiguous tensor
#[derive(Debug, Clone)]
pub struct Tensor {
    /// Tensor data storage, shared between clones
    data: Arc<TensorData>,
    /// Tensor shape (dimensions)
    shape: Shape,
    /// Data type of tensor elements
    dtype: DataType,
    /// Device used to pick kernels
    device: Device,
}

impl Tensor {
    /// Create a new tensor from existing storage
    pub fn new(data: Arc<TensorData>, shape: Shape, device: Device) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(ExtensionError::shape_mismatch(
                format!("{} elements for shape {}", shape.numel(), shape),
                format!("{} elements", data.len()),
            ));
        }
        let dtype = data.dtype();
        Ok(Self {
            data,
            shape,
            dtype,
            device,
        })
    }

    /// Create a tensor from a flat row-major vector
    pub fn from_vec<T: Element>(values: Vec<T>, shape: impl Into<Shape>, device: Device) -> Result<Self> {
        Self::new(Arc::new(TensorData::from_vec(values)), shape.into(), device)
    }

    /// One-dimensional CPU tensor, the common case for small examples
    pub fn from_slice<T: Element>(values: &[T]) -> Self {
        let shape = Shape::new(vec![values.len()]);
        Self {
            data: Arc::new(TensorData::from_vec(values.to_vec())),
            shape,
            dtype: T::DTYPE,
            device: Device::cpu(),
        }
    }

    /// Zero-dimensional tensor holding one value
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            data: Arc::new(TensorData::from_vec(vec![value])),
            shape: Shape::scalar(),
            dtype: T::DTYPE,
            device: Device::cpu(),
        }
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: impl Into<Shape>, dtype: DataType, device: Device) -> Self {
        let shape = shape.into();
        Self {
            data: Arc::new(TensorData::zeros(shape.numel(), dtype)),
            shape,
            dtype,
            device,
        }
    }

    /// Create a tensor with every element set to `value`
    pub fn full<T: Element>(shape: impl Into<Shape>, value: T, device: Device) -> Self {
        let shape = shape.into();
        Self {
            data: Arc::new(TensorData::from_vec(vec![value; shape.numel()])),
            shape,
            dtype: T::DTYPE,
            device,
        }
    }

    /// Zeros with the shape, dtype and device of `other`
    pub fn zeros_like(other: &Tensor) -> Self {
        Self::zeros(other.shape.clone(), other.dtype, other.device)
    }

    #[inline(always)]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline(always)]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    #[inline(always)]
    pub fn device(&self) -> Device {
        self.device
    }

    #[inline(always)]
    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    #[inline(always)]
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    #[inline(always)]
    pub fn data(&self) -> &Arc<TensorData> {
        &self.data
    }

    /// Same storage tagged with another device
    pub fn to_device(&self, device: Device) -> Self {
        Self {
            device,
            ..self.clone()
        }
    }

    /// Borrow the elements as a typed slice
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::slice(&self.data)
            .ok_or_else(|| ExtensionError::type_mismatch(T::DTYPE.name(), self.dtype.name()))
    }

    /// Copy the elements out in row-major order
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        self.as_slice::<T>().map(<[T]>::to_vec)
    }
}

#[cfg(test)]
mod core_tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_numel() {
        let ok = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], vec![2, 2], Device::cpu()).unwrap();
        assert_eq!(ok.shape().dims(), &[2, 2]);
        assert_eq!(ok.dtype(), DataType::Float32);

        let err = Tensor::from_vec(vec![1.0f32, 2.0, 3.0], vec![2, 2], Device::cpu()).unwrap_err();
        assert!(matches!(err, ExtensionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_zeros_like() {
        let a = Tensor::from_slice(&[1.0f64, 2.0, 3.0]);
        let z = Tensor::zeros_like(&a);
        assert_eq!(z.shape(), a.shape());
        assert_eq!(z.dtype(), DataType::Float64);
        assert_eq!(z.to_vec::<f64>().unwrap(), vec![0.0; 3]);
    }

    #[test]
    fn test_typed_access_rejects_wrong_type() {
        let a = Tensor::from_slice(&[1i64, 2]);
        assert!(a.as_slice::<f32>().is_err());
        assert_eq!(a.as_slice::<i64>().unwrap(), &[1, 2]);
    }

    #[test]
    fn test_to_device_shares_storage() {
        let a = Tensor::full(vec![2], 1.5f32, Device::cpu());
        let b = a.to_device(Device::cuda(0));
        assert!(Arc::ptr_eq(a.data(), b.data()));
        assert_eq!(b.device(), Device::cuda(0));
    }
}
