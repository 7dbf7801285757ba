// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use crate::tensor::dtype::DataType;

/// Contiguous host storage for tensor elements
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    buffer: TensorBuffer,
}

#[derive(Debug, Clone, PartialEq)]
enum TensorBuffer {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
}

impl TensorData {
    /// Zero-filled storage of `numel` elements
    pub fn zeros(numel: usize, dtype: DataType) -> Self {
        let buffer = match dtype {
            DataType::Float32 => TensorBuffer::Float32(vec![0.0; numel]),
            DataType::Float64 => TensorBuffer::Float64(vec![0.0; numel]),
            DataType::Int32 => TensorBuffer::Int32(vec![0; numel]),
            DataType::Int64 => TensorBuffer::Int64(vec![0; numel]),
            DataType::Bool => TensorBuffer::Bool(vec![false; numel]),
        };
        Self { buffer }
    }

    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        T::into_data(values)
    }

    #[inline(always)]
    pub fn dtype(&self) -> DataType {
        match &self.buffer {
            TensorBuffer::Float32(_) => DataType::Float32,
            TensorBuffer::Float64(_) => DataType::Float64,
            TensorBuffer::Int32(_) => DataType::Int32,
            TensorBuffer::Int64(_) => DataType::Int64,
            TensorBuffer::Bool(_) => DataType::Bool,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        match &self.buffer {
            TensorBuffer::Float32(v) => v.len(),
            TensorBuffer::Float64(v) => v.len(),
            TensorBuffer::Int32(v) => v.len(),
            TensorBuffer::Int64(v) => v.len(),
            TensorBuffer::Bool(v) => v.len(),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the buffer in bytes
    pub fn size_bytes(&self) -> usize {
        self.len() * self.dtype().size_bytes()
    }

    pub fn as_f32_slice(&self) -> Option<&[f32]> {
        match &self.buffer {
            TensorBuffer::Float32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        match &self.buffer {
            TensorBuffer::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32_slice(&self) -> Option<&[i32]> {
        match &self.buffer {
            TensorBuffer::Int32(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64_slice(&self) -> Option<&[i64]> {
        match &self.buffer {
            TensorBuffer::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool_slice(&self) -> Option<&[bool]> {
        match &self.buffer {
            TensorBuffer::Bool(v) => Some(v),
            _ => None,
        }
    }
}

/// Rust scalar types that can back a tensor
pub trait Element: Copy + PartialEq + Send + Sync + 'static {
    const DTYPE: DataType;

    fn slice(data: &TensorData) -> Option<&[Self]>;

    fn into_data(values: Vec<Self>) -> TensorData;
}

macro_rules! impl_element {
    ($ty:ty, $dtype:ident, $accessor:ident) => {
        impl Element for $ty {
            const DTYPE: DataType = DataType::$dtype;

            #[inline(always)]
            fn slice(data: &TensorData) -> Option<&[Self]> {
                data.$accessor()
            }

            #[inline(always)]
            fn into_data(values: Vec<Self>) -> TensorData {
                TensorData {
                    buffer: TensorBuffer::$dtype(values),
                }
            }
        }
    };
}

impl_element!(f32, Float32, as_f32_slice);
impl_element!(f64, Float64, as_f64_slice);
impl_element!(i32, Int32, as_i32_slice);
impl_element!(i64, Int64, as_i64_slice);
impl_element!(bool, Bool, as_bool_slice);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let data = TensorData::zeros(4, DataType::Float64);
        assert_eq!(data.dtype(), DataType::Float64);
        assert_eq!(data.len(), 4);
        assert_eq!(data.size_bytes(), 32);
        assert_eq!(data.as_f64_slice().unwrap(), &[0.0; 4]);
        assert!(data.as_f32_slice().is_none());
    }

    #[test]
    fn test_from_vec() {
        let data = TensorData::from_vec(vec![1i32, 2, 3]);
        assert_eq!(data.dtype(), DataType::Int32);
        assert_eq!(i32::slice(&data).unwrap(), &[1, 2, 3]);
        assert!(f32::slice(&data).is_none());
    }
}
