// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{ExtensionError, Result};
use smallvec::SmallVec;
use std::fmt;

/// Dimensions of a tensor. An empty dim list is a scalar with one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Self {
            dims: SmallVec::from_vec(dims),
        }
    }

    pub fn scalar() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline(always)]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline(always)]
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn size(&self, dim: usize) -> Result<usize> {
        self.dims.get(dim).copied().ok_or_else(|| {
            ExtensionError::invalid_argument(format!(
                "dimension {dim} out of range for tensor with {} dimensions",
                self.ndim()
            ))
        })
    }

    /// Row-major strides in elements
    pub fn strides(&self) -> SmallVec<[usize; 4]> {
        let mut strides: SmallVec<[usize; 4]> = smallvec::smallvec![1; self.ndim()];
        for i in (0..self.ndim().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Broadcast two shapes following NumPy rules: dims are aligned from the
    /// right and each pair must be equal or contain a 1.
    pub fn broadcast_with(&self, other: &Shape) -> Result<Shape> {
        let ndim = self.ndim().max(other.ndim());
        let mut dims = vec![0; ndim];

        for i in 0..ndim {
            let lhs = dim_from_right(&self.dims, i);
            let rhs = dim_from_right(&other.dims, i);
            dims[ndim - 1 - i] = match (lhs, rhs) {
                (a, b) if a == b => a,
                (1, b) => b,
                (a, 1) => a,
                _ => {
                    return Err(ExtensionError::shape_mismatch(
                        self.to_string(),
                        other.to_string(),
                    ))
                }
            };
        }

        Ok(Shape::new(dims))
    }
}

#[inline(always)]
fn dim_from_right(dims: &[usize], i: usize) -> usize {
    if i < dims.len() {
        dims[dims.len() - 1 - i]
    } else {
        1
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{dim}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numel() {
        assert_eq!(Shape::new(vec![2, 3, 4]).numel(), 24);
        assert_eq!(Shape::scalar().numel(), 1);
        assert_eq!(Shape::new(vec![3, 0]).numel(), 0);
    }

    #[test]
    fn test_size_out_of_range() {
        let shape = Shape::new(vec![2, 3]);
        assert_eq!(shape.size(1).unwrap(), 3);
        assert!(shape.size(2).is_err());
    }

    #[test]
    fn test_strides() {
        let shape = Shape::new(vec![2, 3, 4]);
        assert_eq!(shape.strides().as_slice(), &[12, 4, 1]);
        assert!(Shape::scalar().strides().is_empty());
    }

    #[test]
    fn test_broadcast_with() {
        let a = Shape::new(vec![2, 1]);
        let b = Shape::new(vec![3]);
        assert_eq!(a.broadcast_with(&b).unwrap(), Shape::new(vec![2, 3]));

        let same = Shape::new(vec![4, 5]);
        assert_eq!(same.broadcast_with(&same).unwrap(), same);

        let scalar = Shape::scalar();
        assert_eq!(scalar.broadcast_with(&same).unwrap(), same);
    }

    #[test]
    fn test_broadcast_incompatible() {
        let a = Shape::new(vec![3]);
        let b = Shape::new(vec![2]);
        let err = a.broadcast_with(&b).unwrap_err();
        assert!(matches!(err, ExtensionError::ShapeMismatch { .. }));
    }
}
