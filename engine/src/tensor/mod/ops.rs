// Copyright (c) 2026 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

impl Tensor {
    /// `self * other + c` through the registered `extension_cpp::muladd_cpp` operator
    #[inline]
    pub fn muladd(&self, other: &Tensor, c: f64) -> Result<Tensor> {
        crate::extension::muladd(self, other, c)
    }

    /// Elementwise comparison with tolerance `atol + rtol * |other|`.
    ///
    /// Returns false for differing shapes or dtypes and for non-float tensors
    /// with any unequal element.
    pub fn allclose(&self, other: &Tensor, rtol: f64, atol: f64) -> bool {
        if self.shape != other.shape || self.dtype != other.dtype {
            return false;
        }

        match self.dtype {
            DataType::Float32 => match (self.data.as_f32_slice(), other.data.as_f32_slice()) {
                (Some(a), Some(b)) => a.iter().zip(b).all(|(&x, &y)| {
                    close(f64::from(x), f64::from(y), rtol, atol)
                }),
                _ => false,
            },
            DataType::Float64 => match (self.data.as_f64_slice(), other.data.as_f64_slice()) {
                (Some(a), Some(b)) => a.iter().zip(b).all(|(&x, &y)| close(x, y, rtol, atol)),
                _ => false,
            },
            _ => self.data == other.data,
        }
    }
}

#[inline(always)]
fn close(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= atol + rtol * b.abs()
}

#[cfg(test)]
mod ops_tests {
    use super::*;

    #[test]
    fn test_allclose() {
        let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0]);
        let b = Tensor::from_slice(&[1.0f32, 2.000_001, 3.0]);
        assert!(a.allclose(&b, 1e-5, 1e-8));

        let c = Tensor::from_slice(&[1.0f32, 2.5, 3.0]);
        assert!(!a.allclose(&c, 1e-5, 1e-8));

        let d = Tensor::from_slice(&[1.0f64, 2.0, 3.0]);
        assert!(!a.allclose(&d, 1e-5, 1e-8));
    }

    #[test]
    fn test_allclose_nan_is_never_close() {
        let a = Tensor::from_slice(&[f64::NAN]);
        assert!(!a.allclose(&a, 0.0, 1.0));
    }

    #[test]
    fn test_method_forwards_to_operator() {
        let a = Tensor::from_slice(&[1.0f32, 2.0]);
        let b = Tensor::from_slice(&[3.0f32, 4.0]);
        let out = a.muladd(&b, 0.5).unwrap();
        assert_eq!(out.to_vec::<f32>().unwrap(), vec![3.5, 8.5]);
    }
}
