// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use super::schema::ArgType;
use crate::{
    error::{ExtensionError, Result},
    tensor::Tensor,
};

/// Boxed operator argument or return value
#[derive(Debug, Clone)]
pub enum IValue {
    Tensor(Tensor),
    Float(f64),
    Int(i64),
    Bool(bool),
}

impl IValue {
    pub fn kind(&self) -> ArgType {
        match self {
            IValue::Tensor(_) => ArgType::Tensor,
            IValue::Float(_) => ArgType::Float,
            IValue::Int(_) => ArgType::Int,
            IValue::Bool(_) => ArgType::Bool,
        }
    }

    pub fn as_tensor(&self) -> Result<&Tensor> {
        match self {
            IValue::Tensor(t) => Ok(t),
            other => Err(ExtensionError::type_mismatch("Tensor", other.kind().to_string())),
        }
    }

    pub fn into_tensor(self) -> Result<Tensor> {
        match self {
            IValue::Tensor(t) => Ok(t),
            other => Err(ExtensionError::type_mismatch("Tensor", other.kind().to_string())),
        }
    }

    /// Numeric value of a `float` argument; integers are promoted
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            IValue::Float(v) => Ok(*v),
            IValue::Int(v) => Ok(*v as f64),
            other => Err(ExtensionError::type_mismatch("float", other.kind().to_string())),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self {
            IValue::Int(v) => Ok(*v),
            other => Err(ExtensionError::type_mismatch("int", other.kind().to_string())),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            IValue::Bool(v) => Ok(*v),
            other => Err(ExtensionError::type_mismatch("bool", other.kind().to_string())),
        }
    }
}

impl From<Tensor> for IValue {
    fn from(t: Tensor) -> Self {
        IValue::Tensor(t)
    }
}

impl From<&Tensor> for IValue {
    fn from(t: &Tensor) -> Self {
        IValue::Tensor(t.clone())
    }
}

impl From<f64> for IValue {
    fn from(v: f64) -> Self {
        IValue::Float(v)
    }
}

impl From<i64> for IValue {
    fn from(v: i64) -> Self {
        IValue::Int(v)
    }
}

impl From<bool> for IValue {
    fn from(v: bool) -> Self {
        IValue::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_promotes_to_float() {
        assert_eq!(IValue::Int(3).as_f64().unwrap(), 3.0);
        assert!(IValue::Bool(true).as_f64().is_err());
    }

    #[test]
    fn test_into_tensor() {
        let t = Tensor::from_slice(&[1.0f32]);
        let value = IValue::from(&t);
        assert_eq!(value.kind(), ArgType::Tensor);
        assert_eq!(value.into_tensor().unwrap().numel(), 1);
        assert!(IValue::Float(1.0).into_tensor().is_err());
    }
}
