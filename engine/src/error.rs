// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Result type used throughout the engine
pub type Result<T> = std::result::Result<T, ExtensionError>;

/// Errors raised by tensors, the operator registry and kernels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionError {
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("operator '{0}' is already defined")]
    DuplicateOperator(String),

    #[error("operator '{op}' already has a kernel for {key}")]
    DuplicateKernel { op: String, key: String },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ExtensionError {
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_schema(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_operator(name: impl Into<String>) -> Self {
        Self::UnknownOperator(name.into())
    }

    pub fn duplicate_operator(name: impl Into<String>) -> Self {
        Self::DuplicateOperator(name.into())
    }

    pub fn duplicate_kernel(op: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKernel {
            op: op.into(),
            key: key.into(),
        }
    }

    pub fn backend_error(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ExtensionError::shape_mismatch("[3]", "[2]");
        assert_eq!(err.to_string(), "shape mismatch: expected [3], got [2]");

        let err = ExtensionError::unknown_operator("extension_cpp::missing");
        assert_eq!(err.to_string(), "unknown operator 'extension_cpp::missing'");
    }
}
