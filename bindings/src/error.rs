// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use engine::ExtensionError;
use pyo3::PyErr;
use pyo3::exceptions::{PyAttributeError, PyRuntimeError, PyValueError};

/// Convert an engine error into the matching Python exception
pub fn _convert_error(err: ExtensionError) -> PyErr {
    let message = err.to_string();
    match err {
        ExtensionError::ShapeMismatch { .. }
        | ExtensionError::TypeMismatch { .. }
        | ExtensionError::InvalidArgument(_)
        | ExtensionError::InvalidSchema { .. } => PyValueError::new_err(message),
        ExtensionError::UnknownOperator(_) => PyAttributeError::new_err(message),
        _ => PyRuntimeError::new_err(message),
    }
}
