// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use engine::DataType;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

static DEFAULT_DTYPE: Lazy<RwLock<DataType>> = Lazy::new(|| RwLock::new(DataType::Float32));

pub fn parse_dtype(name: &str) -> PyResult<DataType> {
    DataType::from_name(name).ok_or_else(|| {
        PyValueError::new_err(format!(
            "Unsupported dtype '{name}'. Expected one of float32, float64, int32, int64, bool"
        ))
    })
}

pub fn resolve_dtype_arg(arg: Option<&str>) -> PyResult<DataType> {
    match arg {
        Some(name) => parse_dtype(name),
        None => Ok(default_dtype()),
    }
}

pub fn default_dtype() -> DataType {
    *DEFAULT_DTYPE.read()
}

/// Set the dtype used by `Tensor(...)` when none is given
#[pyfunction]
pub fn set_default_dtype(name: &str) -> PyResult<()> {
    let dtype = parse_dtype(name)?;
    *DEFAULT_DTYPE.write() = dtype;
    Ok(())
}

#[pyfunction]
pub fn get_default_dtype() -> &'static str {
    default_dtype().name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dtype_arg() {
        assert_eq!(resolve_dtype_arg(Some("f64")).unwrap(), DataType::Float64);
        assert_eq!(resolve_dtype_arg(None).unwrap(), default_dtype());
        assert!(parse_dtype("complex64").is_err());
    }
}
