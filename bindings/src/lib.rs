// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

pub mod custom_ops;
pub mod dtype;
pub mod error;
pub mod tensor;

use error::_convert_error;
use pyo3::prelude::*;
use tensor::PyTensor;

/// Importing the module registers the extension's operators
#[pymodule]
fn extension_cpp(m: &Bound<'_, PyModule>) -> PyResult<()> {
    engine::load_extension().map_err(_convert_error)?;
    tracing::debug!("extension_cpp module initialised");

    m.add_class::<PyTensor>()?;
    m.add_function(wrap_pyfunction!(dtype::set_default_dtype, m)?)?;
    m.add_function(wrap_pyfunction!(dtype::get_default_dtype, m)?)?;
    custom_ops::init_custom_ops_module(m)?;
    m.add("__version__", engine::VERSION)?;

    Ok(())
}
