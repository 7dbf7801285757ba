// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::_convert_error;
use crate::tensor::PyTensor;
use engine::{
    IValue, Tensor, execute_custom_op, global_registry, is_custom_op_registered, muladd,
    unregister_custom_op,
};
use pyo3::conversion::IntoPyObjectExt;
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyList};

/// Multiply-add operator: `a * b + c` elementwise
#[pyfunction]
fn muladd_cpp(py: Python<'_>, a: PyRef<'_, PyTensor>, b: PyRef<'_, PyTensor>, c: f64) -> PyResult<PyTensor> {
    let a = a.tensor().clone();
    let b = b.tensor().clone();
    let result = py.detach(|| muladd(&a, &b, c)).map_err(_convert_error)?;
    Ok(PyTensor::from_tensor(result))
}

/// Execute a registered operator by qualified name
#[pyfunction]
fn call_op(py: Python<'_>, name: &str, args: &Bound<'_, PyList>) -> PyResult<Py<PyAny>> {
    let args = args
        .iter()
        .map(|item| python_to_ivalue(&item))
        .collect::<PyResult<Vec<_>>>()?;

    let result = execute_custom_op(name, &args).map_err(_convert_error)?;
    ivalue_to_python(py, result)
}

/// List registered operators, optionally only those in `namespace`
#[pyfunction]
#[pyo3(signature = (namespace=None))]
fn list_ops(namespace: Option<&str>) -> Vec<String> {
    global_registry().list(namespace)
}

/// Schema string of a registered operator
#[pyfunction]
fn op_schema(name: &str) -> PyResult<String> {
    global_registry()
        .schema(name)
        .map(|schema| schema.to_string())
        .map_err(_convert_error)
}

#[pyfunction]
fn is_op_registered(name: &str) -> bool {
    is_custom_op_registered(name)
}

#[pyfunction]
fn unregister_op(name: &str) -> PyResult<()> {
    unregister_custom_op(name).map_err(_convert_error)
}

fn python_to_ivalue(item: &Bound<'_, PyAny>) -> PyResult<IValue> {
    if let Ok(tensor) = item.extract::<PyRef<'_, PyTensor>>() {
        return Ok(IValue::Tensor(tensor.tensor().clone()));
    }
    if item.is_instance_of::<PyBool>() {
        return Ok(IValue::Bool(item.extract()?));
    }
    if let Ok(value) = item.extract::<i64>() {
        return Ok(IValue::Int(value));
    }
    if let Ok(value) = item.extract::<f64>() {
        return Ok(IValue::Float(value));
    }
    Err(PyTypeError::new_err(format!(
        "unsupported operator argument of type '{}'",
        item.get_type().name()?
    )))
}

fn ivalue_to_python(py: Python<'_>, value: IValue) -> PyResult<Py<PyAny>> {
    match value {
        IValue::Tensor(t) => tensor_to_python(py, t),
        IValue::Float(v) => v.into_py_any(py),
        IValue::Int(v) => v.into_py_any(py),
        IValue::Bool(v) => v.into_py_any(py),
    }
}

fn tensor_to_python(py: Python<'_>, tensor: Tensor) -> PyResult<Py<PyAny>> {
    PyTensor::from_tensor(tensor).into_py_any(py)
}

/// Add the operator functions to the extension module
pub fn init_custom_ops_module(parent_module: &Bound<'_, PyModule>) -> PyResult<()> {
    parent_module.add_function(wrap_pyfunction!(muladd_cpp, parent_module)?)?;
    parent_module.add_function(wrap_pyfunction!(call_op, parent_module)?)?;
    parent_module.add_function(wrap_pyfunction!(list_ops, parent_module)?)?;
    parent_module.add_function(wrap_pyfunction!(op_schema, parent_module)?)?;
    parent_module.add_function(wrap_pyfunction!(is_op_registered, parent_module)?)?;
    parent_module.add_function(wrap_pyfunction!(unregister_op, parent_module)?)?;

    Ok(())
}
