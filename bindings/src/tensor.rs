// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use crate::dtype;
use crate::error::_convert_error;
use engine::{DataType, Device, Element, Shape, Tensor};
use numpy::{PyArray, PyArrayDyn, PyArrayMethods, PyUntypedArrayMethods};
use pyo3::conversion::IntoPyObjectExt;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyList, PySequence, PyString};

/// Python wrapper around an engine tensor
#[pyclass(name = "Tensor", module = "extension_cpp")]
pub struct PyTensor {
    inner: Tensor,
}

impl PyTensor {
    pub fn from_tensor(inner: Tensor) -> Self {
        Self { inner }
    }

    pub fn tensor(&self) -> &Tensor {
        &self.inner
    }
}

#[pymethods]
impl PyTensor {
    /// Build a CPU tensor from a NumPy array, a nested list/tuple or a number
    #[new]
    #[pyo3(signature = (data, dtype=None))]
    fn new(data: &Bound<'_, PyAny>, dtype: Option<&str>) -> PyResult<Self> {
        let explicit = dtype.map(dtype::parse_dtype).transpose()?;

        if let Ok(array) = data.cast::<PyArrayDyn<f32>>() {
            let values: Vec<f32> = array.readonly().as_array().iter().copied().collect();
            let shape = array.shape().to_vec();
            return build_tensor(values, shape, explicit.unwrap_or(DataType::Float32))
                .map(Self::from_tensor);
        }

        if let Ok(array) = data.cast::<PyArrayDyn<f64>>() {
            let values: Vec<f64> = array.readonly().as_array().iter().copied().collect();
            let shape = array.shape().to_vec();
            return build_tensor(values, shape, explicit.unwrap_or(DataType::Float64))
                .map(Self::from_tensor);
        }

        let mut flat = FlatData::default();
        flat.push(data, 0)?;
        let dtype = dtype::resolve_dtype_arg(dtype)?;
        build_tensor(flat.values, flat.shape, dtype).map(Self::from_tensor)
    }

    #[getter]
    fn shape(&self) -> Vec<usize> {
        self.inner.shape().dims().to_vec()
    }

    #[getter]
    fn dtype(&self) -> &'static str {
        self.inner.dtype().name()
    }

    #[getter]
    fn device(&self) -> String {
        self.inner.device().to_string()
    }

    fn numel(&self) -> usize {
        self.inner.numel()
    }

    /// Nested Python lists with the tensor's values
    fn tolist(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let dims = self.inner.shape().dims();
        match self.inner.dtype() {
            DataType::Float32 => nest(py, self.values::<f32>()?, dims),
            DataType::Float64 => nest(py, self.values::<f64>()?, dims),
            DataType::Int32 => nest(py, self.values::<i32>()?, dims),
            DataType::Int64 => nest(py, self.values::<i64>()?, dims),
            DataType::Bool => nest(py, self.values::<bool>()?, dims),
        }
    }

    /// Copy into a new NumPy array
    fn numpy(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let dims = self.inner.shape().dims().to_vec();
        match self.inner.dtype() {
            DataType::Float32 => to_numpy(py, self.values::<f32>()?.to_vec(), dims),
            DataType::Float64 => to_numpy(py, self.values::<f64>()?.to_vec(), dims),
            DataType::Int32 => to_numpy(py, self.values::<i32>()?.to_vec(), dims),
            DataType::Int64 => to_numpy(py, self.values::<i64>()?.to_vec(), dims),
            DataType::Bool => to_numpy(py, self.values::<bool>()?.to_vec(), dims),
        }
    }

    /// Retag the tensor for another device (`"cpu"` or `"cuda"`/`"cuda:N"`)
    fn to(&self, device: &str) -> PyResult<Self> {
        let device = match device.split_once(':') {
            None if device == "cpu" => Device::cpu(),
            None if device == "cuda" => Device::cuda(0),
            Some(("cuda", id)) => Device::cuda(id.parse().map_err(|_| {
                PyValueError::new_err(format!("invalid device ordinal '{id}'"))
            })?),
            _ => return Err(PyValueError::new_err(format!("unknown device '{device}'"))),
        };
        Ok(Self::from_tensor(self.inner.to_device(device)))
    }

    fn __len__(&self) -> PyResult<usize> {
        self.inner
            .shape()
            .dims()
            .first()
            .copied()
            .ok_or_else(|| PyTypeError::new_err("len() of a 0-d tensor"))
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

impl PyTensor {
    fn values<T: Element>(&self) -> PyResult<&[T]> {
        self.inner.as_slice::<T>().map_err(_convert_error)
    }
}

fn build_tensor<T: Into<f64>>(
    values: Vec<T>,
    shape: Vec<usize>,
    dtype: DataType,
) -> PyResult<Tensor> {
    let shape = Shape::new(shape);
    let device = Device::cpu();
    let values = values.into_iter().map(Into::<f64>::into);
    match dtype {
        DataType::Float32 => Tensor::from_vec(values.map(|v| v as f32).collect::<Vec<_>>(), shape, device),
        DataType::Float64 => Tensor::from_vec(values.collect::<Vec<_>>(), shape, device),
        DataType::Int32 => Tensor::from_vec(values.map(|v| v as i32).collect::<Vec<_>>(), shape, device),
        DataType::Int64 => Tensor::from_vec(values.map(|v| v as i64).collect::<Vec<_>>(), shape, device),
        DataType::Bool => Tensor::from_vec(values.map(|v| v != 0.0).collect::<Vec<_>>(), shape, device),
    }
    .map_err(_convert_error)
}

/// Row-major flattening of nested sequences
#[derive(Default)]
struct FlatData {
    shape: Vec<usize>,
    values: Vec<f64>,
    /// Depth at which scalars were found, once known
    leaf_depth: Option<usize>,
}

impl FlatData {
    fn push(&mut self, obj: &Bound<'_, PyAny>, depth: usize) -> PyResult<()> {
        if !obj.is_instance_of::<PyString>()
            && let Ok(seq) = obj.cast::<PySequence>()
        {
            if self.leaf_depth.is_some_and(|leaf| depth >= leaf) {
                return Err(PyValueError::new_err(format!(
                    "expected a scalar at dim {depth}, found a sequence"
                )));
            }

            let len = seq.len()?;
            if depth == self.shape.len() {
                self.shape.push(len);
            } else if self.shape[depth] != len {
                return Err(PyValueError::new_err(format!(
                    "expected sequence of length {} at dim {depth} (got {len})",
                    self.shape[depth]
                )));
            }
            for item in seq.try_iter()? {
                self.push(&item?, depth + 1)?;
            }
            return Ok(());
        }

        if depth < self.shape.len() || self.leaf_depth.is_some_and(|leaf| leaf != depth) {
            return Err(PyValueError::new_err(format!(
                "expected a sequence at dim {depth}, found a scalar"
            )));
        }
        self.leaf_depth = Some(depth);

        let value = obj.extract::<f64>().map_err(|_| {
            PyTypeError::new_err(format!(
                "could not convert '{}' to a tensor element",
                obj.get_type().name().map(|n| n.to_string()).unwrap_or_default()
            ))
        })?;
        self.values.push(value);
        Ok(())
    }
}

fn nest<T>(py: Python<'_>, values: &[T], dims: &[usize]) -> PyResult<Py<PyAny>>
where
    T: Copy + for<'py> IntoPyObject<'py>,
{
    let Some((&len, rest)) = dims.split_first() else {
        return values[0].into_py_any(py);
    };
    let chunk = rest.iter().product::<usize>();
    let items = (0..len)
        .map(|i| nest(py, &values[i * chunk..(i + 1) * chunk], rest))
        .collect::<PyResult<Vec<_>>>()?;
    PyList::new(py, items)?.into_py_any(py)
}

fn to_numpy<T: numpy::Element>(py: Python<'_>, values: Vec<T>, dims: Vec<usize>) -> PyResult<Py<PyAny>> {
    let array = PyArray::from_vec(py, values).reshape(dims)?;
    Ok(array.into_any().unbind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_from_nested_list() {
        Python::initialize();
        Python::attach(|py| {
            let data = py.eval(c"[[1.0, 2.0], [3, 4]]", None, None).unwrap();
            let tensor = PyTensor::new(&data, None).unwrap();
            assert_eq!(tensor.shape(), vec![2, 2]);
            assert_eq!(tensor.dtype(), "float32");
            assert_eq!(
                tensor.tensor().to_vec::<f32>().unwrap(),
                vec![1.0, 2.0, 3.0, 4.0]
            );
        });
    }

    #[test]
    fn test_ragged_list_rejected() {
        Python::initialize();
        Python::attach(|py| {
            let data = py.eval(c"[[1.0, 2.0], [3.0]]", None, None).unwrap();
            let err = PyTensor::new(&data, None).err().unwrap();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }

    #[test]
    fn test_scalar_before_sublist_rejected() {
        Python::initialize();
        Python::attach(|py| {
            for ragged in [c"[1.0, [2.0]]", c"[[1.0], 2.0]", c"[[], 1.0]"] {
                let data = py.eval(ragged, None, None).unwrap();
                let err = PyTensor::new(&data, None).err().unwrap();
                assert!(err.is_instance_of::<PyValueError>(py), "{ragged:?}");
            }
        });
    }

    #[test]
    fn test_numpy_array_input() {
        Python::initialize();
        Python::attach(|py| {
            let array = PyArray::from_vec(py, vec![1.0f64, 2.0, 3.0, 4.0])
                .reshape(vec![2, 2])
                .unwrap();
            let tensor = PyTensor::new(array.as_any(), None).unwrap();
            assert_eq!(tensor.shape(), vec![2, 2]);
            assert_eq!(tensor.dtype(), "float64");
            assert_eq!(
                tensor.tensor().to_vec::<f64>().unwrap(),
                vec![1.0, 2.0, 3.0, 4.0]
            );
        });
    }

    #[test]
    fn test_scalar_and_explicit_dtype() {
        Python::initialize();
        Python::attach(|py| {
            let data = py.eval(c"2.5", None, None).unwrap();
            let tensor = PyTensor::new(&data, Some("float64")).unwrap();
            assert!(tensor.shape().is_empty());
            assert_eq!(tensor.dtype(), "float64");
            assert_eq!(tensor.__repr__(), "tensor(2.5000, dtype=float64)");
        });
    }
}
