// Copyright (c) 2026 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

impl std::fmt::Display for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements = format_elements(&self.data);
        let width = elements.iter().map(String::len).max().unwrap_or(0);
        let mut out = String::from("tensor(");
        write_nested(&mut out, &elements, self.shape.dims(), width, 0, "tensor(".len());
        if !self.dtype.is_float() || self.dtype == DataType::Float64 {
            out.push_str(&format!(", dtype={}", self.dtype));
        }
        if !self.device.is_cpu() {
            out.push_str(&format!(", device='{}'", self.device));
        }
        out.push(')');
        f.write_str(&out)
    }
}

fn format_elements(data: &TensorData) -> Vec<String> {
    fn floats<T: Copy + Into<f64>>(values: &[T]) -> Vec<String> {
        let finite = || {
            values
                .iter()
                .map(|&v| Into::<f64>::into(v))
                .filter(|v| v.is_finite())
        };
        let integral = finite().all(|v| v.fract() == 0.0);
        let max_abs = finite().map(f64::abs).fold(0.0, f64::max);
        let min_abs = finite()
            .map(f64::abs)
            .filter(|&v| v > 0.0)
            .fold(f64::INFINITY, f64::min);
        let scientific = max_abs >= 1e8 || (!integral && min_abs < 1e-4);

        values
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                if v.is_nan() {
                    "nan".to_string()
                } else if v.is_infinite() {
                    if v > 0.0 { "inf" } else { "-inf" }.to_string()
                } else if scientific {
                    exponent_form(v)
                } else if integral {
                    format!("{v:.0}.")
                } else {
                    format!("{v:.4}")
                }
            })
            .collect()
    }

    match data.dtype() {
        DataType::Float32 => floats(data.as_f32_slice().unwrap_or_default()),
        DataType::Float64 => floats(data.as_f64_slice().unwrap_or_default()),
        DataType::Int32 => data
            .as_i32_slice()
            .unwrap_or_default()
            .iter()
            .map(i32::to_string)
            .collect(),
        DataType::Int64 => data
            .as_i64_slice()
            .unwrap_or_default()
            .iter()
            .map(i64::to_string)
            .collect(),
        DataType::Bool => data
            .as_bool_slice()
            .unwrap_or_default()
            .iter()
            .map(|&b| if b { "True" } else { "False" }.to_string())
            .collect(),
    }
}

/// `1.0000e+10` style: signed, at least two exponent digits
fn exponent_form(v: f64) -> String {
    let formatted = format!("{v:.4e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

fn write_nested(
    out: &mut String,
    elements: &[String],
    dims: &[usize],
    width: usize,
    depth: usize,
    indent: usize,
) {
    let Some((&len, rest)) = dims.split_first() else {
        if let Some(value) = elements.first() {
            out.push_str(value);
        }
        return;
    };

    let chunk = rest.iter().product::<usize>();
    out.push('[');
    for i in 0..len {
        if i > 0 {
            if rest.is_empty() {
                out.push_str(", ");
            } else {
                out.push(',');
                out.push_str(&"\n".repeat(rest.len()));
                out.push_str(&" ".repeat(indent + depth + 1));
            }
        }
        if rest.is_empty() {
            out.push_str(&format!("{:>width$}", elements[i]));
        } else {
            let start = i * chunk;
            write_nested(out, &elements[start..start + chunk], rest, width, depth + 1, indent);
        }
    }
    out.push(']');
}

#[cfg(test)]
mod utils_tests {
    use super::*;

    #[test]
    fn test_display_vector() {
        let t = Tensor::from_slice(&[6.0f32, 12.0, 20.0]);
        assert_eq!(t.to_string(), "tensor([ 6., 12., 20.])");
    }

    #[test]
    fn test_display_matrix() {
        let t = Tensor::from_vec(vec![1.5f32, 2.0, 3.0, 4.25], vec![2, 2], Device::cpu()).unwrap();
        assert_eq!(t.to_string(), "tensor([[1.5000, 2.0000],\n        [3.0000, 4.2500]])");
    }

    #[test]
    fn test_display_scalar_and_dtype() {
        assert_eq!(Tensor::scalar(2.0f64).to_string(), "tensor(2., dtype=float64)");
        assert_eq!(Tensor::from_slice(&[1i64, -2]).to_string(), "tensor([ 1, -2], dtype=int64)");
    }

    #[test]
    fn test_display_large_and_small_magnitudes() {
        let t = Tensor::from_slice(&[1e10f32, 1.0]);
        assert_eq!(t.to_string(), "tensor([1.0000e+10, 1.0000e+00])");

        let t = Tensor::from_slice(&[1e-5f32, 1.0]);
        assert_eq!(t.to_string(), "tensor([1.0000e-05, 1.0000e+00])");

        let t = Tensor::from_slice(&[1e120f64, -3.0]);
        assert_eq!(t.to_string(), "tensor([1.0000e+120, -3.0000e+00], dtype=float64)");
    }

    #[test]
    fn test_display_device() {
        let t = Tensor::from_slice(&[1.0f32]).to_device(Device::cuda(0));
        assert_eq!(t.to_string(), "tensor([1.], device='cuda:0')");
    }
}
