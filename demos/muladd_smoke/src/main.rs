// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use engine::{Result, Tensor, muladd};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let x = Tensor::from_slice(&[1.0f32, 2.0, 3.0]);
    let y = Tensor::from_slice(&[4.0f32, 5.0, 6.0]);
    let z = 2.0;

    let result = muladd(&x, &y, z)?;
    tracing::debug!(shape = %result.shape(), dtype = %result.dtype(), "computed muladd");
    println!("{result}"); // tensor([ 6., 12., 20.])
    Ok(())
}
