// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod custom_ops;
pub mod device;
pub mod error;
pub mod extension;
pub mod operations;
pub mod tensor;

// Re-export core types
pub use config::{config, set_config, EngineConfig};
pub use custom_ops::{
    execute_custom_op, global_registry, is_custom_op_registered, list_custom_ops,
    unregister_custom_op, ArgType, CustomOpRegistry, DispatchKey, IValue, KernelFn, Library,
    OpSchema,
};
pub use device::{Device, DeviceType};
pub use error::{ExtensionError, Result};
pub use extension::{load_extension, muladd, MULADD_OP, NAMESPACE};
pub use tensor::{DataType, Element, Shape, Tensor, TensorData};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
