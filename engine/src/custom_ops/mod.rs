// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

pub mod library;
pub mod schema;
pub mod value;

pub use library::Library;
pub use schema::{ArgType, Argument, OpSchema};
pub use value::IValue;

use crate::{
    device::DeviceType,
    error::{ExtensionError, Result},
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::{fmt, sync::Arc};

/// Native implementation bound to an operator for one dispatch key
pub type KernelFn = Arc<dyn Fn(&[IValue]) -> Result<IValue> + Send + Sync>;

/// Device class used to pick a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchKey {
    Cpu,
    Cuda,
}

impl From<DeviceType> for DispatchKey {
    fn from(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Cpu => DispatchKey::Cpu,
            DeviceType::Cuda => DispatchKey::Cuda,
        }
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DispatchKey::Cpu => "CPU",
            DispatchKey::Cuda => "CUDA",
        })
    }
}

struct OperatorEntry {
    schema: Arc<OpSchema>,
    kernels: FxHashMap<DispatchKey, KernelFn>,
}

/// Name-keyed table of operator schemas and their per-device kernels.
///
/// Operators are addressed by qualified name `namespace::name`.
#[derive(Default)]
pub struct CustomOpRegistry {
    operators: RwLock<FxHashMap<String, OperatorEntry>>,
}

impl CustomOpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under `namespace`, returning the qualified name
    pub fn define(&self, namespace: &str, schema: OpSchema) -> Result<String> {
        if !schema::is_identifier(namespace) {
            return Err(ExtensionError::invalid_argument(format!(
                "'{namespace}' is not a valid operator namespace"
            )));
        }

        let qualified = format!("{namespace}::{}", schema.name());
        let mut operators = self.operators.write();
        if operators.contains_key(&qualified) {
            return Err(ExtensionError::duplicate_operator(qualified));
        }

        tracing::debug!(op = %qualified, schema = %schema, "defined operator");
        operators.insert(
            qualified.clone(),
            OperatorEntry {
                schema: Arc::new(schema),
                kernels: FxHashMap::default(),
            },
        );
        Ok(qualified)
    }

    /// Attach a kernel to an already defined operator
    pub fn register_kernel(&self, qualified: &str, key: DispatchKey, kernel: KernelFn) -> Result<()> {
        let mut operators = self.operators.write();
        let entry = operators
            .get_mut(qualified)
            .ok_or_else(|| ExtensionError::unknown_operator(qualified))?;

        if entry.kernels.contains_key(&key) {
            return Err(ExtensionError::duplicate_kernel(qualified, key.to_string()));
        }

        tracing::debug!(op = %qualified, %key, "registered kernel");
        entry.kernels.insert(key, kernel);
        Ok(())
    }

    /// Remove an operator together with all of its kernels
    pub fn unregister(&self, qualified: &str) -> Result<()> {
        self.operators
            .write()
            .remove(qualified)
            .map(|_| tracing::debug!(op = %qualified, "unregistered operator"))
            .ok_or_else(|| ExtensionError::unknown_operator(qualified))
    }

    pub fn schema(&self, qualified: &str) -> Result<Arc<OpSchema>> {
        self.operators
            .read()
            .get(qualified)
            .map(|entry| entry.schema.clone())
            .ok_or_else(|| ExtensionError::unknown_operator(qualified))
    }

    pub fn is_registered(&self, qualified: &str) -> bool {
        self.operators.read().contains_key(qualified)
    }

    pub fn has_kernel(&self, qualified: &str, key: DispatchKey) -> bool {
        self.operators
            .read()
            .get(qualified)
            .is_some_and(|entry| entry.kernels.contains_key(&key))
    }

    /// Sorted qualified names, optionally restricted to one namespace
    pub fn list(&self, namespace: Option<&str>) -> Vec<String> {
        let mut names: Vec<String> = self
            .operators
            .read()
            .keys()
            .filter(|name| match namespace {
                Some(ns) => name
                    .split_once("::")
                    .is_some_and(|(prefix, _)| prefix == ns),
                None => true,
            })
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }

    /// Invoke an operator.
    ///
    /// Arguments are checked against the schema, the kernel is chosen from the
    /// device of the first tensor argument (CPU when there is none) and the
    /// returned value must match the schema's return type.
    pub fn call(&self, qualified: &str, args: &[IValue]) -> Result<IValue> {
        let key = args
            .iter()
            .find_map(|arg| match arg {
                IValue::Tensor(t) => Some(DispatchKey::from(t.device().device_type())),
                _ => None,
            })
            .unwrap_or(DispatchKey::Cpu);

        let (schema, kernel) = {
            let operators = self.operators.read();
            let entry = operators
                .get(qualified)
                .ok_or_else(|| ExtensionError::unknown_operator(qualified))?;
            let kernel = entry.kernels.get(&key).cloned().ok_or_else(|| {
                ExtensionError::backend_error(format!(
                    "no kernel registered for '{qualified}' on {key}"
                ))
            })?;
            (entry.schema.clone(), kernel)
        };

        schema.check_args(args)?;
        tracing::trace!(op = %qualified, %key, "dispatching");

        let output = kernel(args)?;
        if output.kind() != schema.returns() {
            return Err(ExtensionError::internal_error(format!(
                "kernel for '{qualified}' returned {}, schema declares {}",
                output.kind(),
                schema.returns()
            )));
        }
        Ok(output)
    }
}

static GLOBAL_REGISTRY: Lazy<CustomOpRegistry> = Lazy::new(CustomOpRegistry::new);

/// The process-wide operator registry
pub fn global_registry() -> &'static CustomOpRegistry {
    &GLOBAL_REGISTRY
}

/// Invoke an operator from the global registry
pub fn execute_custom_op(qualified: &str, args: &[IValue]) -> Result<IValue> {
    global_registry().call(qualified, args)
}

pub fn list_custom_ops() -> Vec<String> {
    global_registry().list(None)
}

pub fn is_custom_op_registered(qualified: &str) -> bool {
    global_registry().is_registered(qualified)
}

pub fn unregister_custom_op(qualified: &str) -> Result<()> {
    global_registry().unregister(qualified)
}
