// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use crate::{
    custom_ops::{
        execute_custom_op, global_registry, CustomOpRegistry, DispatchKey, IValue, Library,
    },
    error::Result,
    operations::muladd_cpu,
    tensor::Tensor,
};
use once_cell::sync::OnceCell;

/// Namespace the extension's operators live in
pub const NAMESPACE: &str = "extension_cpp";

/// Qualified name of the multiply-add operator
pub const MULADD_OP: &str = "extension_cpp::muladd_cpp";

const MULADD_SCHEMA: &str = "muladd_cpp(Tensor a, Tensor b, float c) -> Tensor";

static LOADED: OnceCell<()> = OnceCell::new();

/// Register the extension's operators with the global registry.
///
/// Runs the registration once per process; later calls return immediately.
pub fn load_extension() -> Result<()> {
    LOADED
        .get_or_try_init(|| -> Result<()> {
            register_into(global_registry())?;
            tracing::info!(namespace = NAMESPACE, "loaded extension");
            Ok(())
        })
        .copied()
}

fn register_into(registry: &CustomOpRegistry) -> Result<()> {
    define_then_implement(registry, |registry| {
        Library::implement_in(registry, NAMESPACE, DispatchKey::Cpu)?.impl_kernel(
            "muladd_cpp",
            |args| {
                let a = args[0].as_tensor()?;
                let b = args[1].as_tensor()?;
                let c = args[2].as_f64()?;
                muladd_cpu(a, b, c).map(IValue::Tensor)
            },
        )?;
        Ok(())
    })
}

/// Define the operator, then run `implement`; a failed implementation step
/// removes the definition again so a later load starts clean.
fn define_then_implement(
    registry: &CustomOpRegistry,
    implement: impl FnOnce(&CustomOpRegistry) -> Result<()>,
) -> Result<()> {
    Library::define_in(registry, NAMESPACE)?.def(MULADD_SCHEMA)?;
    implement(registry).inspect_err(|err| {
        tracing::warn!(
            op = MULADD_OP,
            error = %err,
            "kernel registration failed, removing definition"
        );
        if let Err(cleanup) = registry.unregister(MULADD_OP) {
            tracing::warn!(op = MULADD_OP, error = %cleanup, "could not remove definition");
        }
    })
}

/// Compute `a * b + c` elementwise through the registered operator
pub fn muladd(a: &Tensor, b: &Tensor, c: f64) -> Result<Tensor> {
    load_extension()?;
    execute_custom_op(MULADD_OP, &[IValue::from(a), IValue::from(b), IValue::Float(c)])?
        .into_tensor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custom_ops::is_custom_op_registered;
    use crate::error::ExtensionError;

    #[test]
    fn test_load_is_idempotent() {
        load_extension().unwrap();
        load_extension().unwrap();
        assert!(is_custom_op_registered(MULADD_OP));
        assert!(global_registry().has_kernel(MULADD_OP, DispatchKey::Cpu));
        assert_eq!(
            global_registry().schema(MULADD_OP).unwrap().to_string(),
            MULADD_SCHEMA
        );
    }

    #[test]
    fn test_muladd_example() {
        let a = Tensor::from_slice(&[1.0f32, 2.0, 3.0]);
        let b = Tensor::from_slice(&[4.0f32, 5.0, 6.0]);
        let out = muladd(&a, &b, 2.0).unwrap();
        assert_eq!(out.to_vec::<f32>().unwrap(), vec![6.0, 12.0, 20.0]);
    }

    #[test]
    fn test_failed_kernel_registration_rolls_back() {
        let registry = CustomOpRegistry::new();
        let err = define_then_implement(&registry, |_| Err(ExtensionError::backend_error("no cpu")))
            .unwrap_err();
        assert!(matches!(err, ExtensionError::Backend(_)));
        assert!(!registry.is_registered(MULADD_OP));

        register_into(&registry).unwrap();
        assert!(registry.has_kernel(MULADD_OP, DispatchKey::Cpu));
        let out = registry
            .call(
                MULADD_OP,
                &[
                    IValue::from(&Tensor::from_slice(&[1.0f64, 2.0])),
                    IValue::from(&Tensor::from_slice(&[3.0f64, 4.0])),
                    IValue::Float(1.0),
                ],
            )
            .unwrap()
            .into_tensor()
            .unwrap();
        assert_eq!(out.to_vec::<f64>().unwrap(), vec![4.0, 9.0]);
    }

    #[test]
    fn test_existing_definition_is_left_alone() {
        let registry = CustomOpRegistry::new();
        register_into(&registry).unwrap();
        let err = register_into(&registry).unwrap_err();
        assert!(matches!(err, ExtensionError::DuplicateOperator(_)));
        assert!(registry.has_kernel(MULADD_OP, DispatchKey::Cpu));
    }
}
