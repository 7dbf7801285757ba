// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use super::{global_registry, CustomOpRegistry, DispatchKey, IValue, OpSchema};
use crate::error::{ExtensionError, Result};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LibraryKind {
    Def,
    Impl(DispatchKey),
}

/// Registration block for one operator namespace.
///
/// A definition block declares schemas with [`Library::def`]; an
/// implementation block binds kernels for a single dispatch key with
/// [`Library::impl_kernel`].
///
/// ```
/// use engine::custom_ops::{CustomOpRegistry, DispatchKey, IValue, Library};
///
/// let registry = CustomOpRegistry::new();
/// Library::define_in(&registry, "demo")?.def("twice(float x) -> float")?;
/// Library::implement_in(&registry, "demo", DispatchKey::Cpu)?
///     .impl_kernel("twice", |args: &[IValue]| Ok(IValue::Float(args[0].as_f64()? * 2.0)))?;
///
/// let out = registry.call("demo::twice", &[IValue::Float(1.5)])?;
/// assert_eq!(out.as_f64()?, 3.0);
/// # Ok::<(), engine::ExtensionError>(())
/// ```
pub struct Library<'r> {
    registry: &'r CustomOpRegistry,
    namespace: String,
    kind: LibraryKind,
}

impl Library<'static> {
    /// Definition block on the global registry
    pub fn define(namespace: &str) -> Result<Self> {
        Library::define_in(global_registry(), namespace)
    }

    /// Implementation block on the global registry
    pub fn implement(namespace: &str, key: DispatchKey) -> Result<Self> {
        Library::implement_in(global_registry(), namespace, key)
    }
}

impl<'r> Library<'r> {
    pub fn define_in(registry: &'r CustomOpRegistry, namespace: &str) -> Result<Self> {
        Self::open(registry, namespace, LibraryKind::Def)
    }

    pub fn implement_in(
        registry: &'r CustomOpRegistry,
        namespace: &str,
        key: DispatchKey,
    ) -> Result<Self> {
        Self::open(registry, namespace, LibraryKind::Impl(key))
    }

    fn open(registry: &'r CustomOpRegistry, namespace: &str, kind: LibraryKind) -> Result<Self> {
        if !super::schema::is_identifier(namespace) {
            return Err(ExtensionError::invalid_argument(format!(
                "'{namespace}' is not a valid operator namespace"
            )));
        }
        Ok(Self {
            registry,
            namespace: namespace.to_string(),
            kind,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Declare an operator from its textual schema
    pub fn def(&self, schema: &str) -> Result<&Self> {
        if self.kind != LibraryKind::Def {
            return Err(ExtensionError::invalid_operation(format!(
                "cannot define '{schema}' in an implementation block for '{}'",
                self.namespace
            )));
        }
        self.registry.define(&self.namespace, OpSchema::parse(schema)?)?;
        Ok(self)
    }

    /// Bind `kernel` to the unqualified operator `name` for this block's key
    pub fn impl_kernel<F>(&self, name: &str, kernel: F) -> Result<&Self>
    where
        F: Fn(&[IValue]) -> Result<IValue> + Send + Sync + 'static,
    {
        let LibraryKind::Impl(key) = self.kind else {
            return Err(ExtensionError::invalid_operation(format!(
                "cannot implement '{name}' in the definition block for '{}'",
                self.namespace
            )));
        };
        let qualified = format!("{}::{name}", self.namespace);
        self.registry.register_kernel(&qualified, key, Arc::new(kernel))?;
        Ok(self)
    }
}
