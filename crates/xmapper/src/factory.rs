// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Caller-supplied construction hook for target beans.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::value::Value;

/// Supplies fresh target bean instances.
///
/// Mappers built with a factory ask it for every bean they produce and only
/// fall back to the target's default value when it returns `None`. Planned
/// properties are written over whatever the factory supplied; properties
/// left unmapped, and enum properties whose source constant has no
/// counterpart, keep the factory's values.
pub trait Factory: Send + Sync {
    fn new_instance(&self, target: &TypeDescriptor) -> Option<Value>;
}

impl<F> Factory for F
where
    F: Fn(&TypeDescriptor) -> Option<Value> + Send + Sync,
{
    fn new_instance(&self, target: &TypeDescriptor) -> Option<Value> {
        self(target)
    }
}

/// Identity of a factory instance.
///
/// Two handles share an identity exactly when they point at the same
/// factory allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryId(usize);

impl fmt::Display for FactoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "factory@{:#x}", self.0)
    }
}

/// Shared, identity-carrying reference to a [`Factory`].
#[derive(Clone)]
pub struct FactoryHandle {
    inner: Arc<dyn Factory>,
}

impl FactoryHandle {
    pub fn new(factory: Arc<dyn Factory>) -> Self {
        Self { inner: factory }
    }

    /// Wrap a concrete factory.
    pub fn from_factory<F: Factory + 'static>(factory: F) -> Self {
        Self::new(Arc::new(factory))
    }

    pub fn id(&self) -> FactoryId {
        FactoryId(Arc::as_ptr(&self.inner).cast::<()>() as usize)
    }

    pub fn factory(&self) -> &Arc<dyn Factory> {
        &self.inner
    }

    pub fn new_instance(&self, target: &TypeDescriptor) -> Option<Value> {
        self.inner.new_instance(target)
    }
}

impl From<Arc<dyn Factory>> for FactoryHandle {
    fn from(factory: Arc<dyn Factory>) -> Self {
        Self::new(factory)
    }
}

impl fmt::Debug for FactoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FactoryHandle").field(&self.id()).finish()
    }
}
