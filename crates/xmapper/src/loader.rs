// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Implementation loading.
//!
//! Every contract has one generated implementation, registered under the
//! contract identifier plus [`IMPLEMENTATION_SUFFIX`]. The [`StaticLoader`]
//! is the dispatch table from implementation identifiers to constructor
//! functions: one taking no arguments and, separately, one taking a
//! factory. Which one runs is decided by whether a factory was supplied.
//!
//! ```text
//! "app::BeanMapper" --suffix--> "app::BeanMapperImpl" --table--> LoaderEntry
//!                                                               +-- construct()
//!                                                               +-- construct_with_factory(f)
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::factory::FactoryHandle;

/// Suffix appended to a contract identifier to name its implementation.
pub const IMPLEMENTATION_SUFFIX: &str = "Impl";

/// Implementation identifier for `contract_id`.
pub fn implementation_id(contract_id: &str) -> String {
    format!("{}{}", contract_id, IMPLEMENTATION_SUFFIX)
}

/// A constructed mapper, type-erased.
#[derive(Clone)]
pub struct MapperInstance {
    inner: Arc<dyn Any + Send + Sync>,
}

impl MapperInstance {
    pub fn new<T: Any + Send + Sync>(mapper: T) -> Self {
        Self {
            inner: Arc::new(mapper),
        }
    }

    /// Concrete implementation, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Whether both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &MapperInstance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for MapperInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapperInstance({:p})", Arc::as_ptr(&self.inner))
    }
}

/// Why an implementation could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No implementation is registered under the identifier.
    #[error("implementation {implementation} not found")]
    NotFound { implementation: String },

    /// The implementation refused to be instantiated.
    #[error("instantiation of {implementation} failed: {reason}")]
    Instantiation {
        implementation: String,
        reason: String,
    },

    /// The implementation has no constructor for the requested path.
    #[error("{implementation} has no {} constructor", constructor_kind(.with_factory))]
    NoCompatibleConstructor {
        implementation: String,
        with_factory: bool,
    },

    /// The constructor panicked.
    #[error("constructor of {implementation} panicked: {message}")]
    ConstructorPanicked {
        implementation: String,
        message: String,
    },
}

/// Failure reported by a constructor function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConstructionError(pub String);

impl ConstructionError {
    pub fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

/// A mapper implementation the loader can construct.
///
/// Implemented by `#[mapper]` for the generated `<Contract>Impl` type.
pub trait MapperImplementation: Any + Send + Sync + Sized {
    /// Identifier of the contract this type implements.
    const CONTRACT_ID: &'static str;

    fn construct() -> Result<Self, ConstructionError>;

    fn construct_with_factory(factory: FactoryHandle) -> Result<Self, ConstructionError>;
}

/// Default construction path.
pub type Constructor = fn() -> Result<MapperInstance, ConstructionError>;

/// Factory-accepting construction path.
pub type FactoryConstructor = fn(FactoryHandle) -> Result<MapperInstance, ConstructionError>;

/// Dispatch table entry for one implementation.
#[derive(Debug, Clone)]
pub struct LoaderEntry {
    pub implementation: String,
    pub construct: Option<Constructor>,
    pub construct_with_factory: Option<FactoryConstructor>,
}

impl LoaderEntry {
    /// Entry for the implementation of `contract_id`, with no constructors yet.
    pub fn for_contract(contract_id: &str) -> Self {
        Self {
            implementation: implementation_id(contract_id),
            construct: None,
            construct_with_factory: None,
        }
    }

    /// Entry with both construction paths of `T`.
    pub fn of<T: MapperImplementation>() -> Self {
        Self::for_contract(T::CONTRACT_ID)
            .with_constructor(|| T::construct().map(MapperInstance::new))
            .with_factory_constructor(|factory| {
                T::construct_with_factory(factory).map(MapperInstance::new)
            })
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.construct = Some(constructor);
        self
    }

    pub fn with_factory_constructor(mut self, constructor: FactoryConstructor) -> Self {
        self.construct_with_factory = Some(constructor);
        self
    }
}

/// Resolves contract identifiers to constructed mapper instances.
pub trait ImplementationLoader: Send + Sync {
    fn load(
        &self,
        contract_id: &str,
        factory: Option<&FactoryHandle>,
    ) -> Result<MapperInstance, LoadError>;
}

/// Dispatch table of registered implementations.
#[derive(Debug, Default)]
pub struct StaticLoader {
    entries: RwLock<HashMap<String, LoaderEntry>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the generated implementation `T`.
    pub fn register<T: MapperImplementation>(&self) {
        self.register_entry(LoaderEntry::of::<T>());
    }

    /// Register (or replace) an entry.
    pub fn register_entry(&self, entry: LoaderEntry) {
        log::debug!("[XMapper] registered implementation {}", entry.implementation);
        self.entries.write().insert(entry.implementation.clone(), entry);
    }

    /// Remove the implementation of `contract_id`.
    pub fn unregister(&self, contract_id: &str) -> Option<LoaderEntry> {
        self.entries.write().remove(&implementation_id(contract_id))
    }

    pub fn contains(&self, contract_id: &str) -> bool {
        self.entries
            .read()
            .contains_key(&implementation_id(contract_id))
    }
}

impl ImplementationLoader for StaticLoader {
    fn load(
        &self,
        contract_id: &str,
        factory: Option<&FactoryHandle>,
    ) -> Result<MapperInstance, LoadError> {
        let implementation = implementation_id(contract_id);
        // Copy the function pointers out so the table lock is not held
        // while user code runs.
        let entry = self
            .entries
            .read()
            .get(&implementation)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                implementation: implementation.clone(),
            })?;

        let outcome = match factory {
            Some(factory) => {
                let construct =
                    entry
                        .construct_with_factory
                        .ok_or_else(|| LoadError::NoCompatibleConstructor {
                            implementation: implementation.clone(),
                            with_factory: true,
                        })?;
                let factory = factory.clone();
                panic::catch_unwind(AssertUnwindSafe(move || construct(factory)))
            }
            None => {
                let construct = entry
                    .construct
                    .ok_or_else(|| LoadError::NoCompatibleConstructor {
                        implementation: implementation.clone(),
                        with_factory: false,
                    })?;
                panic::catch_unwind(construct)
            }
        };

        match outcome {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(err)) => Err(LoadError::Instantiation {
                implementation,
                reason: err.0,
            }),
            Err(payload) => Err(LoadError::ConstructorPanicked {
                implementation,
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn constructor_kind(with_factory: &bool) -> &'static str {
    if *with_factory {
        "factory-accepting"
    } else {
        "default"
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
