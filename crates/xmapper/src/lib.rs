// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # XMapper - generated object-to-object mappers
//!
//! Declare a mapping contract as a trait, derive [`Mappable`] on the types it
//! converts, and let `#[mapper]` generate the implementation. Mappers are
//! created lazily through the [`registry`] and cached per contract and
//! factory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xmapper::{mapper, MapError, Mappable};
//!
//! #[derive(Mappable)]
//! pub struct PersonIn { pub name: String, pub age: u32 }
//!
//! #[derive(Mappable)]
//! pub struct PersonOut { pub name: String, pub age: u32 }
//!
//! #[mapper]
//! pub trait BeanMapper {
//!     fn convert_from(&self, source: PersonIn) -> Result<PersonOut, MapError>;
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     xmapper::register::<BeanMapperImpl>();
//!     let mapper = xmapper::get_mapper::<dyn BeanMapper>()?;
//!     let out = mapper.convert_from(PersonIn { name: "Ada".into(), age: 36 })?;
//!     assert_eq!(out.age, 36);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  #[derive(Mappable)]  #[mapper]            (xmapper-codegen)      |
//! +-------------------------------------------------------------------+
//! |  Registry: (contract, factory) -> instance, at-most-once build    |
//! |  Loader:   "<contract>Impl" -> constructor table                  |
//! +-------------------------------------------------------------------+
//! |  Planner:  contract + type catalog -> MappingPlan | Diagnostics   |
//! |  Analyzer: TypePair -> MappingStrategy                            |
//! +-------------------------------------------------------------------+
//! |  Engine:   MappingPlan over dynamic Values (+ optional Factory)   |
//! +-------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`descriptor`] - type descriptors (primitive, declared, array)
//! - [`analyzer`] - type pair classification
//! - [`catalog`] - bean and enumeration shapes
//! - [`contract`] - contract declarations and options
//! - [`plan`] - plan builder and build diagnostics
//! - [`value`] - dynamic values and the [`Mappable`] trait
//! - [`engine`] - plan execution
//! - [`factory`] - target instance factories
//! - [`loader`] - implementation dispatch table
//! - [`registry`] - mapper cache

// Allow the derive macros to work inside this crate's tests
extern crate self as xmapper;

pub mod analyzer;
pub mod catalog;
pub mod contract;
pub mod descriptor;
pub mod engine;
pub mod factory;
pub mod loader;
pub mod plan;
pub mod registry;
pub mod value;

pub use analyzer::{classify, Analyzer, MappingStrategy, TypePair};
pub use catalog::{BeanShape, EnumShape, Property, TypeCatalog, TypeSupplier};
pub use contract::{ContractMethod, MapperConfig, MappingContract};
pub use descriptor::{ElementKind, PrimitiveKind, TypeDescriptor, TypeKind};
pub use engine::{MapError, MappingEngine, Result};
pub use factory::{Factory, FactoryHandle, FactoryId};
pub use loader::{
    implementation_id, ConstructionError, ImplementationLoader, LoadError, LoaderEntry,
    MapperImplementation, MapperInstance, StaticLoader, IMPLEMENTATION_SUFFIX,
};
pub use plan::{BuildError, BuildErrorKind, Diagnostics, MappingPlan, Planner};
pub use registry::{
    get_mapper, get_mapper_with_factory, global, mapper, register, Contract, MapperBuilder,
    MapperRegistry, RegistryError, RegistryKey, TypedMapperBuilder,
};
pub use value::{BeanValue, EnumValue, Mappable, Value};

pub use xmapper_codegen::{mapper, Mappable};
