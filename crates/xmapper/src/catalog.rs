// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shapes of declared types.
//!
//! The analyzer only needs descriptors; resolving a `NestedBean` or an
//! `EnumByName` pair additionally needs the properties of a bean or the
//! constants of an enumeration. A [`TypeSupplier`] provides them.

use std::collections::HashMap;

use crate::descriptor::TypeDescriptor;
use crate::value::Value;

/// A named, typed bean property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub type_desc: TypeDescriptor,
}

impl Property {
    pub fn new(name: impl Into<String>, type_desc: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Properties of a bean type, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanShape {
    pub descriptor: TypeDescriptor,
    pub properties: Vec<Property>,
    /// Value a fresh instance starts from, when known.
    pub default: Option<Value>,
}

impl BeanShape {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Constants of an enumeration type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    pub descriptor: TypeDescriptor,
    pub constants: Vec<String>,
}

impl EnumShape {
    pub fn contains(&self, constant: &str) -> bool {
        self.constants.iter().any(|c| c == constant)
    }
}

/// Source of bean and enumeration shapes, keyed by canonical name.
pub trait TypeSupplier {
    fn bean(&self, name: &str) -> Option<&BeanShape>;

    fn enumeration(&self, name: &str) -> Option<&EnumShape>;
}

/// [`HashMap`]-backed [`TypeSupplier`].
///
/// Filled by `Mappable::describe` for derived types, or directly by tools
/// that read type information from elsewhere.
#[derive(Debug, Default, Clone)]
pub struct TypeCatalog {
    beans: HashMap<String, BeanShape>,
    enums: HashMap<String, EnumShape>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a shape is already registered under `name`.
    ///
    /// `describe` implementations check this before recursing, which is
    /// what keeps self-referencing beans from looping.
    pub fn contains(&self, name: &str) -> bool {
        self.beans.contains_key(name) || self.enums.contains_key(name)
    }

    /// Register a bean shape. Returns `false` if the name was taken.
    pub fn insert_bean(
        &mut self,
        descriptor: TypeDescriptor,
        properties: Vec<Property>,
        default: Option<Value>,
    ) -> bool {
        if self.contains(descriptor.name()) {
            return false;
        }
        self.beans.insert(
            descriptor.name().to_string(),
            BeanShape {
                descriptor,
                properties,
                default,
            },
        );
        true
    }

    /// Register an enumeration shape. Returns `false` if the name was taken.
    pub fn insert_enum(&mut self, descriptor: TypeDescriptor, constants: Vec<String>) -> bool {
        if self.contains(descriptor.name()) {
            return false;
        }
        self.enums.insert(
            descriptor.name().to_string(),
            EnumShape {
                descriptor,
                constants,
            },
        );
        true
    }

    /// Merge every shape of `other` not already present.
    pub fn extend(&mut self, other: TypeCatalog) {
        for (name, shape) in other.beans {
            if !self.contains(&name) {
                self.beans.insert(name, shape);
            }
        }
        for (name, shape) in other.enums {
            if !self.contains(&name) {
                self.enums.insert(name, shape);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.beans.len() + self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeSupplier for TypeCatalog {
    fn bean(&self, name: &str) -> Option<&BeanShape> {
        self.beans.get(name)
    }

    fn enumeration(&self, name: &str) -> Option<&EnumShape> {
        self.enums.get(name)
    }
}
