// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values and the [`Mappable`] bridge.
//!
//! Generated mappers never touch user types directly: a source value is
//! lowered to a [`Value`] with [`Mappable::into_value`], converted by the
//! [`crate::engine::MappingEngine`], and raised back with
//! [`Mappable::from_value`].

use std::collections::BTreeMap;

use crate::catalog::TypeCatalog;
use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::engine::MapError;

/// A dynamic value of any mappable type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Primitives
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),

    // Declared
    String(String),
    Bean(BeanValue),
    Enum(EnumValue),

    // Composite
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "String",
            Self::Bean(_) => "bean",
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
        }
    }

    /// Zero value of a primitive kind.
    pub fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => Self::Bool(false),
            PrimitiveKind::Char => Self::Char('\0'),
            PrimitiveKind::I8 => Self::I8(0),
            PrimitiveKind::I16 => Self::I16(0),
            PrimitiveKind::I32 => Self::I32(0),
            PrimitiveKind::I64 => Self::I64(0),
            PrimitiveKind::U8 => Self::U8(0),
            PrimitiveKind::U16 => Self::U16(0),
            PrimitiveKind::U32 => Self::U32(0),
            PrimitiveKind::U64 => Self::U64(0),
            PrimitiveKind::F32 => Self::F32(0.0),
            PrimitiveKind::F64 => Self::F64(0.0),
        }
    }

    pub fn into_bean(self) -> Result<BeanValue, MapError> {
        match self {
            Self::Bean(bean) => Ok(bean),
            other => Err(MapError::type_mismatch("bean", &other)),
        }
    }

    pub fn into_enum(self) -> Result<EnumValue, MapError> {
        match self {
            Self::Enum(constant) => Ok(constant),
            other => Err(MapError::type_mismatch("enum", &other)),
        }
    }

    pub fn into_array(self) -> Result<Vec<Value>, MapError> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(MapError::type_mismatch("array", &other)),
        }
    }
}

/// Property bag of a bean instance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeanValue {
    /// Canonical name of the bean type.
    pub type_name: String,
    /// Property values, keyed by property name.
    pub properties: BTreeMap<String, Value>,
}

impl BeanValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Remove and return a property, failing if it is absent.
    pub fn take(&mut self, name: &str) -> Result<Value, MapError> {
        self.properties
            .remove(name)
            .ok_or_else(|| MapError::MissingValue {
                bean: self.type_name.clone(),
                property: name.to_string(),
            })
    }
}

/// A constant of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub type_name: String,
    pub constant: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, constant: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            constant: constant.into(),
        }
    }
}

/// A type that generated mappers can convert.
///
/// Implemented here for the primitives, `String` and `Vec<T>`; user beans
/// and enumerations get it from `#[derive(Mappable)]`.
pub trait Mappable: Sized {
    /// Descriptor of the type.
    fn type_descriptor() -> TypeDescriptor;

    /// Register the shape of this type, and of every type it reaches, in
    /// `catalog`. Primitives and strings have no shape to register.
    fn describe(_catalog: &mut TypeCatalog) {}

    /// Lower to a dynamic value.
    fn into_value(self) -> Value;

    /// Raise from a dynamic value.
    fn from_value(value: Value) -> Result<Self, MapError>;

    /// Default value: zero, empty, first constant, or a bean of defaults.
    fn default_value() -> Value;
}

macro_rules! impl_primitive_mappable {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Mappable for $ty {
                fn type_descriptor() -> TypeDescriptor {
                    TypeDescriptor::primitive(PrimitiveKind::$variant)
                }

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Result<Self, MapError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(MapError::type_mismatch(stringify!($ty), &other)),
                    }
                }

                fn default_value() -> Value {
                    Value::zero(PrimitiveKind::$variant)
                }
            }
        )*
    };
}

impl_primitive_mappable! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl Mappable for String {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::string()
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(MapError::type_mismatch("String", &other)),
        }
    }

    fn default_value() -> Value {
        Value::String(String::new())
    }
}

impl<T: Mappable> Mappable for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::array_of(T::type_descriptor())
    }

    fn describe(catalog: &mut TypeCatalog) {
        T::describe(catalog);
    }

    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(Mappable::into_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, MapError> {
        value.into_array()?.into_iter().map(T::from_value).collect()
    }

    fn default_value() -> Value {
        Value::Array(Vec::new())
    }
}
