// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Semantic type descriptors.
//!
//! A [`TypeDescriptor`] is the only view of a type the analyzer ever gets:
//! its kind, its canonical name and, for arrays, the component descriptor.
//! Descriptors are immutable and compared structurally, so two descriptors
//! produced independently for the same type are interchangeable as cache
//! keys.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Canonical name used for the built-in string type.
pub const STRING_TYPE_NAME: &str = "String";

/// Primitive type kinds.
///
/// Kinds are never widened into each other: `I32` and `I64` are as
/// unrelated as two distinct beans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// All primitive kinds, in declaration order.
    pub const ALL: [PrimitiveKind; 12] = [
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
    ];

    /// Canonical (Rust) name of the primitive.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Parse a canonical primitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of the element enclosed by a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    /// Plain declared type (struct with named properties).
    Class,
    /// Enumeration of named constants.
    Enum,
}

/// Type kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    /// Primitive value type.
    Primitive(PrimitiveKind),
    /// Declared type (bean or enumeration).
    Declared(ElementKind),
    /// Array of the component type. Nesting gives arbitrary rank.
    Array(Arc<TypeDescriptor>),
}

/// Immutable semantic description of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeDescriptor {
    /// Canonical, stable name.
    pub name: Arc<str>,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Primitive descriptor; the name is the primitive's canonical name.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            name: Arc::from(kind.name()),
            kind: TypeKind::Primitive(kind),
        }
    }

    /// Plain declared type (bean).
    pub fn declared(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Declared(ElementKind::Class),
        }
    }

    /// Declared enumeration type.
    pub fn enumeration(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Declared(ElementKind::Enum),
        }
    }

    /// The built-in string type, a declared type mapped by identity.
    pub fn string() -> Self {
        Self::declared(STRING_TYPE_NAME)
    }

    /// Array of `component`, named `Vec<component>`.
    pub fn array_of(component: TypeDescriptor) -> Self {
        Self {
            name: Arc::from(format!("Vec<{}>", component.name)),
            kind: TypeKind::Array(Arc::new(component)),
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// True for beans and enumerations alike.
    pub fn is_declared(&self) -> bool {
        matches!(self.kind, TypeKind::Declared(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Declared(ElementKind::Enum))
    }

    /// Declared and not an enumeration.
    pub fn is_bean(&self) -> bool {
        matches!(self.kind, TypeKind::Declared(ElementKind::Class))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    /// Primitive kind, if primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Component type, if array.
    pub fn component(&self) -> Option<&TypeDescriptor> {
        match &self.kind {
            TypeKind::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Enclosed element kind, if declared.
    pub fn enclosed_element_kind(&self) -> Option<ElementKind> {
        match self.kind {
            TypeKind::Declared(kind) => Some(kind),
            _ => None,
        }
    }

    /// Number of array dimensions (0 for non-arrays).
    pub fn rank(&self) -> usize {
        let mut rank = 0;
        let mut current = self;
        while let Some(component) = current.component() {
            rank += 1;
            current = component;
        }
        rank
    }

    /// Innermost non-array component (self for non-arrays).
    pub fn innermost(&self) -> &TypeDescriptor {
        let mut current = self;
        while let Some(component) = current.component() {
            current = component;
        }
        current
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
