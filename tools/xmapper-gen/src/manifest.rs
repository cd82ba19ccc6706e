// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping manifest.
//!
//! A TOML description of bean and enumeration types plus the mapping
//! contracts declared over them, used to validate contracts ahead of time.
//!
//! ```toml
//! [[types]]
//! name = "app::PersonIn"
//! kind = "bean"
//! properties = [{ name = "name", type = "String" }, { name = "tags", type = "Vec<String>" }]
//!
//! [[contracts]]
//! name = "app::BeanMapper"
//! ignore_missing_properties = true
//!
//! [[contracts.methods]]
//! name = "convert_from"
//! source = "app::PersonIn"
//! target = "app::PersonOut"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use xmapper::{
    MapperConfig, MappingContract, PrimitiveKind, Property, TypeCatalog, TypeDescriptor,
};

/// Manifest errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid type reference '{reference}': {reason}")]
    InvalidTypeRef { reference: String, reason: String },

    #[error("Unknown type '{name}' referenced by {context}")]
    UnknownType { name: String, context: String },

    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Bean,
    Enum,
}

/// A property of a declared bean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
        }
    }
}

/// A declared bean or enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: DeclKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
}

/// One contract method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub source: String,
    pub target: String,
}

/// A mapping contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDecl {
    pub name: String,
    #[serde(default)]
    pub ignore_missing_properties: bool,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub contracts: Vec<ContractDecl>,
}

impl Manifest {
    /// Load and validate a manifest file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate manifest text.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for decl in &self.types {
            if decl.name.trim().is_empty() {
                return Err(ManifestError::Invalid("Type with empty name".into()));
            }
            if is_builtin(&decl.name) {
                return Err(ManifestError::Invalid(format!(
                    "Type '{}' shadows a built-in type",
                    decl.name
                )));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(ManifestError::DuplicateType(decl.name.clone()));
            }
            match decl.kind {
                DeclKind::Bean => {
                    if !decl.constants.is_empty() {
                        return Err(ManifestError::Invalid(format!(
                            "Bean '{}' declares enum constants",
                            decl.name
                        )));
                    }
                    let mut names = HashSet::new();
                    for property in &decl.properties {
                        if !names.insert(property.name.as_str()) {
                            return Err(ManifestError::Invalid(format!(
                                "Bean '{}' declares property '{}' twice",
                                decl.name, property.name
                            )));
                        }
                    }
                }
                DeclKind::Enum => {
                    if !decl.properties.is_empty() {
                        return Err(ManifestError::Invalid(format!(
                            "Enum '{}' declares properties",
                            decl.name
                        )));
                    }
                    if decl.constants.is_empty() {
                        return Err(ManifestError::Invalid(format!(
                            "Enum '{}' has no constants",
                            decl.name
                        )));
                    }
                    let unique: HashSet<_> = decl.constants.iter().collect();
                    if unique.len() != decl.constants.len() {
                        return Err(ManifestError::Invalid(format!(
                            "Enum '{}' declares a constant twice",
                            decl.name
                        )));
                    }
                }
            }
        }

        let kinds = self.kinds();
        for decl in &self.types {
            for property in &decl.properties {
                let context = format!("property '{}' of '{}'", property.name, decl.name);
                resolve_type(&property.type_ref, &kinds, &context)?;
            }
        }

        let mut contracts = HashSet::new();
        for contract in &self.contracts {
            if !contracts.insert(contract.name.as_str()) {
                return Err(ManifestError::Invalid(format!(
                    "Contract '{}' is declared more than once",
                    contract.name
                )));
            }
            if contract.methods.is_empty() {
                return Err(ManifestError::Invalid(format!(
                    "Contract '{}' declares no methods",
                    contract.name
                )));
            }
            let mut methods = HashSet::new();
            for method in &contract.methods {
                if !methods.insert(method.name.as_str()) {
                    return Err(ManifestError::Invalid(format!(
                        "Contract '{}' declares method '{}' twice",
                        contract.name, method.name
                    )));
                }
                let context = format!("{}::{}", contract.name, method.name);
                resolve_type(&method.source, &kinds, &context)?;
                resolve_type(&method.target, &kinds, &context)?;
            }
        }

        Ok(())
    }

    /// Shapes of every declared type.
    pub fn catalog(&self) -> Result<TypeCatalog, ManifestError> {
        let kinds = self.kinds();
        let mut catalog = TypeCatalog::new();
        for decl in &self.types {
            let descriptor = declared(&decl.name, decl.kind);
            let inserted = match decl.kind {
                DeclKind::Bean => {
                    let properties = decl
                        .properties
                        .iter()
                        .map(|p| {
                            let context = format!("property '{}' of '{}'", p.name, decl.name);
                            Ok(Property::new(
                                p.name.clone(),
                                resolve_type(&p.type_ref, &kinds, &context)?,
                            ))
                        })
                        .collect::<Result<Vec<_>, ManifestError>>()?;
                    catalog.insert_bean(descriptor, properties, None)
                }
                DeclKind::Enum => catalog.insert_enum(descriptor, decl.constants.clone()),
            };
            if !inserted {
                return Err(ManifestError::DuplicateType(decl.name.clone()));
            }
        }
        Ok(catalog)
    }

    /// Contract declarations, with resolved type descriptors.
    pub fn contracts(&self) -> Result<Vec<MappingContract>, ManifestError> {
        let kinds = self.kinds();
        self.contracts
            .iter()
            .map(|decl| {
                let config = MapperConfig {
                    ignore_missing_properties: decl.ignore_missing_properties,
                };
                decl.methods
                    .iter()
                    .try_fold(MappingContract::new(decl.name.clone(), config), |c, m| -> Result<_, ManifestError> {
                        let context = format!("{}::{}", decl.name, m.name);
                        Ok(c.method(
                            m.name.clone(),
                            resolve_type(&m.source, &kinds, &context)?,
                            resolve_type(&m.target, &kinds, &context)?,
                        ))
                    })
            })
            .collect()
    }

    /// Resolve a type reference against the declared types.
    pub fn resolve(&self, reference: &str) -> Result<TypeDescriptor, ManifestError> {
        resolve_type(reference, &self.kinds(), "lookup")
    }

    /// Example manifest, as written by `gen-manifest`.
    pub fn example() -> Self {
        let bean = |name: &str, properties: Vec<PropertyDecl>| TypeDecl {
            name: name.into(),
            kind: DeclKind::Bean,
            properties,
            constants: Vec::new(),
        };
        let enumeration = |name: &str, constants: &[&str]| TypeDecl {
            name: name.into(),
            kind: DeclKind::Enum,
            properties: Vec::new(),
            constants: constants.iter().map(|c| (*c).to_string()).collect(),
        };

        Self {
            types: vec![
                enumeration("app::RoleIn", &["Admin", "User", "Guest"]),
                enumeration("app::RoleOut", &["Admin", "User"]),
                bean(
                    "app::PersonIn",
                    vec![
                        PropertyDecl::new("name", "String"),
                        PropertyDecl::new("age", "u32"),
                        PropertyDecl::new("role", "app::RoleIn"),
                        PropertyDecl::new("tags", "Vec<String>"),
                    ],
                ),
                bean(
                    "app::PersonOut",
                    vec![
                        PropertyDecl::new("name", "String"),
                        PropertyDecl::new("age", "u32"),
                        PropertyDecl::new("role", "app::RoleOut"),
                        PropertyDecl::new("tags", "Vec<String>"),
                        PropertyDecl::new("nickname", "String"),
                    ],
                ),
            ],
            contracts: vec![ContractDecl {
                name: "app::BeanMapper".into(),
                ignore_missing_properties: true,
                methods: vec![
                    MethodDecl {
                        name: "convert_from".into(),
                        source: "app::PersonIn".into(),
                        target: "app::PersonOut".into(),
                    },
                    MethodDecl {
                        name: "convert_all".into(),
                        source: "Vec<app::PersonIn>".into(),
                        target: "Vec<app::PersonOut>".into(),
                    },
                ],
            }],
        }
    }

    fn kinds(&self) -> HashMap<&str, DeclKind> {
        self.types
            .iter()
            .map(|decl| (decl.name.as_str(), decl.kind))
            .collect()
    }
}

fn is_builtin(name: &str) -> bool {
    name == xmapper::descriptor::STRING_TYPE_NAME || PrimitiveKind::from_name(name).is_some()
}

fn declared(name: &str, kind: DeclKind) -> TypeDescriptor {
    match kind {
        DeclKind::Bean => TypeDescriptor::declared(name),
        DeclKind::Enum => TypeDescriptor::enumeration(name),
    }
}

fn resolve_type(
    reference: &str,
    kinds: &HashMap<&str, DeclKind>,
    context: &str,
) -> Result<TypeDescriptor, ManifestError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ManifestError::InvalidTypeRef {
            reference: reference.into(),
            reason: "empty type reference".into(),
        });
    }

    if let Some(rest) = reference.strip_prefix("Vec<") {
        let inner = rest
            .strip_suffix('>')
            .ok_or_else(|| ManifestError::InvalidTypeRef {
                reference: reference.into(),
                reason: "unbalanced '<'".into(),
            })?;
        return Ok(TypeDescriptor::array_of(resolve_type(inner, kinds, context)?));
    }
    if reference.contains(['<', '>']) {
        return Err(ManifestError::InvalidTypeRef {
            reference: reference.into(),
            reason: "only Vec<T> takes a type argument".into(),
        });
    }

    if reference == xmapper::descriptor::STRING_TYPE_NAME {
        return Ok(TypeDescriptor::string());
    }
    if let Some(kind) = PrimitiveKind::from_name(reference) {
        return Ok(TypeDescriptor::primitive(kind));
    }
    match kinds.get(reference) {
        Some(kind) => Ok(declared(reference, *kind)),
        None => Err(ManifestError::UnknownType {
            name: reference.into(),
            context: context.into(),
        }),
    }
}
