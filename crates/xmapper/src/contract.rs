// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping contract declarations.

use serde::{Deserialize, Serialize};

use crate::analyzer::TypePair;
use crate::descriptor::TypeDescriptor;

/// Options recognised on a mapping contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Leave target properties and enum constants that have no source
    /// counterpart at their default value instead of failing the build.
    #[serde(default)]
    pub ignore_missing_properties: bool,
}

impl MapperConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            ignore_missing_properties: true,
        }
    }
}

/// One conversion method: a single source parameter and a return type.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractMethod {
    pub name: String,
    pub source: TypeDescriptor,
    pub target: TypeDescriptor,
}

impl ContractMethod {
    pub fn pair(&self) -> TypePair {
        TypePair::new(self.source.clone(), self.target.clone())
    }
}

/// A named set of conversion methods plus options.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingContract {
    /// Stable contract identifier (canonical path of the contract).
    pub id: String,
    pub config: MapperConfig,
    pub methods: Vec<ContractMethod>,
}

impl MappingContract {
    pub fn new(id: impl Into<String>, config: MapperConfig) -> Self {
        Self {
            id: id.into(),
            config,
            methods: Vec::new(),
        }
    }

    /// Builder-style method declaration.
    pub fn method(
        mut self,
        name: impl Into<String>,
        source: TypeDescriptor,
        target: TypeDescriptor,
    ) -> Self {
        self.methods.push(ContractMethod {
            name: name.into(),
            source,
            target,
        });
        self
    }

    pub fn method_index(&self, name: &str) -> Option<usize> {
        self.methods.iter().position(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_strict() {
        let config: MapperConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MapperConfig::strict());
        assert!(!config.ignore_missing_properties);

        let config: MapperConfig =
            serde_json::from_str(r#"{"ignore_missing_properties": true}"#).unwrap();
        assert_eq!(config, MapperConfig::lenient());
    }

    #[test]
    fn methods_keep_declaration_order() {
        let contract = MappingContract::new("app::BeanMapper", MapperConfig::strict())
            .method(
                "convert_from",
                TypeDescriptor::declared("app::PersonIn"),
                TypeDescriptor::declared("app::PersonOut"),
            )
            .method(
                "convert_back",
                TypeDescriptor::declared("app::PersonOut"),
                TypeDescriptor::declared("app::PersonIn"),
            );
        assert_eq!(contract.method_index("convert_back"), Some(1));
        assert_eq!(contract.method_index("missing"), None);
        assert!(contract.methods[0].pair().differs());
    }
}
