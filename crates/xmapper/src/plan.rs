// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping plans and build-time diagnostics.
//!
//! The [`Planner`] is the escalating caller of the analyzer: it classifies
//! every method of a contract, recurses into arrays, nested beans and
//! enumerations, and turns every pair that cannot be converted into a
//! [`BuildError`]. A contract with any diagnostic produces no plan.
//!
//! # Resolution
//!
//! ```text
//! method pair ---rank check---> classify
//!     EnumByName      -> EnumPlan  (constant -> constant, by exact name)
//!     ArrayMapping    -> resolve(component pair)
//!     NestedBean      -> BeanPlan  (target property <- same-named source property)
//!     Unsupported     -> BuildError
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::analyzer::{Analyzer, MappingStrategy, TypePair};
use crate::catalog::TypeSupplier;
use crate::contract::{MapperConfig, MappingContract};
use crate::value::Value;

/// Why a pair could not be planned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildErrorKind {
    #[error("no conversion exists for {pair}")]
    Unsupported { pair: TypePair },

    #[error("array rank mismatch for {pair} (rank {input_rank} vs {output_rank})")]
    RankMismatch {
        pair: TypePair,
        input_rank: usize,
        output_rank: usize,
    },

    #[error("enum constants without counterpart in {pair}: {}", .constants.join(", "))]
    MissingEnumConstants {
        pair: TypePair,
        constants: Vec<String>,
    },

    #[error("target properties without source counterpart in {pair}: {}", .properties.join(", "))]
    MissingProperties {
        pair: TypePair,
        properties: Vec<String>,
    },

    #[error("no shape known for declared type {name}")]
    UnknownType { name: String },

    #[error("cannot map property {property} of {outer}: {cause}")]
    UnresolvedNested {
        outer: TypePair,
        property: String,
        cause: Box<BuildErrorKind>,
    },
}

/// A build-stopping diagnostic, located at a contract method.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{contract}::{method}(parameter {position}: {source_type}) -> {target_type}: {kind}")]
pub struct BuildError {
    pub contract: String,
    pub method: String,
    /// Index of the source parameter among the method's parameters.
    /// Contract methods take a single source, so this is always 0.
    pub position: usize,
    pub source_type: String,
    pub target_type: String,
    pub kind: BuildErrorKind,
}

/// Every diagnostic reported for one contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<BuildError>,
}

impl Diagnostics {
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildError> {
        self.errors.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mapping error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

/// Planned conversion of one contract method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodPlan {
    pub name: String,
    pub pair: TypePair,
    pub strategy: MappingStrategy,
}

/// Planned conversion of one target property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPlan {
    pub name: String,
    pub pair: TypePair,
    pub strategy: MappingStrategy,
}

/// Property-by-property conversion between two beans.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanPlan {
    pub pair: TypePair,
    pub properties: Vec<PropertyPlan>,
    /// Target properties left at their default value.
    pub skipped: Vec<String>,
    /// Target instance used when no factory supplies one.
    pub default: Option<Value>,
}

/// Constant-by-name conversion between two enumerations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumPlan {
    pub pair: TypePair,
    /// Source constant -> target constant; `None` leaves the default.
    pub constants: HashMap<String, Option<String>>,
    /// Default target constant (first declared).
    pub default: Option<String>,
}

impl EnumPlan {
    /// Target constant for `source`, falling back to the default.
    pub fn target_for(&self, source: &str) -> Option<&str> {
        match self.constants.get(source) {
            Some(Some(target)) => Some(target),
            Some(None) => self.default.as_deref(),
            None => None,
        }
    }

    /// Whether `source` has no same-named target constant.
    pub fn is_unmatched(&self, source: &str) -> bool {
        matches!(self.constants.get(source), Some(None))
    }
}

/// Validated conversion plan of a whole contract.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingPlan {
    pub contract: String,
    pub config: MapperConfig,
    pub methods: Vec<MethodPlan>,
    beans: HashMap<TypePair, BeanPlan>,
    enums: HashMap<TypePair, EnumPlan>,
}

impl MappingPlan {
    pub fn method(&self, index: usize) -> Option<&MethodPlan> {
        self.methods.get(index)
    }

    pub fn bean(&self, pair: &TypePair) -> Option<&BeanPlan> {
        self.beans.get(pair)
    }

    pub fn enumeration(&self, pair: &TypePair) -> Option<&EnumPlan> {
        self.enums.get(pair)
    }

    pub fn beans(&self) -> impl Iterator<Item = &BeanPlan> {
        self.beans.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumPlan> {
        self.enums.values()
    }
}

/// Builds [`MappingPlan`]s from contracts and a [`TypeSupplier`].
pub struct Planner<'a, S: TypeSupplier + ?Sized> {
    supplier: &'a S,
    analyzer: Analyzer,
}

impl<'a, S: TypeSupplier + ?Sized> Planner<'a, S> {
    pub fn new(supplier: &'a S) -> Self {
        Self {
            supplier,
            analyzer: Analyzer::new(),
        }
    }

    /// Plan every method of `contract`, collecting all diagnostics.
    pub fn plan(&self, contract: &MappingContract) -> Result<MappingPlan, Diagnostics> {
        let mut state = PlanState {
            supplier: self.supplier,
            analyzer: &self.analyzer,
            config: contract.config,
            beans: HashMap::new(),
            enums: HashMap::new(),
            in_progress: HashSet::new(),
        };
        let mut methods = Vec::with_capacity(contract.methods.len());
        let mut errors = Vec::new();

        for method in &contract.methods {
            let pair = method.pair();
            state.in_progress.clear();
            match state.resolve(&pair) {
                Ok(strategy) => methods.push(MethodPlan {
                    name: method.name.clone(),
                    pair,
                    strategy,
                }),
                Err(kinds) => errors.extend(kinds.into_iter().map(|kind| BuildError {
                    contract: contract.id.clone(),
                    method: method.name.clone(),
                    position: SOURCE_POSITION,
                    source_type: method.source.name().to_string(),
                    target_type: method.target.name().to_string(),
                    kind,
                })),
            }
        }

        if !errors.is_empty() {
            log::debug!(
                "[XMapper] contract {} rejected with {} error(s)",
                contract.id,
                errors.len()
            );
            return Err(Diagnostics { errors });
        }

        log::debug!(
            "[XMapper] planned {} ({} method(s), {} bean pair(s), {} enum pair(s))",
            contract.id,
            methods.len(),
            state.beans.len(),
            state.enums.len()
        );
        Ok(MappingPlan {
            contract: contract.id.clone(),
            config: contract.config,
            methods,
            beans: state.beans,
            enums: state.enums,
        })
    }
}

// Position of the single source parameter of a contract method.
const SOURCE_POSITION: usize = 0;

// Every failure found under one pair.
type Failures = Vec<BuildErrorKind>;

struct PlanState<'p, S: TypeSupplier + ?Sized> {
    supplier: &'p S,
    analyzer: &'p Analyzer,
    config: MapperConfig,
    beans: HashMap<TypePair, BeanPlan>,
    enums: HashMap<TypePair, EnumPlan>,
    // Bean pairs being planned; a pair reached again through its own
    // properties is already on its way to resolution.
    in_progress: HashSet<TypePair>,
}

impl<S: TypeSupplier + ?Sized> PlanState<'_, S> {
    fn resolve(&mut self, pair: &TypePair) -> Result<MappingStrategy, Failures> {
        if pair.rank_mismatch() {
            return Err(vec![BuildErrorKind::RankMismatch {
                pair: pair.clone(),
                input_rank: pair.input.rank(),
                output_rank: pair.output.rank(),
            }]);
        }

        let strategy = self.analyzer.classify(pair);
        match &strategy {
            MappingStrategy::SamePrimitive | MappingStrategy::SameDeclaredIdentity => {}
            MappingStrategy::EnumByName => self.plan_enum(pair).map_err(|kind| vec![kind])?,
            MappingStrategy::ArrayMapping(_) => {
                if let Some(components) = pair.components() {
                    self.resolve(&components)?;
                }
            }
            MappingStrategy::NestedBean => self.plan_bean(pair)?,
            MappingStrategy::Unsupported => {
                return Err(vec![BuildErrorKind::Unsupported { pair: pair.clone() }])
            }
        }
        Ok(strategy)
    }

    fn plan_enum(&mut self, pair: &TypePair) -> Result<(), BuildErrorKind> {
        if self.enums.contains_key(pair) {
            return Ok(());
        }
        let supplier = self.supplier;
        let source = supplier
            .enumeration(pair.input.name())
            .ok_or_else(|| BuildErrorKind::UnknownType {
                name: pair.input.name().to_string(),
            })?;
        let target = supplier
            .enumeration(pair.output.name())
            .ok_or_else(|| BuildErrorKind::UnknownType {
                name: pair.output.name().to_string(),
            })?;

        let mut constants = HashMap::with_capacity(source.constants.len());
        let mut missing = Vec::new();
        for constant in &source.constants {
            if target.contains(constant) {
                constants.insert(constant.clone(), Some(constant.clone()));
            } else {
                missing.push(constant.clone());
                constants.insert(constant.clone(), None);
            }
        }

        if !missing.is_empty() {
            if !self.config.ignore_missing_properties {
                return Err(BuildErrorKind::MissingEnumConstants {
                    pair: pair.clone(),
                    constants: missing,
                });
            }
            log::debug!(
                "[XMapper] {}: constants {:?} map to the default constant",
                pair,
                missing
            );
        }

        self.enums.insert(
            pair.clone(),
            EnumPlan {
                pair: pair.clone(),
                constants,
                default: target.constants.first().cloned(),
            },
        );
        Ok(())
    }

    fn plan_bean(&mut self, pair: &TypePair) -> Result<(), Failures> {
        if self.beans.contains_key(pair) || self.in_progress.contains(pair) {
            return Ok(());
        }
        let supplier = self.supplier;
        let unknown = |name: &str| BuildErrorKind::UnknownType {
            name: name.to_string(),
        };
        let (source, target) = match (
            supplier.bean(pair.input.name()),
            supplier.bean(pair.output.name()),
        ) {
            (Some(source), Some(target)) => (source, target),
            (source, target) => {
                let mut failures = Vec::new();
                if source.is_none() {
                    failures.push(unknown(pair.input.name()));
                }
                if target.is_none() {
                    failures.push(unknown(pair.output.name()));
                }
                return Err(failures);
            }
        };

        self.in_progress.insert(pair.clone());

        let mut properties = Vec::with_capacity(target.properties.len());
        let mut missing = Vec::new();
        let mut failures = Vec::new();
        for target_property in &target.properties {
            let Some(source_property) = source.property(&target_property.name) else {
                missing.push(target_property.name.clone());
                continue;
            };
            let property_pair = TypePair::new(
                source_property.type_desc.clone(),
                target_property.type_desc.clone(),
            );
            match self.resolve(&property_pair) {
                Ok(strategy) => properties.push(PropertyPlan {
                    name: target_property.name.clone(),
                    pair: property_pair,
                    strategy,
                }),
                Err(causes) => {
                    failures.extend(causes.into_iter().map(|cause| {
                        BuildErrorKind::UnresolvedNested {
                            outer: pair.clone(),
                            property: target_property.name.clone(),
                            cause: Box::new(cause),
                        }
                    }));
                }
            }
        }

        if !missing.is_empty() && !self.config.ignore_missing_properties {
            failures.push(BuildErrorKind::MissingProperties {
                pair: pair.clone(),
                properties: missing.clone(),
            });
        }

        self.in_progress.remove(pair);
        if !failures.is_empty() {
            return Err(failures);
        }
        self.beans.insert(
            pair.clone(),
            BeanPlan {
                pair: pair.clone(),
                properties,
                skipped: missing,
                default: target.default.clone(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Property, TypeCatalog};
    use crate::descriptor::{PrimitiveKind, TypeDescriptor};

    fn prim(kind: PrimitiveKind) -> TypeDescriptor {
        TypeDescriptor::primitive(kind)
    }

    fn people_catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.insert_enum(
            TypeDescriptor::enumeration("app::GenderIn"),
            vec!["Male".into(), "Female".into(), "Other".into()],
        );
        catalog.insert_enum(
            TypeDescriptor::enumeration("app::GenderOut"),
            vec!["Unknown".into(), "Male".into(), "Female".into()],
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::AddressIn"),
            vec![Property::new("city", TypeDescriptor::string())],
            None,
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::AddressOut"),
            vec![Property::new("city", TypeDescriptor::string())],
            None,
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::PersonIn"),
            vec![
                Property::new("name", TypeDescriptor::string()),
                Property::new("age", prim(PrimitiveKind::I32)),
                Property::new("scores", TypeDescriptor::array_of(prim(PrimitiveKind::F64))),
                Property::new("gender", TypeDescriptor::enumeration("app::GenderIn")),
                Property::new("address", TypeDescriptor::declared("app::AddressIn")),
            ],
            None,
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::PersonOut"),
            vec![
                Property::new("name", TypeDescriptor::string()),
                Property::new("age", prim(PrimitiveKind::I32)),
                Property::new("scores", TypeDescriptor::array_of(prim(PrimitiveKind::F64))),
                Property::new("gender", TypeDescriptor::enumeration("app::GenderOut")),
                Property::new("address", TypeDescriptor::declared("app::AddressOut")),
            ],
            None,
        );
        catalog
    }

    fn person_contract(config: MapperConfig) -> MappingContract {
        MappingContract::new("app::BeanMapper", config).method(
            "convert_from",
            TypeDescriptor::declared("app::PersonIn"),
            TypeDescriptor::declared("app::PersonOut"),
        )
    }

    #[test]
    fn strict_contract_fails_on_missing_enum_constant() {
        let catalog = people_catalog();
        let planner = Planner::new(&catalog);
        let diagnostics = planner
            .plan(&person_contract(MapperConfig::strict()))
            .unwrap_err();

        assert_eq!(diagnostics.len(), 1);
        let error = &diagnostics.errors[0];
        assert_eq!(error.contract, "app::BeanMapper");
        assert_eq!(error.method, "convert_from");
        assert_eq!(error.source_type, "app::PersonIn");
        assert_eq!(error.target_type, "app::PersonOut");
        match &error.kind {
            BuildErrorKind::UnresolvedNested {
                property, cause, ..
            } => {
                assert_eq!(property, "gender");
                assert!(matches!(
                    cause.as_ref(),
                    BuildErrorKind::MissingEnumConstants { constants, .. } if constants == &vec!["Other".to_string()]
                ));
            }
            other => panic!("unexpected kind: {other}"),
        }
        let rendered = error.to_string();
        assert!(rendered.contains("app::GenderIn -> app::GenderOut"));
        assert!(rendered.contains("Other"));
    }

    #[test]
    fn lenient_contract_plans_nested_graph() {
        let catalog = people_catalog();
        let planner = Planner::new(&catalog);
        let plan = planner
            .plan(&person_contract(MapperConfig::lenient()))
            .unwrap();

        assert_eq!(plan.methods[0].strategy, MappingStrategy::NestedBean);
        let person = plan.bean(&plan.methods[0].pair).unwrap();
        let strategies: Vec<_> = person
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.strategy.clone()))
            .collect();
        assert_eq!(
            strategies,
            vec![
                ("name", MappingStrategy::SameDeclaredIdentity),
                ("age", MappingStrategy::SamePrimitive),
                (
                    "scores",
                    MappingStrategy::ArrayMapping(Box::new(MappingStrategy::SamePrimitive))
                ),
                ("gender", MappingStrategy::EnumByName),
                ("address", MappingStrategy::NestedBean),
            ]
        );

        let gender = plan
            .enumeration(&TypePair::new(
                TypeDescriptor::enumeration("app::GenderIn"),
                TypeDescriptor::enumeration("app::GenderOut"),
            ))
            .unwrap();
        assert_eq!(gender.target_for("Female"), Some("Female"));
        assert_eq!(gender.target_for("Other"), Some("Unknown"));
        assert_eq!(gender.target_for("Nope"), None);
        assert_eq!(plan.beans().count(), 2);
    }

    #[test]
    fn missing_target_property_is_reported_in_strict_mode() {
        let mut catalog = TypeCatalog::new();
        catalog.insert_bean(
            TypeDescriptor::declared("app::A"),
            vec![Property::new("x", prim(PrimitiveKind::I32))],
            None,
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::B"),
            vec![
                Property::new("x", prim(PrimitiveKind::I32)),
                Property::new("y", prim(PrimitiveKind::I32)),
            ],
            None,
        );
        let contract = MappingContract::new("app::M", MapperConfig::strict()).method(
            "to_b",
            TypeDescriptor::declared("app::A"),
            TypeDescriptor::declared("app::B"),
        );

        let diagnostics = Planner::new(&catalog).plan(&contract).unwrap_err();
        assert!(matches!(
            &diagnostics.errors[0].kind,
            BuildErrorKind::MissingProperties { properties, .. } if properties == &vec!["y".to_string()]
        ));

        let lenient = MappingContract {
            config: MapperConfig::lenient(),
            ..contract
        };
        let plan = Planner::new(&catalog).plan(&lenient).unwrap();
        let bean = plan.bean(&plan.methods[0].pair).unwrap();
        assert_eq!(bean.skipped, vec!["y".to_string()]);
        assert_eq!(bean.properties.len(), 1);
    }

    #[test]
    fn rank_mismatch_names_both_types() {
        let catalog = TypeCatalog::new();
        let contract = MappingContract::new("app::M", MapperConfig::lenient()).method(
            "flatten",
            TypeDescriptor::array_of(TypeDescriptor::array_of(prim(PrimitiveKind::I32))),
            TypeDescriptor::array_of(prim(PrimitiveKind::I32)),
        );
        let diagnostics = Planner::new(&catalog).plan(&contract).unwrap_err();
        let error = &diagnostics.errors[0];
        assert!(matches!(
            error.kind,
            BuildErrorKind::RankMismatch {
                input_rank: 2,
                output_rank: 1,
                ..
            }
        ));
        let rendered = error.to_string();
        assert!(rendered.contains("Vec<Vec<i32>>"));
        assert!(rendered.contains("Vec<i32>"));
    }

    #[test]
    fn unsupported_array_element_names_inner_pair() {
        let catalog = TypeCatalog::new();
        let contract = MappingContract::new("app::M", MapperConfig::lenient()).method(
            "widen",
            TypeDescriptor::array_of(prim(PrimitiveKind::I32)),
            TypeDescriptor::array_of(prim(PrimitiveKind::I64)),
        );
        let diagnostics = Planner::new(&catalog).plan(&contract).unwrap_err();
        assert_eq!(
            diagnostics.errors[0].kind,
            BuildErrorKind::Unsupported {
                pair: TypePair::new(prim(PrimitiveKind::I32), prim(PrimitiveKind::I64)),
            }
        );
        assert_eq!(diagnostics.errors[0].position, 0);
    }

    #[test]
    fn unknown_nested_shape_is_reported() {
        let catalog = TypeCatalog::new();
        let contract = MappingContract::new("app::M", MapperConfig::strict()).method(
            "convert",
            TypeDescriptor::declared("app::Ghost"),
            TypeDescriptor::declared("app::Shadow"),
        );
        let diagnostics = Planner::new(&catalog).plan(&contract).unwrap_err();
        assert_eq!(
            diagnostics.errors[0].kind,
            BuildErrorKind::UnknownType {
                name: "app::Ghost".into()
            }
        );
    }

    #[test]
    fn every_failing_method_is_reported() {
        let catalog = people_catalog();
        let contract = person_contract(MapperConfig::strict())
            .method("ok", prim(PrimitiveKind::U8), prim(PrimitiveKind::U8))
            .method("bad", prim(PrimitiveKind::U8), TypeDescriptor::string());
        let diagnostics = Planner::new(&catalog).plan(&contract).unwrap_err();
        let methods: Vec<_> = diagnostics.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["convert_from", "bad"]);
        assert!(diagnostics.to_string().starts_with("2 mapping error(s)"));
    }

    #[test]
    fn every_failing_property_of_a_bean_is_reported() {
        let mut catalog = TypeCatalog::new();
        catalog.insert_enum(
            TypeDescriptor::enumeration("app::FlagIn"),
            vec!["X".into(), "Y".into()],
        );
        catalog.insert_enum(
            TypeDescriptor::enumeration("app::FlagOut"),
            vec!["X".into()],
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::In"),
            vec![
                Property::new("flag", TypeDescriptor::enumeration("app::FlagIn")),
                Property::new("count", prim(PrimitiveKind::I32)),
            ],
            None,
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::Out"),
            vec![
                Property::new("flag", TypeDescriptor::enumeration("app::FlagOut")),
                Property::new("count", prim(PrimitiveKind::I64)),
                Property::new("extra", TypeDescriptor::string()),
            ],
            None,
        );
        let contract = MappingContract::new("app::M", MapperConfig::strict()).method(
            "convert",
            TypeDescriptor::declared("app::In"),
            TypeDescriptor::declared("app::Out"),
        );

        let diagnostics = Planner::new(&catalog).plan(&contract).unwrap_err();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|e| e.method == "convert"));

        let causes: Vec<_> = diagnostics
            .iter()
            .map(|e| match &e.kind {
                BuildErrorKind::UnresolvedNested { property, cause, .. } => {
                    (property.clone(), cause.as_ref().clone())
                }
                other => (String::new(), other.clone()),
            })
            .collect();
        assert!(matches!(
            &causes[0],
            (property, BuildErrorKind::MissingEnumConstants { constants, .. })
                if property == "flag" && constants == &vec!["Y".to_string()]
        ));
        assert_eq!(
            causes[1],
            (
                "count".to_string(),
                BuildErrorKind::Unsupported {
                    pair: TypePair::new(prim(PrimitiveKind::I32), prim(PrimitiveKind::I64)),
                }
            )
        );
        assert!(matches!(
            &causes[2].1,
            BuildErrorKind::MissingProperties { properties, .. } if properties == &vec!["extra".to_string()]
        ));
    }

    #[test]
    fn self_referencing_beans_terminate() {
        let mut catalog = TypeCatalog::new();
        catalog.insert_bean(
            TypeDescriptor::declared("app::NodeIn"),
            vec![Property::new(
                "children",
                TypeDescriptor::array_of(TypeDescriptor::declared("app::NodeIn")),
            )],
            None,
        );
        catalog.insert_bean(
            TypeDescriptor::declared("app::NodeOut"),
            vec![Property::new(
                "children",
                TypeDescriptor::array_of(TypeDescriptor::declared("app::NodeOut")),
            )],
            None,
        );
        let contract = MappingContract::new("app::Tree", MapperConfig::strict()).method(
            "convert",
            TypeDescriptor::declared("app::NodeIn"),
            TypeDescriptor::declared("app::NodeOut"),
        );
        let plan = Planner::new(&catalog).plan(&contract).unwrap();
        assert_eq!(plan.beans().count(), 1);
    }
}
