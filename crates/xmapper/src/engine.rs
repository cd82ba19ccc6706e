// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Execution of mapping plans.
//!
//! The [`MappingEngine`] is what a generated mapper delegates to: it walks
//! the strategy tree of a validated [`MappingPlan`] over dynamic values.

use std::sync::Arc;

use thiserror::Error;

use crate::analyzer::{MappingStrategy, TypePair};
use crate::factory::FactoryHandle;
use crate::plan::MappingPlan;
use crate::value::{BeanValue, EnumValue, Mappable, Value};

/// Errors raised while converting a value.
///
/// A plan that validated against the descriptors of the very types being
/// converted does not produce these; they signal a `Mappable`
/// implementation that disagrees with its own descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("bean {bean} has no value for property {property}")]
    MissingValue { bean: String, property: String },

    #[error("{enumeration} has no constant named {constant}")]
    UnknownConstant {
        enumeration: String,
        constant: String,
    },

    #[error("contract {contract} has no method #{index}")]
    UnknownMethod { contract: String, index: usize },

    #[error("pair {pair} is not part of the plan")]
    Unplanned { pair: String },
}

impl MapError {
    pub fn type_mismatch(expected: impl Into<String>, found: &Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.kind_name(),
        }
    }
}

/// Result alias for conversions.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

/// Runs a [`MappingPlan`], optionally with a [`FactoryHandle`].
#[derive(Debug, Clone)]
pub struct MappingEngine {
    plan: Arc<MappingPlan>,
    factory: Option<FactoryHandle>,
}

impl MappingEngine {
    pub fn new(plan: MappingPlan) -> Self {
        Self {
            plan: Arc::new(plan),
            factory: None,
        }
    }

    pub fn with_factory(plan: MappingPlan, factory: FactoryHandle) -> Self {
        Self {
            plan: Arc::new(plan),
            factory: Some(factory),
        }
    }

    pub fn plan(&self) -> &MappingPlan {
        &self.plan
    }

    pub fn factory(&self) -> Option<&FactoryHandle> {
        self.factory.as_ref()
    }

    /// Convert `input` with the method at `method_index`.
    pub fn convert<I: Mappable, O: Mappable>(&self, method_index: usize, input: I) -> Result<O> {
        let method = self
            .plan
            .method(method_index)
            .ok_or_else(|| MapError::UnknownMethod {
                contract: self.plan.contract.clone(),
                index: method_index,
            })?;
        let output = self.apply(&method.strategy, &method.pair, input.into_value())?;
        O::from_value(output)
    }

    /// Convert a dynamic value along `strategy`.
    pub fn apply(&self, strategy: &MappingStrategy, pair: &TypePair, value: Value) -> Result<Value> {
        match strategy {
            MappingStrategy::SamePrimitive | MappingStrategy::SameDeclaredIdentity => Ok(value),
            MappingStrategy::EnumByName => self.map_enum(pair, value),
            MappingStrategy::ArrayMapping(element) => {
                let components = pair.components().ok_or_else(|| unplanned(pair))?;
                let items = value
                    .into_array()?
                    .into_iter()
                    .map(|item| self.apply(element, &components, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(items))
            }
            MappingStrategy::NestedBean => self.map_bean(pair, value),
            MappingStrategy::Unsupported => Err(unplanned(pair)),
        }
    }

    fn map_enum(&self, pair: &TypePair, value: Value) -> Result<Value> {
        let plan = self.plan.enumeration(pair).ok_or_else(|| unplanned(pair))?;
        let source = value.into_enum()?;
        let constant = plan
            .target_for(&source.constant)
            .ok_or_else(|| MapError::UnknownConstant {
                enumeration: source.type_name.clone(),
                constant: source.constant.clone(),
            })?;
        Ok(Value::Enum(EnumValue::new(pair.output.name(), constant)))
    }

    fn map_bean(&self, pair: &TypePair, value: Value) -> Result<Value> {
        let plan = self.plan.bean(pair).ok_or_else(|| unplanned(pair))?;
        let mut source = value.into_bean()?;

        let mut target = match self
            .factory
            .as_ref()
            .and_then(|factory| factory.new_instance(&pair.output))
        {
            Some(instance) => instance.into_bean()?,
            None => match &plan.default {
                Some(default) => default.clone().into_bean()?,
                None => BeanValue::new(pair.output.name()),
            },
        };
        target.type_name = pair.output.name().to_string();

        for property in &plan.properties {
            let value = source.take(&property.name)?;
            if target.get(&property.name).is_some()
                && self.is_unmatched_constant(&property.strategy, &property.pair, &value)
            {
                continue;
            }
            let converted = self.apply(&property.strategy, &property.pair, value)?;
            target.set(property.name.clone(), converted);
        }
        Ok(Value::Bean(target))
    }

    // A constant with no counterpart leaves the target property untouched.
    fn is_unmatched_constant(
        &self,
        strategy: &MappingStrategy,
        pair: &TypePair,
        value: &Value,
    ) -> bool {
        let (MappingStrategy::EnumByName, Value::Enum(source)) = (strategy, value) else {
            return false;
        };
        self.plan
            .enumeration(pair)
            .is_some_and(|plan| plan.is_unmatched(&source.constant))
    }
}

fn unplanned(pair: &TypePair) -> MapError {
    MapError::Unplanned {
        pair: pair.to_string(),
    }
}
