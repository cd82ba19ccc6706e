// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Contract reports: per-method strategy trees or build diagnostics.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use xmapper::{MappingPlan, MappingStrategy, Planner, TypePair};

use crate::manifest::{Manifest, ManifestError};

/// One node of a strategy tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyNode {
    /// Property name, `[]` for array elements, none for a method root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub pair: String,
    pub strategy: String,
    /// Enum constants, as `source -> target` (`source -> (default)` when
    /// the target has no such constant).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
    /// Target properties left at their default value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StrategyNode>,
    /// Bean pair already expanded higher up the tree.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub recursive: bool,
}

/// Planned method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodReport {
    pub name: String,
    pub tree: StrategyNode,
}

/// Outcome of planning one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractReport {
    pub contract: String,
    pub ignore_missing_properties: bool,
    pub methods: Vec<MethodReport>,
    pub errors: Vec<String>,
}

impl ContractReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Plan every contract of `manifest`.
pub fn analyze(manifest: &Manifest) -> Result<Vec<ContractReport>, ManifestError> {
    let catalog = manifest.catalog()?;
    let planner = Planner::new(&catalog);

    let reports = manifest
        .contracts()?
        .into_iter()
        .map(|contract| {
            let ignore_missing_properties = contract.config.ignore_missing_properties;
            match planner.plan(&contract) {
                Ok(plan) => {
                    tracing::debug!("contract {} planned", contract.id);
                    ContractReport {
                        contract: contract.id.clone(),
                        ignore_missing_properties,
                        methods: plan
                            .methods
                            .iter()
                            .map(|method| MethodReport {
                                name: method.name.clone(),
                                tree: node(
                                    &plan,
                                    None,
                                    &method.pair,
                                    &method.strategy,
                                    &mut HashSet::new(),
                                ),
                            })
                            .collect(),
                        errors: Vec::new(),
                    }
                }
                Err(diagnostics) => {
                    tracing::warn!(
                        "contract {} rejected ({} error(s))",
                        contract.id,
                        diagnostics.len()
                    );
                    ContractReport {
                        contract: contract.id.clone(),
                        ignore_missing_properties,
                        methods: Vec::new(),
                        errors: diagnostics.iter().map(ToString::to_string).collect(),
                    }
                }
            }
        })
        .collect();
    Ok(reports)
}

fn node(
    plan: &MappingPlan,
    label: Option<String>,
    pair: &TypePair,
    strategy: &MappingStrategy,
    expanding: &mut HashSet<TypePair>,
) -> StrategyNode {
    let mut node = StrategyNode {
        label,
        pair: pair.to_string(),
        strategy: strategy.to_string(),
        constants: Vec::new(),
        skipped: Vec::new(),
        children: Vec::new(),
        recursive: false,
    };

    match strategy {
        MappingStrategy::ArrayMapping(element) => {
            if let Some(components) = pair.components() {
                node.children.push(self::node(
                    plan,
                    Some("[]".into()),
                    &components,
                    element,
                    expanding,
                ));
            }
        }
        MappingStrategy::EnumByName => {
            if let Some(enum_plan) = plan.enumeration(pair) {
                let mut constants: Vec<_> = enum_plan
                    .constants
                    .iter()
                    .map(|(source, target)| match target {
                        Some(target) => format!("{} -> {}", source, target),
                        None => format!("{} -> (default)", source),
                    })
                    .collect();
                constants.sort();
                node.constants = constants;
            }
        }
        MappingStrategy::NestedBean => {
            if !expanding.insert(pair.clone()) {
                node.recursive = true;
                return node;
            }
            if let Some(bean) = plan.bean(pair) {
                node.skipped = bean.skipped.clone();
                for property in &bean.properties {
                    let child = self::node(
                        plan,
                        Some(property.name.clone()),
                        &property.pair,
                        &property.strategy,
                        expanding,
                    );
                    node.children.push(child);
                }
            }
            expanding.remove(pair);
        }
        MappingStrategy::SamePrimitive
        | MappingStrategy::SameDeclaredIdentity
        | MappingStrategy::Unsupported => {}
    }
    node
}

/// Human-readable rendering of `reports`.
pub fn render_text(reports: &[ContractReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(
            out,
            "contract {} (ignore_missing_properties = {})",
            report.contract, report.ignore_missing_properties
        );
        for error in &report.errors {
            let _ = writeln!(out, "  error: {}", error);
        }
        for method in &report.methods {
            let _ = writeln!(out, "  {}:", method.name);
            render_node(&mut out, &method.tree, 2);
        }
    }
    out
}

fn render_node(out: &mut String, node: &StrategyNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = node
        .label
        .as_deref()
        .map(|l| format!("{}: ", l))
        .unwrap_or_default();
    let recursive = if node.recursive { " (recursive)" } else { "" };
    let _ = writeln!(
        out,
        "{}{}{} => {}{}",
        indent, label, node.pair, node.strategy, recursive
    );
    for constant in &node.constants {
        let _ = writeln!(out, "{}  {}", indent, constant);
    }
    for skipped in &node.skipped {
        let _ = writeln!(out, "{}  {}: (default)", indent, skipped);
    }
    for child in &node.children {
        render_node(out, child, depth + 1);
    }
}
