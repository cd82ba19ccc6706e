// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ahead-of-time checking for XMapper contracts.
//!
//! Reads a TOML manifest of types and contracts, runs the same plan builder
//! the generated mappers run at construction, and reports either the
//! strategy tree of every method or the build diagnostics.

pub mod manifest;
pub mod report;

pub use manifest::{
    ContractDecl, DeclKind, Manifest, ManifestError, MethodDecl, PropertyDecl, TypeDecl,
};
pub use report::{analyze, render_text, ContractReport, MethodReport, StrategyNode};
