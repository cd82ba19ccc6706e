// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-pair classification.
//!
//! [`classify`] decides how a value of the source type turns into a value
//! of the target type. It is total: every well-formed pair yields a
//! [`MappingStrategy`], including [`MappingStrategy::Unsupported`]. Turning
//! an unsupported pair into a build diagnostic is left to the caller (see
//! [`crate::plan::Planner`]).
//!
//! # Precedence
//!
//! ```text
//! 1. primitive == primitive (same kind)      -> SamePrimitive
//! 2. declared, same canonical name           -> SameDeclaredIdentity
//! 3. enum    -> enum                         -> EnumByName
//! 4. array   -> array                        -> ArrayMapping(classify(components))
//! 5. bean    -> bean, different names        -> NestedBean
//! 6. anything else                           -> Unsupported
//! ```

use std::fmt;

use dashmap::DashMap;
use serde::Serialize;

use crate::descriptor::TypeDescriptor;

/// Ordered (source, target) pair of descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypePair {
    pub input: TypeDescriptor,
    pub output: TypeDescriptor,
}

impl TypePair {
    pub fn new(input: TypeDescriptor, output: TypeDescriptor) -> Self {
        Self { input, output }
    }

    /// True when the canonical names of both sides differ.
    pub fn differs(&self) -> bool {
        self.input.name() != self.output.name()
    }

    /// Component pair when both sides are arrays.
    pub fn components(&self) -> Option<TypePair> {
        match (self.input.component(), self.output.component()) {
            (Some(input), Some(output)) => Some(TypePair::new(input.clone(), output.clone())),
            _ => None,
        }
    }

    /// True when at least one side is an array and the ranks differ.
    pub fn rank_mismatch(&self) -> bool {
        (self.input.is_array() || self.output.is_array())
            && self.input.rank() != self.output.rank()
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}

/// Classification outcome for a [`TypePair`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum MappingStrategy {
    /// Same primitive kind on both sides: plain copy.
    SamePrimitive,
    /// Same declared type on both sides: passthrough.
    SameDeclaredIdentity,
    /// Two different enumerations: constant looked up by exact name.
    EnumByName,
    /// Array to array, each element converted with the inner strategy.
    ArrayMapping(Box<MappingStrategy>),
    /// Two different beans: property-by-property conversion.
    NestedBean,
    /// No conversion exists.
    Unsupported,
}

impl MappingStrategy {
    /// False if this strategy, or any element strategy below it, is
    /// `Unsupported`.
    pub fn is_supported(&self) -> bool {
        match self {
            Self::Unsupported => false,
            Self::ArrayMapping(element) => element.is_supported(),
            _ => true,
        }
    }

    /// Element strategy of an array mapping.
    pub fn element(&self) -> Option<&MappingStrategy> {
        match self {
            Self::ArrayMapping(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SamePrimitive => write!(f, "SamePrimitive"),
            Self::SameDeclaredIdentity => write!(f, "SameDeclaredIdentity"),
            Self::EnumByName => write!(f, "EnumByName"),
            Self::ArrayMapping(element) => write!(f, "ArrayMapping({})", element),
            Self::NestedBean => write!(f, "NestedBean"),
            Self::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Classify a type pair.
///
/// Pure and deterministic. An array source whose target is not an array
/// (or whose nesting runs out on the target side first) classifies its
/// innermost mismatched level as `Unsupported`; callers that need to report
/// the rank mismatch itself check [`TypePair::rank_mismatch`] first.
pub fn classify(pair: &TypePair) -> MappingStrategy {
    let (input, output) = (&pair.input, &pair.output);

    if let (Some(a), Some(b)) = (input.primitive_kind(), output.primitive_kind()) {
        if a == b {
            return MappingStrategy::SamePrimitive;
        }
    }

    if input.is_declared() && output.is_declared() && !pair.differs() {
        return MappingStrategy::SameDeclaredIdentity;
    }

    if input.is_enum() && output.is_enum() {
        return MappingStrategy::EnumByName;
    }

    if input.is_array() {
        return match pair.components() {
            Some(components) => MappingStrategy::ArrayMapping(Box::new(classify(&components))),
            None => MappingStrategy::Unsupported,
        };
    }

    if input.is_bean() && output.is_bean() {
        // differs() is true here, rule 2 caught identical names.
        return MappingStrategy::NestedBean;
    }

    MappingStrategy::Unsupported
}

/// Memoizing front-end for [`classify`].
///
/// Descriptors are immutable, so a strategy computed once for a pair stays
/// valid for the lifetime of the analyzer. Safe to share between threads.
#[derive(Debug, Default)]
pub struct Analyzer {
    cache: DashMap<TypePair, MappingStrategy>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `pair`, reusing a previous result when available.
    pub fn classify(&self, pair: &TypePair) -> MappingStrategy {
        if let Some(hit) = self.cache.get(pair) {
            return hit.clone();
        }
        let strategy = classify(pair);
        log::trace!("[XMapper] classified {} as {}", pair, strategy);
        self.cache
            .entry(pair.clone())
            .or_insert(strategy)
            .clone()
    }

    /// Number of distinct pairs classified so far.
    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;

    fn prim(kind: PrimitiveKind) -> TypeDescriptor {
        TypeDescriptor::primitive(kind)
    }

    fn pair(input: TypeDescriptor, output: TypeDescriptor) -> TypePair {
        TypePair::new(input, output)
    }

    #[test]
    fn equal_primitives_are_same_primitive() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(
                classify(&pair(prim(kind), prim(kind))),
                MappingStrategy::SamePrimitive
            );
        }
    }

    #[test]
    fn primitive_kind_mismatch_is_unsupported() {
        assert_eq!(
            classify(&pair(prim(PrimitiveKind::I32), prim(PrimitiveKind::I64))),
            MappingStrategy::Unsupported
        );
        assert_eq!(
            classify(&pair(prim(PrimitiveKind::F32), prim(PrimitiveKind::F64))),
            MappingStrategy::Unsupported
        );
    }

    #[test]
    fn identical_declared_names_pass_through() {
        let bean = TypeDescriptor::declared("app::Address");
        let p = pair(bean.clone(), bean);
        assert!(!p.differs());
        assert_eq!(classify(&p), MappingStrategy::SameDeclaredIdentity);

        let color = TypeDescriptor::enumeration("app::Color");
        assert_eq!(
            classify(&pair(color.clone(), color)),
            MappingStrategy::SameDeclaredIdentity
        );

        assert_eq!(
            classify(&pair(TypeDescriptor::string(), TypeDescriptor::string())),
            MappingStrategy::SameDeclaredIdentity
        );
    }

    #[test]
    fn differing_enums_map_by_name() {
        let p = pair(
            TypeDescriptor::enumeration("app::ColorIn"),
            TypeDescriptor::enumeration("app::ColorOut"),
        );
        assert!(p.differs());
        assert_eq!(classify(&p), MappingStrategy::EnumByName);
    }

    #[test]
    fn primitive_arrays_map_element_wise() {
        let p = pair(
            TypeDescriptor::array_of(prim(PrimitiveKind::I32)),
            TypeDescriptor::array_of(prim(PrimitiveKind::I32)),
        );
        assert_eq!(
            classify(&p),
            MappingStrategy::ArrayMapping(Box::new(MappingStrategy::SamePrimitive))
        );
    }

    #[test]
    fn nested_arrays_recurse() {
        let input = TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::declared(
            "app::PersonIn",
        )));
        let output = TypeDescriptor::array_of(TypeDescriptor::array_of(TypeDescriptor::declared(
            "app::PersonOut",
        )));
        let strategy = classify(&pair(input, output));
        assert_eq!(
            strategy,
            MappingStrategy::ArrayMapping(Box::new(MappingStrategy::ArrayMapping(Box::new(
                MappingStrategy::NestedBean
            ))))
        );
        assert!(strategy.is_supported());
    }

    #[test]
    fn rank_mismatch_is_detected_and_unsupported_inside() {
        let p = pair(
            TypeDescriptor::array_of(TypeDescriptor::array_of(prim(PrimitiveKind::U8))),
            TypeDescriptor::array_of(prim(PrimitiveKind::U8)),
        );
        assert!(p.rank_mismatch());
        let strategy = classify(&p);
        assert!(!strategy.is_supported());

        let to_scalar = pair(
            TypeDescriptor::array_of(prim(PrimitiveKind::U8)),
            prim(PrimitiveKind::U8),
        );
        assert!(to_scalar.rank_mismatch());
        assert_eq!(classify(&to_scalar), MappingStrategy::Unsupported);
    }

    #[test]
    fn differing_beans_are_nested() {
        assert_eq!(
            classify(&pair(
                TypeDescriptor::declared("app::PersonIn"),
                TypeDescriptor::declared("app::PersonOut"),
            )),
            MappingStrategy::NestedBean
        );
    }

    #[test]
    fn mixed_kinds_are_unsupported() {
        let cases = [
            (TypeDescriptor::enumeration("app::Color"), TypeDescriptor::declared("app::Other")),
            (prim(PrimitiveKind::I32), TypeDescriptor::string()),
            (TypeDescriptor::string(), prim(PrimitiveKind::Char)),
            (prim(PrimitiveKind::I32), TypeDescriptor::array_of(prim(PrimitiveKind::I32))),
        ];
        for (input, output) in cases {
            assert_eq!(classify(&pair(input, output)), MappingStrategy::Unsupported);
        }
    }

    #[test]
    fn analyzer_memoizes_by_value() {
        let analyzer = Analyzer::new();
        let a = pair(TypeDescriptor::declared("app::A"), TypeDescriptor::declared("app::B"));
        let b = pair(TypeDescriptor::declared("app::A"), TypeDescriptor::declared("app::B"));

        assert_eq!(analyzer.classify(&a), MappingStrategy::NestedBean);
        assert_eq!(analyzer.classify(&b), MappingStrategy::NestedBean);
        assert_eq!(analyzer.cached_pairs(), 1);
    }

    #[test]
    fn strategy_display_is_readable() {
        let strategy = MappingStrategy::ArrayMapping(Box::new(MappingStrategy::EnumByName));
        assert_eq!(strategy.to_string(), "ArrayMapping(EnumByName)");
    }
}
