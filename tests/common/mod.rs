//! Shared fixtures: the runtime library's annotation types rebuilt as
//! snapshot symbols, plus snapshot assembly helpers.

#![allow(dead_code)]

use std::sync::Arc;

use regchain::syntax::{DeclarationKind, DeclarationNode};
use regchain::{
    AttributeData, CompilationSnapshot, SemanticModel, Span, TypeSymbol, TypedConstant,
};

/// The registration marker interface.
pub fn marker() -> Arc<TypeSymbol> {
    TypeSymbol::interface("IRegisterServiceAttribute")
        .namespace("Regchain.Registration.Annotations")
        .build()
}

pub fn scope_enum() -> Arc<TypeSymbol> {
    TypeSymbol::enumeration("RegistrationScope")
        .namespace("Regchain.Registration.Annotations")
        .build()
}

/// The base `RegisterServiceAttribute`, implementing the marker.
pub fn base_attribute(marker: &Arc<TypeSymbol>) -> Arc<TypeSymbol> {
    TypeSymbol::class("RegisterServiceAttribute")
        .namespace("Regchain.Registration.Annotations")
        .implements(marker.clone())
        .build()
}

pub fn scope_constant(member: &str, ordinal: i64) -> TypedConstant {
    TypedConstant::Enum {
        enum_type: scope_enum(),
        member: member.to_string(),
        ordinal,
    }
}

/// A scope-specific attribute class (`RegisterServiceSingletonAttribute`
/// and friends): derives from the base attribute and is itself annotated
/// with it, carrying the scope as a constructor argument.
pub fn scope_attribute(
    base: &Arc<TypeSymbol>,
    scope_name: &str,
    ordinal: i64,
) -> Arc<TypeSymbol> {
    TypeSymbol::class(format!("RegisterService{}Attribute", scope_name))
        .namespace("Regchain.Registration.Annotations")
        .base(base.clone())
        .attribute(
            AttributeData::new(base.clone())
                .with_constructor_argument(scope_constant(scope_name, ordinal)),
        )
        .build()
}

/// An application of `attribute_class` with no arguments.
pub fn plain_application(attribute_class: &Arc<TypeSymbol>) -> AttributeData {
    AttributeData::new(attribute_class.clone())
}

pub fn class_node(identifier: &str) -> DeclarationNode {
    DeclarationNode::new(identifier, DeclarationKind::Class, Span::new(0, identifier.len()))
        .with_attributes()
}

/// Everything the annotation library contributes, prebuilt: marker, base
/// attribute and the three scope variants.
pub struct Annotations {
    pub marker: Arc<TypeSymbol>,
    pub base: Arc<TypeSymbol>,
    pub transient: Arc<TypeSymbol>,
    pub scoped: Arc<TypeSymbol>,
    pub singleton: Arc<TypeSymbol>,
}

impl Annotations {
    pub fn new() -> Self {
        let marker = marker();
        let base = base_attribute(&marker);
        let transient = scope_attribute(&base, "Transient", 0);
        let scoped = scope_attribute(&base, "Scoped", 1);
        let singleton = scope_attribute(&base, "Singleton", 2);
        Self {
            marker,
            base,
            transient,
            scoped,
            singleton,
        }
    }
}

/// A snapshot over the given annotated candidates, marker wired in.
pub fn snapshot_with(
    annotations: &Annotations,
    candidates: Vec<(DeclarationNode, Arc<TypeSymbol>)>,
) -> CompilationSnapshot {
    let mut snapshot = CompilationSnapshot::new("Demo.App", SemanticModel::new())
        .with_marker(annotations.marker.clone());
    for (node, symbol) in candidates {
        snapshot = snapshot.with_candidate(node, symbol);
    }
    snapshot
}
