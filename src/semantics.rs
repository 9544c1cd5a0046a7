//! Semantic resolution over the expression syntax model.
//!
//! A [`SemanticModel`] stands in for the host's per-file resolution scope:
//! short names resolve according to the original file's usings/aliases,
//! dotted paths resolve against the registered type table. The model is
//! immutable once built, like every other snapshot input.

use std::collections::HashMap;
use std::sync::Arc;

use crate::symbols::TypeSymbol;
use crate::syntax::{Expr, ExprKind, TypeRef};

/// What an expression resolved to.
#[derive(Debug, Clone)]
pub enum ResolvedSymbol {
    NamedType(Arc<TypeSymbol>),
    Field {
        containing: Arc<TypeSymbol>,
        name: String,
    },
    Property {
        containing: Arc<TypeSymbol>,
        name: String,
    },
}

/// Name-resolution scope for the file a registration attribute was written
/// in.
#[derive(Debug, Clone, Default)]
pub struct SemanticModel {
    by_short_name: HashMap<String, Arc<TypeSymbol>>,
    all_types: Vec<Arc<TypeSymbol>>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `symbol` resolvable by its simple name (as if imported by a
    /// using directive).
    pub fn register(&mut self, symbol: Arc<TypeSymbol>) {
        self.by_short_name
            .insert(symbol.name.clone(), symbol.clone());
        self.all_types.push(symbol);
    }

    /// Makes `symbol` resolvable under an alias (keyword aliases, using
    /// aliases).
    pub fn register_alias(&mut self, alias: impl Into<String>, symbol: Arc<TypeSymbol>) {
        self.by_short_name.insert(alias.into(), symbol.clone());
        self.all_types.push(symbol);
    }

    /// Registers the well-known `System` types under both their type names
    /// and their keyword aliases (`String`/`string`, ...).
    pub fn with_system_types(mut self) -> Self {
        for (name, keyword) in [
            ("String", "string"),
            ("Boolean", "bool"),
            ("Object", "object"),
            ("Int32", "int"),
            ("Int64", "long"),
            ("Double", "double"),
            ("Char", "char"),
        ] {
            let symbol = TypeSymbol::system(name).build();
            self.register_alias(keyword, symbol.clone());
            self.by_short_name.insert(name.to_string(), symbol);
        }
        self
    }

    /// Resolves a textual type reference.
    pub fn type_for(&self, type_ref: &TypeRef) -> Option<Arc<TypeSymbol>> {
        self.resolve_dotted(type_ref.text.trim())
    }

    /// Resolves an expression to a symbol, or `None` when it does not bind.
    pub fn symbol_for(&self, expr: &Expr) -> Option<ResolvedSymbol> {
        match &expr.kind {
            ExprKind::Identifier(name) => self
                .by_short_name
                .get(name)
                .cloned()
                .map(ResolvedSymbol::NamedType),
            ExprKind::TypeOf(type_ref) => {
                self.type_for(type_ref).map(ResolvedSymbol::NamedType)
            }
            ExprKind::MemberAccess { target, member } => {
                if let Some(containing) = self.resolve_type_expr(target) {
                    if containing.has_field(member) {
                        return Some(ResolvedSymbol::Field {
                            containing,
                            name: member.clone(),
                        });
                    }
                    if containing.has_property(member) {
                        return Some(ResolvedSymbol::Property {
                            containing,
                            name: member.clone(),
                        });
                    }
                }
                // The whole dotted chain may name a type.
                dotted_path(expr)
                    .and_then(|path| self.resolve_dotted(&path))
                    .map(ResolvedSymbol::NamedType)
            }
            _ => None,
        }
    }

    fn resolve_type_expr(&self, expr: &Expr) -> Option<Arc<TypeSymbol>> {
        dotted_path(expr).and_then(|path| self.resolve_dotted(&path))
    }

    fn resolve_dotted(&self, path: &str) -> Option<Arc<TypeSymbol>> {
        if let Some(symbol) = self.by_short_name.get(path) {
            return Some(symbol.clone());
        }
        self.all_types
            .iter()
            .find(|t| t.metadata_name() == path)
            .cloned()
    }
}

/// Flattens an identifier / member-access chain into its dotted path, or
/// `None` for any other expression shape.
fn dotted_path(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some(name.clone()),
        ExprKind::MemberAccess { target, member } => {
            dotted_path(target).map(|prefix| format!("{}.{}", prefix, member))
        }
        _ => None,
    }
}
