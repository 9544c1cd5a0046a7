//! Syntax rewriter that fully qualifies symbol references.
//!
//! Generated registration code is inserted into a namespace chosen by
//! configuration, not the namespace of the file the attribute was written
//! in, so no using directives can be assumed. This rewriter replaces short
//! type and member references with `global::`-qualified equivalents so the
//! emitted snippet is self-sufficient anywhere. Every rewrite case is
//! independently idempotent and preserves the node's trivia.

use crate::semantics::{ResolvedSymbol, SemanticModel};
use crate::syntax::{Expr, ExprKind, Initializer, TypeRef};

/// Tree-to-tree transformer over the expression model.
///
/// # Examples
///
/// ```rust
/// use regchain::rewriter::FullQualifyingRewriter;
/// use regchain::semantics::SemanticModel;
/// use regchain::symbols::TypeSymbol;
/// use regchain::syntax::Expr;
///
/// let mut model = SemanticModel::new().with_system_types();
/// model.register(TypeSymbol::class("MyType").build());
///
/// let rewriter = FullQualifyingRewriter::new(&model);
///
/// // typeof(String) picks up the keyword alias.
/// assert_eq!(rewriter.rewrite(&Expr::type_of("String")).to_source(), "typeof(string)");
///
/// // nameof(MyType) becomes a fully qualified string literal.
/// let nameof = Expr::name_of(Expr::identifier("MyType"));
/// assert_eq!(rewriter.rewrite(&nameof).to_source(), "\"global::MyType\"");
/// ```
pub struct FullQualifyingRewriter<'a> {
    model: &'a SemanticModel,
}

impl<'a> FullQualifyingRewriter<'a> {
    pub fn new(model: &'a SemanticModel) -> Self {
        Self { model }
    }

    /// Rewrites one expression tree.
    pub fn rewrite(&self, expr: &Expr) -> Expr {
        let kind = match &expr.kind {
            ExprKind::TypeOf(type_ref) => ExprKind::TypeOf(self.rewrite_type_ref(type_ref)),
            ExprKind::ArrayCreation {
                element_type,
                initializer,
            } => ExprKind::ArrayCreation {
                element_type: self.rewrite_type_ref(element_type),
                initializer: initializer.as_ref().map(|i| self.rewrite_initializer(i)),
            },
            ExprKind::ImplicitArrayCreation(initializer) => {
                ExprKind::ImplicitArrayCreation(self.rewrite_initializer(initializer))
            }
            ExprKind::MemberAccess { target, member } => {
                match self.model.symbol_for(expr) {
                    Some(ResolvedSymbol::Field { containing, name })
                    | Some(ResolvedSymbol::Property { containing, name }) => {
                        // Replace the whole access with the member's fully
                        // qualified display form.
                        ExprKind::Identifier(format!(
                            "{}.{}",
                            containing.fully_qualified_name(),
                            name
                        ))
                    }
                    _ => ExprKind::MemberAccess {
                        target: Box::new(self.rewrite(target)),
                        member: member.clone(),
                    },
                }
            }
            ExprKind::Invocation { callee, arguments } => {
                if expr.is_nameof_invocation() {
                    if let Some(rewritten) = self.rewrite_nameof(arguments) {
                        rewritten
                    } else {
                        ExprKind::Invocation {
                            callee: callee.clone(),
                            arguments: arguments.iter().map(|a| self.rewrite(a)).collect(),
                        }
                    }
                } else {
                    ExprKind::Invocation {
                        callee: Box::new(self.rewrite(callee)),
                        arguments: arguments.iter().map(|a| self.rewrite(a)).collect(),
                    }
                }
            }
            ExprKind::Identifier(_) => match self.model.symbol_for(expr) {
                Some(ResolvedSymbol::NamedType(ty)) if !ty.is_error_type() => {
                    ExprKind::Identifier(ty.fully_qualified_name())
                }
                _ => expr.kind.clone(),
            },
            ExprKind::Literal(_) => expr.kind.clone(),
        };

        Expr {
            kind,
            trivia: expr.trivia.clone(),
        }
    }

    /// `nameof(X)` where `X` binds to a named type collapses to a string
    /// literal of the fully qualified type name. This deliberately diverges
    /// from `nameof`'s simple-name semantics: the emitted key must stay
    /// unambiguous outside its original compilation context.
    fn rewrite_nameof(&self, arguments: &[Expr]) -> Option<ExprKind> {
        let argument = arguments.first()?;
        match self.model.symbol_for(argument)? {
            ResolvedSymbol::NamedType(ty) if !ty.is_error_type() => Some(ExprKind::Literal(
                format!("\"{}\"", ty.fully_qualified_name()),
            )),
            _ => None,
        }
    }

    fn rewrite_type_ref(&self, type_ref: &TypeRef) -> TypeRef {
        match self.model.type_for(type_ref) {
            Some(ty) if !ty.is_error_type() => type_ref.with_text(ty.fully_qualified_name()),
            _ => type_ref.clone(),
        }
    }

    fn rewrite_initializer(&self, initializer: &Initializer) -> Initializer {
        Initializer {
            expressions: initializer
                .expressions
                .iter()
                .map(|e| self.rewrite(e))
                .collect(),
            separator: ", ".to_string(),
        }
    }
}
