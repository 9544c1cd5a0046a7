//! Rendering of `Key` attribute arguments back into source expressions.

use crate::attributes::TypedConstant;
use crate::rewriter::FullQualifyingRewriter;
use crate::semantics::SemanticModel;
use crate::syntax::Expr;

/// Converts a `Key` named-argument into the expression text emitted inside
/// the keyed registration call.
///
/// Two cases, in priority order:
///
/// 1. a string constant whose source expression is a `nameof(...)` call
///    renders as a quoted literal of the *resolved* name, that is the constant
///    value, not the raw expression text;
/// 2. anything else takes the original source expression and runs it
///    through the full-qualifying rewriter, so every symbol reference in
///    it survives insertion into the configured target namespace.
///
/// Returns `None` when the application carried no source expression for
/// the argument, which cannot happen for user code that compiles.
///
/// # Examples
///
/// ```rust
/// use regchain::attributes::TypedConstant;
/// use regchain::key_render::render_key_expression;
/// use regchain::semantics::SemanticModel;
/// use regchain::syntax::Expr;
///
/// let model = SemanticModel::new().with_system_types();
///
/// let constant = TypedConstant::string("MyClass");
/// let expr = Expr::name_of(Expr::identifier("MyClass"));
/// assert_eq!(
///     render_key_expression(&constant, Some(&expr), &model),
///     Some("\"MyClass\"".to_string())
/// );
/// ```
pub fn render_key_expression(
    constant: &TypedConstant,
    expression: Option<&Expr>,
    model: &SemanticModel,
) -> Option<String> {
    let expression = expression?;

    if let Some(resolved) = constant.as_string() {
        if expression.is_nameof_invocation() {
            return Some(format!("\"{}\"", resolved));
        }
    }

    let rewritten = FullQualifyingRewriter::new(model).rewrite(expression);
    Some(rewritten.to_source().trim().to_string())
}
