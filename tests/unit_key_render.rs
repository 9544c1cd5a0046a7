//! Unit tests for key-expression rendering: the text that ends up inside
//! keyed registration calls.

use regchain::key_render::render_key_expression;
use regchain::syntax::Expr;
use regchain::{SemanticModel, TypeSymbol, TypedConstant};

fn model() -> SemanticModel {
    let mut model = SemanticModel::new().with_system_types();
    model.register(TypeSymbol::class("MyService").namespace("Demo.App").build());
    model.register(
        regchain::TypeSymbol::enumeration("Kind")
            .namespace("Demo.App")
            .field("Primary")
            .build(),
    );
    model
}

#[test]
fn nameof_string_constant_renders_the_resolved_name() {
    // nameof(MyService) produced the constant "MyService"; the emitted key
    // is the resolved simple name, not the nameof call.
    let constant = TypedConstant::string("MyService");
    let expr = Expr::name_of(Expr::identifier("MyService"));

    assert_eq!(
        render_key_expression(&constant, Some(&expr), &model()),
        Some("\"MyService\"".to_string())
    );
}

#[test]
fn plain_string_literal_keys_keep_their_text() {
    let constant = TypedConstant::string("a key");
    let expr = Expr::literal("\"a key\"");

    assert_eq!(
        render_key_expression(&constant, Some(&expr), &model()),
        Some("\"a key\"".to_string())
    );
}

#[test]
fn enum_member_keys_are_fully_qualified() {
    let constant = TypedConstant::Unknown;
    let expr = Expr::member_access(Expr::identifier("Kind"), "Primary");

    assert_eq!(
        render_key_expression(&constant, Some(&expr), &model()),
        Some("global::Demo.App.Kind.Primary".to_string())
    );
}

#[test]
fn array_keys_rewrite_every_element() {
    let constant = TypedConstant::Array(vec![]);
    let expr = Expr::implicit_array_creation(vec![
        Expr::member_access(Expr::identifier("Kind"), "Primary"),
        Expr::literal("\"fallback\""),
    ]);

    assert_eq!(
        render_key_expression(&constant, Some(&expr), &model()),
        Some("new[] { global::Demo.App.Kind.Primary, \"fallback\" }".to_string())
    );
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let constant = TypedConstant::Unknown;
    let expr = Expr::identifier("MyService").with_trivia("  ", " ");

    assert_eq!(
        render_key_expression(&constant, Some(&expr), &model()),
        Some("global::Demo.App.MyService".to_string())
    );
}

#[test]
fn missing_application_syntax_renders_nothing() {
    let constant = TypedConstant::string("orphan");
    assert_eq!(render_key_expression(&constant, None, &model()), None);
}
