//! Attribute application model at the extraction boundary.
//!
//! Attribute arguments arrive from the host reflection model as boxed,
//! dynamically typed constants. They are represented here as a closed
//! tagged union and converted into strongly typed registration fields
//! immediately during extraction; the dynamic representation never
//! propagates past that boundary.

use std::sync::Arc;

use crate::symbols::TypeSymbol;
use crate::syntax::Expr;

/// A boxed constant value of an attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedConstant {
    /// An enum member constant: the enum type, the member name and its
    /// ordinal value.
    Enum {
        enum_type: Arc<TypeSymbol>,
        member: String,
        ordinal: i64,
    },
    /// A `typeof(...)` constant.
    Type(Arc<TypeSymbol>),
    /// A primitive constant.
    Primitive(PrimitiveValue),
    /// An array constant.
    Array(Vec<TypedConstant>),
    /// Anything the host could not classify.
    Unknown,
}

/// Primitive constant values that can appear in attribute arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    String(String),
    Bool(bool),
    Int(i64),
}

impl TypedConstant {
    pub fn string(value: impl Into<String>) -> Self {
        TypedConstant::Primitive(PrimitiveValue::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        TypedConstant::Primitive(PrimitiveValue::Bool(value))
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            TypedConstant::Primitive(PrimitiveValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedConstant::Primitive(PrimitiveValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

/// The syntax of an attribute application, retained only as far as key
/// rendering needs it: the original expression of each named argument.
#[derive(Debug, Clone, Default)]
pub struct AttributeSyntax {
    named_arguments: Vec<(String, Expr)>,
}

impl AttributeSyntax {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_named_argument(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.named_arguments.push((name.into(), expr));
        self
    }

    /// The source expression of the single named argument called `name`.
    pub fn named_argument_expression(&self, name: &str) -> Option<&Expr> {
        let mut matches = self.named_arguments.iter().filter(|(n, _)| n == name);
        let first = matches.next();
        if matches.next().is_some() {
            return None;
        }
        first.map(|(_, e)| e)
    }
}

/// One attribute applied to a type declaration (or to another attribute
/// class, in the custom-attribute case).
#[derive(Debug, Clone)]
pub struct AttributeData {
    pub attribute_class: Arc<TypeSymbol>,
    pub constructor_arguments: Vec<TypedConstant>,
    pub named_arguments: Vec<(String, TypedConstant)>,
    /// Present when the application has source syntax; attribute-class-level
    /// applications resolved from metadata have none.
    pub application_syntax: Option<AttributeSyntax>,
}

impl AttributeData {
    pub fn new(attribute_class: Arc<TypeSymbol>) -> Self {
        Self {
            attribute_class,
            constructor_arguments: Vec::new(),
            named_arguments: Vec::new(),
            application_syntax: None,
        }
    }

    pub fn with_constructor_argument(mut self, value: TypedConstant) -> Self {
        self.constructor_arguments.push(value);
        self
    }

    pub fn with_named_argument(mut self, name: impl Into<String>, value: TypedConstant) -> Self {
        self.named_arguments.push((name.into(), value));
        self
    }

    pub fn with_syntax(mut self, syntax: AttributeSyntax) -> Self {
        self.application_syntax = Some(syntax);
        self
    }
}
