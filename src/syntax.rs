//! Expression and declaration syntax consumed from the host syntax tree.
//!
//! Only the node shapes the generator actually inspects are modeled:
//! `typeof`/`nameof`, array creation, initializer lists, member access,
//! identifiers and literals (the shapes a `Key` argument can take), plus
//! the type-declaration header used by the syntax predicate and for
//! diagnostic locations. Every node carries its surrounding trivia so
//! rewrites can reproduce source text exactly.

use crate::diagnostics::{Location, Span};

/// Leading/trailing trivia (whitespace, comments) attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    pub leading: String,
    pub trailing: String,
}

impl Trivia {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self {
            leading: leading.into(),
            trailing: trailing.into(),
        }
    }
}

/// A textual type reference inside an expression (`string` in
/// `new string[] { .. }`, `String` in `typeof(String)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub text: String,
    pub trivia: Trivia,
}

impl TypeRef {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            trivia: Trivia::none(),
        }
    }

    /// Replaces the referenced name, keeping the original trivia.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            trivia: self.trivia.clone(),
        }
    }

    pub fn to_source(&self) -> String {
        format!("{}{}{}", self.trivia.leading, self.text, self.trivia.trailing)
    }
}

/// An ordered initializer expression list (`{ "a", "b" }`).
///
/// The separator between elements is recorded explicitly; the
/// full-qualifying rewrite regenerates it as a comma with a single
/// trailing space, which is part of the generated-code contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initializer {
    pub expressions: Vec<Expr>,
    pub separator: String,
}

impl Initializer {
    pub fn new(expressions: Vec<Expr>) -> Self {
        Self {
            expressions,
            separator: ",".to_string(),
        }
    }

    pub fn to_source(&self) -> String {
        let elements: Vec<String> = self.expressions.iter().map(Expr::to_source).collect();
        format!("{{ {} }}", elements.join(&self.separator))
    }
}

/// An expression node with trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub trivia: Trivia,
}

/// The expression shapes the generator inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// A bare identifier (`MyType`, `nameof`).
    Identifier(String),
    /// A literal token, stored as its exact source text (`"a"`, `42`).
    Literal(String),
    /// `target.member`.
    MemberAccess { target: Box<Expr>, member: String },
    /// `typeof(T)`.
    TypeOf(TypeRef),
    /// `callee(args)`; models `nameof(X)` among others.
    Invocation {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// `new T[] { .. }`.
    ArrayCreation {
        element_type: TypeRef,
        initializer: Option<Initializer>,
    },
    /// `new[] { .. }`.
    ImplicitArrayCreation(Initializer),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            trivia: Trivia::none(),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Identifier(name.into()))
    }

    /// A literal from its exact token text.
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(text.into()))
    }

    /// A quoted string literal for `value`.
    pub fn string_literal(value: &str) -> Self {
        Self::literal(format!("\"{}\"", value))
    }

    pub fn member_access(target: Expr, member: impl Into<String>) -> Self {
        Self::new(ExprKind::MemberAccess {
            target: Box::new(target),
            member: member.into(),
        })
    }

    pub fn type_of(type_name: impl Into<String>) -> Self {
        Self::new(ExprKind::TypeOf(TypeRef::new(type_name)))
    }

    pub fn name_of(argument: Expr) -> Self {
        Self::new(ExprKind::Invocation {
            callee: Box::new(Self::identifier("nameof")),
            arguments: vec![argument],
        })
    }

    pub fn array_creation(element_type: impl Into<String>, elements: Vec<Expr>) -> Self {
        Self::new(ExprKind::ArrayCreation {
            element_type: TypeRef::new(element_type),
            initializer: Some(Initializer::new(elements)),
        })
    }

    pub fn implicit_array_creation(elements: Vec<Expr>) -> Self {
        Self::new(ExprKind::ImplicitArrayCreation(Initializer::new(elements)))
    }

    pub fn with_trivia(mut self, leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        self.trivia = Trivia::new(leading, trailing);
        self
    }

    /// True for `nameof(..)` invocations, matched syntactically by callee
    /// identifier the way the host language does.
    pub fn is_nameof_invocation(&self) -> bool {
        match &self.kind {
            ExprKind::Invocation { callee, .. } => {
                matches!(&callee.kind, ExprKind::Identifier(name) if name == "nameof")
            }
            _ => false,
        }
    }

    /// Renders the exact source text of the expression, trivia included.
    pub fn to_source(&self) -> String {
        let body = match &self.kind {
            ExprKind::Identifier(name) => name.clone(),
            ExprKind::Literal(text) => text.clone(),
            ExprKind::MemberAccess { target, member } => {
                format!("{}.{}", target.to_source(), member)
            }
            ExprKind::TypeOf(type_ref) => format!("typeof({})", type_ref.to_source()),
            ExprKind::Invocation { callee, arguments } => {
                let args: Vec<String> = arguments.iter().map(Expr::to_source).collect();
                format!("{}({})", callee.to_source(), args.join(", "))
            }
            ExprKind::ArrayCreation {
                element_type,
                initializer,
            } => match initializer {
                Some(init) => format!("new {}[] {}", element_type.to_source(), init.to_source()),
                None => format!("new {}[]", element_type.to_source()),
            },
            ExprKind::ImplicitArrayCreation(init) => format!("new[] {}", init.to_source()),
        };
        format!("{}{}{}", self.trivia.leading, body, self.trivia.trailing)
    }
}

/// Kind of a candidate type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Struct,
    Interface,
}

/// The declaration header of a candidate type: enough syntax for the
/// generation predicate and for pointing diagnostics at the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationNode {
    pub identifier: String,
    pub kind: DeclarationKind,
    pub span: Span,
    pub has_base_list: bool,
    pub has_attributes: bool,
}

impl DeclarationNode {
    pub fn new(identifier: impl Into<String>, kind: DeclarationKind, span: Span) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            span,
            has_base_list: false,
            has_attributes: false,
        }
    }

    pub fn with_base_list(mut self) -> Self {
        self.has_base_list = true;
        self
    }

    pub fn with_attributes(mut self) -> Self {
        self.has_attributes = true;
        self
    }

    pub fn location(&self) -> Location {
        Location::Node(self.span)
    }
}
