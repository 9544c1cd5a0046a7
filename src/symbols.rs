//! Host type-symbol model consumed by the generator core.
//!
//! The incremental host hands the core an immutable snapshot of the type
//! system: named types with their attributes, implemented interfaces,
//! members, and generic shape. Symbols are `Arc`-shared value objects built
//! once per snapshot; the core never mutates them, which keeps every
//! pipeline stage a pure function of its inputs.

use std::sync::Arc;

use crate::attributes::AttributeData;

/// Classification of a named type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    /// A generic type parameter (`T` in `Foo<T>`).
    TypeParameter,
    /// An unresolved or ill-formed type. All classification and conversion
    /// queries are total over error types and answer `false`.
    Error,
}

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    Private,
}

/// Kind of a method member. Factory resolution only ever considers
/// [`MethodKind::Ordinary`] members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    Operator,
    PropertyAccessor,
}

/// A method parameter: name plus type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: String,
    pub param_type: Arc<TypeSymbol>,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, param_type: Arc<TypeSymbol>) -> Self {
        Self {
            name: name.into(),
            param_type,
        }
    }
}

/// A method member of a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub is_static: bool,
    pub accessibility: Accessibility,
    pub method_kind: MethodKind,
    /// `None` means the method returns void.
    pub return_type: Option<Arc<TypeSymbol>>,
    pub parameters: Vec<ParameterSymbol>,
}

impl MethodSymbol {
    /// A public instance method with the given return type and no parameters.
    pub fn new(name: impl Into<String>, return_type: Option<Arc<TypeSymbol>>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            accessibility: Accessibility::Public,
            method_kind: MethodKind::Ordinary,
            return_type,
            parameters: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.method_kind = kind;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<ParameterSymbol>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_none()
    }
}

/// An immutable named type symbol.
///
/// Identity (equality, hashing) is structural over namespace, name, generic
/// shape and kind; attributes and members do not participate, mirroring
/// how a host compiler compares type references.
///
/// # Examples
///
/// ```rust
/// use regchain::symbols::{TypeSymbol, TypeKind};
///
/// let iface = TypeSymbol::interface("IWorker").namespace("App.Contracts").build();
/// let worker = TypeSymbol::class("Worker")
///     .namespace("App")
///     .implements(iface.clone())
///     .build();
///
/// assert!(worker.has_implicit_conversion(&iface));
/// assert_eq!(iface.fully_qualified_name(), "global::App.Contracts.IWorker");
/// assert_eq!(worker.kind, TypeKind::Class);
/// ```
#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub name: String,
    pub namespace: Option<String>,
    pub kind: TypeKind,
    pub is_abstract: bool,
    /// Display-level nullability (`object?`).
    pub is_nullable: bool,
    /// Bound generic arguments; empty for non-generic and unbound types.
    pub type_arguments: Vec<Arc<TypeSymbol>>,
    /// Number of generic parameters the definition declares.
    pub arity: usize,
    pub is_unbound_generic: bool,
    pub base_type: Option<Arc<TypeSymbol>>,
    /// Directly implemented interfaces.
    pub interfaces: Vec<Arc<TypeSymbol>>,
    pub attributes: Vec<AttributeData>,
    pub methods: Vec<MethodSymbol>,
    /// Field member names (includes enum members).
    pub fields: Vec<String>,
    /// Property member names.
    pub properties: Vec<String>,
}

impl TypeSymbol {
    pub fn class(name: impl Into<String>) -> TypeSymbolBuilder {
        TypeSymbolBuilder::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> TypeSymbolBuilder {
        TypeSymbolBuilder::new(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<String>) -> TypeSymbolBuilder {
        TypeSymbolBuilder::new(name, TypeKind::Interface)
    }

    pub fn enumeration(name: impl Into<String>) -> TypeSymbolBuilder {
        TypeSymbolBuilder::new(name, TypeKind::Enum)
    }

    pub fn type_parameter(name: impl Into<String>) -> Arc<TypeSymbol> {
        TypeSymbolBuilder::new(name, TypeKind::TypeParameter).build()
    }

    pub fn error(name: impl Into<String>) -> Arc<TypeSymbol> {
        TypeSymbolBuilder::new(name, TypeKind::Error).build()
    }

    /// A well-known type from the `System` namespace.
    pub fn system(name: impl Into<String>) -> TypeSymbolBuilder {
        TypeSymbolBuilder::new(name, TypeKind::Class).namespace("System")
    }

    /// The host's service-provider contract type (`System.IServiceProvider`).
    pub fn service_provider() -> Arc<TypeSymbol> {
        TypeSymbolBuilder::new("IServiceProvider", TypeKind::Interface)
            .namespace("System")
            .build()
    }

    /// The boxed key parameter type of keyed factories (`object` / `object?`).
    pub fn object(nullable: bool) -> Arc<TypeSymbol> {
        let mut builder = TypeSymbol::system("Object");
        if nullable {
            builder = builder.nullable();
        }
        builder.build()
    }

    pub fn is_error_type(&self) -> bool {
        self.kind == TypeKind::Error
    }

    pub fn is_generic(&self) -> bool {
        self.arity > 0
    }

    /// Namespace-qualified metadata name without display aliases
    /// (`System.IServiceProvider`).
    pub fn metadata_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Language keyword alias for well-known types, if any (`System.String`
    /// displays as `string`).
    fn keyword_alias(&self) -> Option<&'static str> {
        if self.namespace.as_deref() != Some("System") || self.is_generic() {
            return None;
        }
        let keyword = match self.name.as_str() {
            "String" => "string",
            "Boolean" => "bool",
            "Object" => "object",
            "Int32" => "int",
            "Int64" => "long",
            "Int16" => "short",
            "UInt32" => "uint",
            "UInt64" => "ulong",
            "Byte" => "byte",
            "SByte" => "sbyte",
            "Double" => "double",
            "Single" => "float",
            "Decimal" => "decimal",
            "Char" => "char",
            "Void" => "void",
            _ => return None,
        };
        Some(keyword)
    }

    /// Fully qualified display form used in emitted source: `global::`
    /// prefixed, keyword aliases applied, generic arguments rendered
    /// recursively, unbound generics as `Name<>` / `Name<,>`.
    pub fn fully_qualified_name(&self) -> String {
        let mut result = match self.keyword_alias() {
            Some(keyword) => keyword.to_string(),
            None => {
                if self.kind == TypeKind::TypeParameter {
                    self.name.clone()
                } else {
                    format!("global::{}{}", self.prefix(), self.name)
                }
            }
        };

        if self.is_unbound_generic {
            result.push('<');
            result.push_str(&",".repeat(self.arity.saturating_sub(1)));
            result.push('>');
        } else if !self.type_arguments.is_empty() {
            let args: Vec<String> = self
                .type_arguments
                .iter()
                .map(|a| a.fully_qualified_name())
                .collect();
            result.push('<');
            result.push_str(&args.join(", "));
            result.push('>');
        }

        if self.is_nullable {
            result.push('?');
        }

        result
    }

    fn prefix(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.", ns),
            None => String::new(),
        }
    }

    /// All interfaces the type implements, transitively, including those
    /// contributed by base types. Stable discovery order, deduplicated.
    pub fn all_interfaces(&self) -> Vec<Arc<TypeSymbol>> {
        let mut result: Vec<Arc<TypeSymbol>> = Vec::new();
        let mut queue: Vec<Arc<TypeSymbol>> = self.interfaces.clone();

        let mut base = self.base_type.clone();
        while let Some(b) = base {
            queue.extend(b.interfaces.iter().cloned());
            base = b.base_type.clone();
        }

        let mut index = 0;
        while index < queue.len() {
            let current = queue[index].clone();
            index += 1;
            if result.iter().any(|i| **i == *current) {
                continue;
            }
            queue.extend(current.interfaces.iter().cloned());
            result.push(current);
        }

        result
    }

    /// Host type-system test: does a value of this type implicitly convert
    /// to `target`? Covers identity, base-class chains and the transitive
    /// interface closure. Error types never convert.
    pub fn has_implicit_conversion(&self, target: &TypeSymbol) -> bool {
        if self.is_error_type() || target.is_error_type() {
            return false;
        }
        if *self == *target {
            return true;
        }

        let mut base = self.base_type.clone();
        while let Some(b) = base {
            if *b == *target {
                return true;
            }
            base = b.base_type.clone();
        }

        self.all_interfaces().iter().any(|i| **i == *target)
    }

    /// The open-generic form of a bound generic type (`IRepo<T>` → `IRepo<>`).
    pub fn construct_unbound_generic(self: &Arc<Self>) -> Arc<TypeSymbol> {
        if !self.is_generic() || self.is_unbound_generic {
            return self.clone();
        }
        let mut unbound = (**self).clone();
        unbound.type_arguments.clear();
        unbound.is_unbound_generic = true;
        Arc::new(unbound)
    }

    /// Method members, optionally filtered by name.
    pub fn get_members<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> impl Iterator<Item = &'a MethodSymbol> + 'a {
        self.methods
            .iter()
            .filter(move |m| name.map_or(true, |n| m.name == n))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }
}

impl PartialEq for TypeSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.namespace == other.namespace
            && self.arity == other.arity
            && self.is_unbound_generic == other.is_unbound_generic
            && self.is_nullable == other.is_nullable
            && self.type_arguments == other.type_arguments
    }
}

impl Eq for TypeSymbol {}

impl std::hash::Hash for TypeSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.name.hash(state);
        self.namespace.hash(state);
        self.arity.hash(state);
        self.is_unbound_generic.hash(state);
        self.is_nullable.hash(state);
        for arg in &self.type_arguments {
            arg.hash(state);
        }
    }
}

impl std::fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fully_qualified_name())
    }
}

/// Builder for [`TypeSymbol`]. Snapshot construction happens exactly once
/// per host evaluation; the built symbol is shared immutably afterwards.
#[derive(Debug, Clone)]
pub struct TypeSymbolBuilder {
    inner: TypeSymbol,
}

impl TypeSymbolBuilder {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            inner: TypeSymbol {
                name: name.into(),
                namespace: None,
                kind,
                is_abstract: false,
                is_nullable: false,
                type_arguments: Vec::new(),
                arity: 0,
                is_unbound_generic: false,
                base_type: None,
                interfaces: Vec::new(),
                attributes: Vec::new(),
                methods: Vec::new(),
                fields: Vec::new(),
                properties: Vec::new(),
            },
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.inner.namespace = Some(namespace.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.inner.is_abstract = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.inner.is_nullable = true;
        self
    }

    pub fn base(mut self, base: Arc<TypeSymbol>) -> Self {
        self.inner.base_type = Some(base);
        self
    }

    pub fn implements(mut self, interface: Arc<TypeSymbol>) -> Self {
        self.inner.interfaces.push(interface);
        self
    }

    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.inner.attributes.push(attribute);
        self
    }

    pub fn method(mut self, method: MethodSymbol) -> Self {
        self.inner.methods.push(method);
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.inner.fields.push(name.into());
        self
    }

    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.inner.properties.push(name.into());
        self
    }

    /// Bound generic arguments; also sets the arity.
    pub fn type_arguments(mut self, args: Vec<Arc<TypeSymbol>>) -> Self {
        self.inner.arity = args.len();
        self.inner.type_arguments = args;
        self
    }

    /// Marks the type as an open generic with the given arity.
    pub fn unbound(mut self, arity: usize) -> Self {
        self.inner.arity = arity;
        self.inner.type_arguments.clear();
        self.inner.is_unbound_generic = true;
        self
    }

    pub fn build(self) -> Arc<TypeSymbol> {
        Arc::new(self.inner)
    }
}
