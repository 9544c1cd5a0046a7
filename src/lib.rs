//! # regchain
//!
//! Compile-time generation of dependency-injection registration chains.
//!
//! Given a snapshot of a compilation (the annotated type declarations, the
//! semantic model resolving them and the referenced assemblies), regchain
//! produces the source of a per-assembly `DependencyRegistrator` class: a
//! stub with overridable lifecycle hooks and an implementation whose
//! generated bodies wire up every referenced registrator and register every
//! annotated service with the right lifetime, contract types, key and
//! factory.
//!
//! ## Pipeline
//!
//! - **Classification**: an attribute participates in registration when its
//!   attribute class converts to the registration marker interface, which
//!   covers both the base attribute and custom attributes derived from it.
//! - **Extraction**: every marker attribute on a type (or inherited from
//!   its interfaces, or layered through custom attribute classes) yields a
//!   registration record; values declared closest to the type win.
//! - **Resolution**: factory bindings resolve to a unique static method,
//!   keyed registrations render their key expression fully qualified.
//! - **Emission**: the records become deterministic registration statements
//!   inside the generated registrator implementation.
//!
//! ## Quick Start
//!
//! ```rust
//! use regchain::{
//!     AttributeData, CancellationToken, CompilationSnapshot,
//!     DependencyInjectionGenerator, SemanticModel, Span, TypeSymbol, TypedConstant,
//! };
//! use regchain::syntax::{DeclarationKind, DeclarationNode};
//!
//! // The marker interface, the base attribute and the scoped variant the
//! // way the runtime library declares them.
//! let marker = TypeSymbol::interface("IRegisterServiceAttribute").build();
//! let base_attribute = TypeSymbol::class("RegisterServiceAttribute")
//!     .implements(marker.clone())
//!     .build();
//! let scope_enum = TypeSymbol::enumeration("RegistrationScope").build();
//! let singleton_attribute = TypeSymbol::class("RegisterServiceSingletonAttribute")
//!     .base(base_attribute.clone())
//!     .attribute(
//!         AttributeData::new(base_attribute).with_constructor_argument(TypedConstant::Enum {
//!             enum_type: scope_enum,
//!             member: "Singleton".to_string(),
//!             ordinal: 2,
//!         }),
//!     )
//!     .build();
//!
//! // An annotated service implementing its conventional interface.
//! let contract = TypeSymbol::interface("IGreeter").build();
//! let service = TypeSymbol::class("Greeter")
//!     .implements(contract)
//!     .attribute(AttributeData::new(singleton_attribute))
//!     .build();
//! let node = DeclarationNode::new("Greeter", DeclarationKind::Class, Span::new(0, 0))
//!     .with_attributes();
//!
//! let snapshot = CompilationSnapshot::new("Demo.App", SemanticModel::new())
//!     .with_marker(marker)
//!     .with_candidate(node, service);
//!
//! let generator = DependencyInjectionGenerator::new();
//! let output = generator.run(&snapshot, &CancellationToken::new()).unwrap();
//!
//! let implementation = output
//!     .source("DependencyRegistrator_AssemblyNameNamespace.impl")
//!     .unwrap();
//! assert!(implementation
//!     .text
//!     .contains("services.AddSingleton<global::IGreeter, global::Greeter>();"));
//! ```
//!
//! ## Generated shape
//!
//! The stub phase emits a partial class with `doBefore*` / `doAfter*`
//! partial hooks around the generated bodies, plus extension methods on the
//! service collection that initialize and execute the chain. The
//! implementation phase fills in `initializeDependenciesGenerated` (one
//! `AddDependency` per upstream registrator) and
//! `registerServicesGenerated` (one statement per resolved record).
//!
//! The [`chain`] module carries the runtime side of the contract: the
//! registrator trait, the deduplicating dependency collection and the
//! builder the generated extension methods delegate to.

pub mod attributes;
pub mod cancellation;
pub mod chain;
pub mod classifier;
pub mod codebuild;
pub mod diagnostics;
pub mod emitter;
pub mod factory;
pub mod generator;
pub mod key_render;
pub mod registration;
pub mod rewriter;
pub mod scope;
pub mod semantics;
pub mod symbols;
pub mod syntax;

pub use attributes::{AttributeData, AttributeSyntax, TypedConstant};
pub use cancellation::{Cancelled, CancellationToken};
pub use chain::{DependencyCollection, DependencyRegistrator, DependencyRegistratorBuilder};
pub use classifier::is_registration_marker;
pub use diagnostics::{Diagnostic, DiagnosticDescriptor, Location, Severity, Span};
pub use emitter::{GeneratedSource, OutputSink, DEPENDENCY_REGISTRATOR_CLASS_NAME};
pub use factory::FactoryResolution;
pub use generator::{
    AnalyzerOptions, CompilationSnapshot, DependencyInjectionGenerator, GeneratorError,
    GeneratorOutput, Language, ReferencedAssembly, ScanConfig,
};
pub use registration::{get_registration_infos, ServiceRegistrationInfo};
pub use rewriter::FullQualifyingRewriter;
pub use scope::RegistrationScope;
pub use semantics::{ResolvedSymbol, SemanticModel};
pub use symbols::{Accessibility, MethodKind, MethodSymbol, TypeKind, TypeSymbol};
