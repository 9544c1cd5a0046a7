//! Registration records and the attribute-resolution engine.
//!
//! One [`ServiceRegistrationInfo`] is created per registration-marker
//! attribute application discovered on a type declaration, or, through
//! recursion, on a custom attribute class wrapping the base marker. Values
//! resolved at an outer level (closer to the concrete type declaration)
//! take precedence over attribute-class-level defaults, which only fill
//! gaps further up the chain.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::attributes::{AttributeData, TypedConstant};
use crate::cancellation::{Cancelled, CancellationToken};
use crate::classifier::is_registration_marker;
use crate::diagnostics::Diagnostic;
use crate::key_render::render_key_expression;
use crate::scope::RegistrationScope;
use crate::semantics::SemanticModel;
use crate::symbols::{TypeKind, TypeSymbol};
use crate::syntax::DeclarationNode;

/// One emitted registration statement candidate.
///
/// Records are private to the extraction of a single syntax node and become
/// immutable once the emitter consumes them. A record missing its scope,
/// implementation symbol or syntax node is not an error; it is dropped
/// silently before emission, because not every declaration with attributes
/// resolves to a registration.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistrationInfo {
    /// Lifetime of the registration; required at validation time.
    pub scope: Option<RegistrationScope>,
    /// The concrete type being registered.
    pub implementation_symbol: Option<Arc<TypeSymbol>>,
    /// The originating declaration, used for diagnostic locations.
    pub implementation_node: Option<DeclarationNode>,
    registered_services: IndexSet<Arc<TypeSymbol>>,
    /// Optional factory binding; only meaningful together with
    /// `factory_method_name` resolution.
    pub factory_type: Option<Arc<TypeSymbol>>,
    pub factory_method_name: Option<String>,
    /// Pre-rendered source expression for keyed registration.
    pub service_key: Option<String>,
    /// Resolved `"TypeName.MethodName"` reference; computed, never
    /// user-supplied.
    pub factory_information: Option<String>,
    /// Problems found while resolving this record.
    pub diagnostics: Vec<Diagnostic>,
}

impl ServiceRegistrationInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The service contract types to register *as*, in insertion order with
    /// duplicates suppressed. Empty means "register as itself".
    pub fn registered_services(&self) -> impl Iterator<Item = &Arc<TypeSymbol>> {
        self.registered_services.iter()
    }

    pub fn has_registered_services(&self) -> bool {
        !self.registered_services.is_empty()
    }

    pub fn add_registered_service(&mut self, service: Arc<TypeSymbol>) {
        self.registered_services.insert(service);
    }

    /// Defensive validation gate checked again before emission: scope,
    /// implementation symbol and syntax node must all be present.
    pub fn is_valid(&self) -> bool {
        self.scope.is_some()
            && self.implementation_symbol.is_some()
            && self.implementation_node.is_some()
    }
}

/// Attribute arguments of one application, decoded from the dynamic
/// constant representation.
#[derive(Debug, Clone, Default)]
struct AttributeArguments {
    scope: Option<RegistrationScope>,
    services_to_register: Option<Vec<Arc<TypeSymbol>>>,
    implements_itypename: bool,
    factory_type: Option<Arc<TypeSymbol>>,
    factory_method_name: Option<String>,
    service_key: Option<String>,
}

/// Resolves every registration record declared by `symbol`'s attributes and
/// the attributes of its (transitively) implemented interfaces.
///
/// `root_node` is the declaration syntax for the outermost call; recursive
/// resolution of custom attribute classes passes `None`. The root call
/// yields nothing when the symbol itself satisfies the marker
/// classification: the marker definitions never register themselves.
pub fn get_registration_infos(
    model: &SemanticModel,
    marker: &Arc<TypeSymbol>,
    symbol: &Arc<TypeSymbol>,
    root_node: Option<&DeclarationNode>,
    token: &CancellationToken,
) -> Result<Vec<ServiceRegistrationInfo>, Cancelled> {
    let mut visited = HashSet::new();
    collect(model, marker, symbol, root_node, &mut visited, token)
}

fn collect(
    model: &SemanticModel,
    marker: &Arc<TypeSymbol>,
    symbol: &Arc<TypeSymbol>,
    root_node: Option<&DeclarationNode>,
    visited: &mut HashSet<String>,
    token: &CancellationToken,
) -> Result<Vec<ServiceRegistrationInfo>, Cancelled> {
    let is_root = root_node.is_some();

    // Breaks infinite attribute-of-attribute recursion at the foundational
    // types and on self-referential custom attributes.
    if is_root && symbol.has_implicit_conversion(marker) {
        return Ok(Vec::new());
    }
    if !visited.insert(symbol.metadata_name()) {
        return Ok(Vec::new());
    }

    let mut registration_attributes: Vec<AttributeData> = symbol
        .attributes
        .iter()
        .filter(|a| is_registration_marker(&a.attribute_class, marker))
        .cloned()
        .collect();

    for interface in symbol.all_interfaces() {
        token.checkpoint()?;
        registration_attributes.extend(
            interface
                .attributes
                .iter()
                .filter(|a| is_registration_marker(&a.attribute_class, marker))
                .cloned(),
        );
    }

    let mut results = Vec::new();

    for attribute in &registration_attributes {
        token.checkpoint()?;

        let children = collect(
            model,
            marker,
            &attribute.attribute_class,
            None,
            visited,
            token,
        )?;

        let args = read_attribute_arguments(model, attribute);

        let mut services_to_register = args.services_to_register.clone();
        if is_root && args.implements_itypename {
            check_implements_itypename(symbol, &mut services_to_register);
        }

        if children.is_empty() {
            let mut info = ServiceRegistrationInfo::new();
            assign_values(&mut info, root_node, symbol, &args, &services_to_register);
            results.push(info);
        } else {
            for mut child in children {
                assign_values(&mut child, root_node, symbol, &args, &services_to_register);
                results.push(child);
            }
        }
    }

    visited.remove(&symbol.metadata_name());

    if is_root && !results.is_empty() {
        debug!(
            symbol = %symbol.metadata_name(),
            records = results.len(),
            "resolved registration records"
        );
    }

    Ok(results)
}

/// Copies one resolution level's values into a record. Values closest to
/// the concrete type declaration win: this runs as the recursion unwinds,
/// so outer levels overwrite attribute-class-level defaults, and a level
/// without a value leaves the deeper one in place.
fn assign_values(
    info: &mut ServiceRegistrationInfo,
    root_node: Option<&DeclarationNode>,
    symbol: &Arc<TypeSymbol>,
    args: &AttributeArguments,
    services_to_register: &Option<Vec<Arc<TypeSymbol>>>,
) {
    if let Some(node) = root_node {
        info.implementation_node = Some(node.clone());
        info.implementation_symbol = Some(symbol.clone());
    }

    if let Some(scope) = args.scope {
        info.scope = Some(scope);
    }

    if let Some(services) = services_to_register {
        for service in services {
            info.add_registered_service(service.clone());
        }
    }

    if let Some(factory_type) = &args.factory_type {
        info.factory_type = Some(factory_type.clone());
    }

    if let Some(factory_method_name) = &args.factory_method_name {
        info.factory_method_name = Some(factory_method_name.clone());
    }

    if let Some(service_key) = &args.service_key {
        info.service_key = Some(service_key.clone());
    }
}

/// The ITypeName convention: a class named `Foo` implementing `IFoo`
/// registers as `IFoo` without an explicit `As` argument. Generic matches
/// over type parameters only are normalized to their open-generic form.
fn check_implements_itypename(
    symbol: &Arc<TypeSymbol>,
    services_to_register: &mut Option<Vec<Arc<TypeSymbol>>>,
) {
    let target_interface_name = format!("I{}", symbol.name);

    let matches: Vec<Arc<TypeSymbol>> = symbol
        .all_interfaces()
        .into_iter()
        .filter(|i| i.name == target_interface_name)
        .map(|i| normalize_open_generic(&i))
        .collect();

    if matches.is_empty() {
        return;
    }

    let services = services_to_register.get_or_insert_with(Vec::new);
    for interface in matches {
        if !services.contains(&interface) {
            services.push(interface);
        }
    }
}

fn normalize_open_generic(interface: &Arc<TypeSymbol>) -> Arc<TypeSymbol> {
    let only_type_parameters = interface.is_generic()
        && !interface.is_unbound_generic
        && !interface.type_arguments.is_empty()
        && interface
            .type_arguments
            .iter()
            .all(|a| a.kind == TypeKind::TypeParameter);

    if only_type_parameters {
        interface.construct_unbound_generic()
    } else {
        interface.clone()
    }
}

fn read_attribute_arguments(model: &SemanticModel, attribute: &AttributeData) -> AttributeArguments {
    let mut args = AttributeArguments {
        implements_itypename: true,
        ..AttributeArguments::default()
    };

    for ctor_arg in &attribute.constructor_arguments {
        if let TypedConstant::Enum {
            enum_type,
            member,
            ordinal,
        } = ctor_arg
        {
            if enum_type.name == "RegistrationScope" {
                args.scope = RegistrationScope::from_name(member)
                    .or_else(|| RegistrationScope::from_ordinal(*ordinal));
            }
        }
    }

    for (name, value) in &attribute.named_arguments {
        match (name.as_str(), value) {
            ("Scope" | "RegistrationScope", TypedConstant::Enum { member, ordinal, .. }) => {
                args.scope = RegistrationScope::from_name(member)
                    .or_else(|| RegistrationScope::from_ordinal(*ordinal));
            }
            ("As" | "RegisterAs", TypedConstant::Type(service)) => {
                args.services_to_register = Some(vec![service.clone()]);
            }
            ("ImplementsITypeName", constant) => {
                if let Some(value) = constant.as_bool() {
                    args.implements_itypename = value;
                }
            }
            ("Factory", TypedConstant::Type(factory)) => {
                args.factory_type = Some(factory.clone());
            }
            ("FactoryMethodName", constant) => {
                if let Some(name) = constant.as_string() {
                    if !name.trim().is_empty() {
                        args.factory_method_name = Some(name.to_string());
                    }
                }
            }
            ("Key", constant) => {
                let expression = attribute
                    .application_syntax
                    .as_ref()
                    .and_then(|s| s.named_argument_expression("Key"));
                args.service_key = render_key_expression(constant, expression, model);
            }
            _ => {}
        }
    }

    args
}
