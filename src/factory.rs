//! Resolution of factory-backed registrations to a unique static method.

use crate::diagnostics::{
    Diagnostic, Location, FACTORY_METHOD_NAME_IS_INVALID, FACTORY_METHOD_NOT_FOUND,
    FACTORY_TYPE_NOT_DEFINED,
};
use crate::registration::ServiceRegistrationInfo;
use crate::symbols::{Accessibility, MethodKind, MethodSymbol, TypeSymbol};

/// Outcome of resolving a record's factory binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryResolution {
    /// No factory configured; the registration emits without one.
    NoFactory,
    /// A unique factory method was found and written into the record.
    Factory {
        /// Whether the factory's declared return type converts to the
        /// registered implementation type. When it does not, the emitted
        /// call omits the implementation generic argument.
        converts_to_implementation: bool,
    },
    /// The factory configuration is inconsistent; a diagnostic was recorded
    /// and the registration statement is skipped.
    Invalid,
}

/// Finds the single static factory method matching the required signature
/// shape.
///
/// Candidates are static, public or internal, non-void, ordinary methods.
/// Non-keyed factories take exactly one `System.IServiceProvider`
/// parameter; keyed factories take two, the second being the boxed key
/// (`object`/`object?`). The uniqueness policy is strict: zero candidates
/// and more than one candidate both resolve to `None`; an ambiguous match
/// is detected explicitly and never collapses to an arbitrary pick.
pub fn resolve_factory_method<'a>(
    factory_type: &'a TypeSymbol,
    is_keyed: bool,
    expected_method_name: Option<&'a str>,
) -> Option<&'a MethodSymbol> {
    let mut resolved = None;

    for member in factory_type.get_members(expected_method_name) {
        if !is_factory_candidate(member, is_keyed) {
            continue;
        }
        if resolved.is_some() {
            // More than one matching candidate: fail rather than pick one.
            return None;
        }
        resolved = Some(member);
    }

    resolved
}

fn is_factory_candidate(member: &MethodSymbol, is_keyed: bool) -> bool {
    if !member.is_static {
        return false;
    }
    if !matches!(
        member.accessibility,
        Accessibility::Public | Accessibility::Internal
    ) {
        return false;
    }
    if member.returns_void() {
        return false;
    }
    if member.method_kind != MethodKind::Ordinary {
        return false;
    }

    let parameters = &member.parameters;
    if is_keyed {
        parameters.len() == 2
            && is_service_provider(&parameters[0].param_type)
            && is_boxed_key(&parameters[1].param_type)
    } else {
        parameters.len() == 1 && is_service_provider(&parameters[0].param_type)
    }
}

fn is_service_provider(ty: &TypeSymbol) -> bool {
    ty.metadata_name() == "System.IServiceProvider"
}

fn is_boxed_key(ty: &TypeSymbol) -> bool {
    ty.metadata_name() == "System.Object"
}

/// Whether the factory's declared return type implicitly converts to the
/// implementation type being registered.
pub fn return_type_converts(method: &MethodSymbol, implementation: &TypeSymbol) -> bool {
    method
        .return_type
        .as_ref()
        .map(|ret| ret.has_implicit_conversion(implementation))
        .unwrap_or(false)
}

/// Resolves the record's factory binding in place.
///
/// On success `factory_information` is set to the emittable
/// `"global::Ty.Method"` reference. Inconsistent configurations record a
/// diagnostic at the implementing type's declaration and yield
/// [`FactoryResolution::Invalid`]; the surrounding run continues with the
/// remaining records.
pub fn resolve_into(info: &mut ServiceRegistrationInfo) -> FactoryResolution {
    let location = info
        .implementation_node
        .as_ref()
        .map(|n| n.location())
        .unwrap_or(Location::None);

    let Some(factory_type) = info.factory_type.clone() else {
        if let Some(method_name) = &info.factory_method_name {
            // A method name without a factory type cannot be resolved.
            let diagnostic =
                Diagnostic::create(FACTORY_TYPE_NOT_DEFINED, location, &[method_name]);
            info.diagnostics.push(diagnostic);
            return FactoryResolution::Invalid;
        }
        return FactoryResolution::NoFactory;
    };

    let is_keyed = info.service_key.is_some();
    let factory_type_name = factory_type.fully_qualified_name();

    let Some(method) =
        resolve_factory_method(&factory_type, is_keyed, info.factory_method_name.as_deref())
    else {
        let diagnostic = match &info.factory_method_name {
            None => Diagnostic::create(FACTORY_METHOD_NOT_FOUND, location, &[&factory_type_name]),
            Some(name) => Diagnostic::create(
                FACTORY_METHOD_NAME_IS_INVALID,
                location,
                &[name, &factory_type_name],
            ),
        };
        info.diagnostics.push(diagnostic);
        return FactoryResolution::Invalid;
    };

    let converts_to_implementation = info
        .implementation_symbol
        .as_ref()
        .map(|implementation| return_type_converts(method, implementation))
        .unwrap_or(false);

    info.factory_information = Some(format!("{}.{}", factory_type_name, method.name));

    FactoryResolution::Factory {
        converts_to_implementation,
    }
}
