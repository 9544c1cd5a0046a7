//! Unit tests for factory-method resolution and its strict uniqueness
//! policy.

mod common;

use std::sync::Arc;

use common::class_node;
use regchain::factory::{resolve_factory_method, resolve_into, return_type_converts};
use regchain::symbols::ParameterSymbol;
use regchain::{
    Accessibility, FactoryResolution, MethodKind, MethodSymbol, RegistrationScope,
    ServiceRegistrationInfo, TypeSymbol,
};

fn provider_param() -> ParameterSymbol {
    ParameterSymbol::new("provider", TypeSymbol::service_provider())
}

fn key_param(nullable: bool) -> ParameterSymbol {
    ParameterSymbol::new("key", TypeSymbol::object(nullable))
}

fn worker() -> Arc<TypeSymbol> {
    TypeSymbol::class("Worker").namespace("Demo.App").build()
}

fn create_method(name: &str) -> MethodSymbol {
    MethodSymbol::new(name, Some(worker()))
        .with_static(true)
        .with_parameters(vec![provider_param()])
}

#[test]
fn unique_candidate_resolves() {
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(create_method("Create"))
        .build();

    let resolved = resolve_factory_method(&factory, false, None);
    assert_eq!(resolved.map(|m| m.name.as_str()), Some("Create"));
}

#[test]
fn no_candidate_resolves_to_none() {
    let factory = TypeSymbol::class("WorkerFactory").namespace("Demo.App").build();
    assert!(resolve_factory_method(&factory, false, None).is_none());
}

#[test]
fn ambiguous_candidates_resolve_to_none() {
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(create_method("Create"))
        .method(create_method("CreateOther"))
        .build();

    assert!(resolve_factory_method(&factory, false, None).is_none());
}

#[test]
fn explicit_name_disambiguates() {
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(create_method("Create"))
        .method(create_method("CreateOther"))
        .build();

    let resolved = resolve_factory_method(&factory, false, Some("CreateOther"));
    assert_eq!(resolved.map(|m| m.name.as_str()), Some("CreateOther"));
}

#[test]
fn keyed_resolution_requires_the_boxed_key_parameter() {
    let keyed_method = MethodSymbol::new("Create", Some(worker()))
        .with_static(true)
        .with_parameters(vec![provider_param(), key_param(true)]);
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(keyed_method)
        .build();

    assert!(resolve_factory_method(&factory, true, None).is_some());
    // The same method is not a valid non-keyed factory.
    assert!(resolve_factory_method(&factory, false, None).is_none());
}

#[test]
fn keyed_resolution_accepts_non_nullable_object() {
    let keyed_method = MethodSymbol::new("Create", Some(worker()))
        .with_static(true)
        .with_parameters(vec![provider_param(), key_param(false)]);
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(keyed_method)
        .build();

    assert!(resolve_factory_method(&factory, true, None).is_some());
}

#[test]
fn invalid_signature_shapes_are_filtered() {
    let instance = MethodSymbol::new("Instance", Some(worker()))
        .with_parameters(vec![provider_param()]);
    let private = create_method("Hidden").with_accessibility(Accessibility::Private);
    let void_method = MethodSymbol::new("Void", None)
        .with_static(true)
        .with_parameters(vec![provider_param()]);
    let constructor = create_method("Ctor").with_kind(MethodKind::Constructor);
    let parameterless = MethodSymbol::new("NoParams", Some(worker())).with_static(true);

    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(instance)
        .method(private)
        .method(void_method)
        .method(constructor)
        .method(parameterless)
        .build();

    assert!(resolve_factory_method(&factory, false, None).is_none());
}

#[test]
fn internal_candidates_are_accepted() {
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(create_method("Create").with_accessibility(Accessibility::Internal))
        .build();

    assert!(resolve_factory_method(&factory, false, None).is_some());
}

#[test]
fn return_type_conversion_follows_the_type_system() {
    let contract = TypeSymbol::interface("IWorker").namespace("Demo.App").build();
    let implementation = TypeSymbol::class("Worker")
        .namespace("Demo.App")
        .implements(contract.clone())
        .build();

    let returns_impl = MethodSymbol::new("Create", Some(implementation.clone()));
    let returns_contract = MethodSymbol::new("Create", Some(contract.clone()));

    assert!(return_type_converts(&returns_impl, &implementation));
    // The contract does not convert back down to the implementation.
    assert!(!return_type_converts(&returns_contract, &implementation));
}

fn record_with_factory(
    factory_type: Option<Arc<TypeSymbol>>,
    method_name: Option<&str>,
) -> ServiceRegistrationInfo {
    let mut record = ServiceRegistrationInfo::new();
    record.scope = Some(RegistrationScope::Transient);
    record.implementation_symbol = Some(worker());
    record.implementation_node = Some(class_node("Worker"));
    record.factory_type = factory_type;
    record.factory_method_name = method_name.map(str::to_string);
    record
}

#[test]
fn record_without_factory_resolves_to_no_factory() {
    let mut record = record_with_factory(None, None);
    assert_eq!(resolve_into(&mut record), FactoryResolution::NoFactory);
    assert!(record.diagnostics.is_empty());
}

#[test]
fn method_name_without_factory_type_reports_rc0002() {
    let mut record = record_with_factory(None, Some("Create"));
    assert_eq!(resolve_into(&mut record), FactoryResolution::Invalid);
    assert_eq!(record.diagnostics.len(), 1);
    assert_eq!(record.diagnostics[0].id(), "RC0002");
    assert!(record.diagnostics[0].message.contains("Create"));
}

#[test]
fn unresolvable_factory_reports_rc0003() {
    let empty_factory = TypeSymbol::class("WorkerFactory").namespace("Demo.App").build();
    let mut record = record_with_factory(Some(empty_factory), None);
    assert_eq!(resolve_into(&mut record), FactoryResolution::Invalid);
    assert_eq!(record.diagnostics[0].id(), "RC0003");
    assert!(record.diagnostics[0].message.contains("global::Demo.App.WorkerFactory"));
}

#[test]
fn invalid_explicit_name_reports_rc0004() {
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(create_method("Create"))
        .build();
    let mut record = record_with_factory(Some(factory), Some("Missing"));
    assert_eq!(resolve_into(&mut record), FactoryResolution::Invalid);
    assert_eq!(record.diagnostics[0].id(), "RC0004");
}

#[test]
fn successful_resolution_writes_the_factory_reference() {
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(create_method("Create"))
        .build();
    let mut record = record_with_factory(Some(factory), None);

    let resolution = resolve_into(&mut record);
    assert_eq!(
        resolution,
        FactoryResolution::Factory {
            converts_to_implementation: true
        }
    );
    assert_eq!(
        record.factory_information.as_deref(),
        Some("global::Demo.App.WorkerFactory.Create")
    );
}

#[test]
fn non_converting_return_type_is_flagged() {
    let contract = TypeSymbol::interface("IWorker").namespace("Demo.App").build();
    let returns_contract = MethodSymbol::new("Create", Some(contract))
        .with_static(true)
        .with_parameters(vec![provider_param()]);
    let factory = TypeSymbol::class("WorkerFactory")
        .namespace("Demo.App")
        .method(returns_contract)
        .build();
    let mut record = record_with_factory(Some(factory), None);

    assert_eq!(
        resolve_into(&mut record),
        FactoryResolution::Factory {
            converts_to_implementation: false
        }
    );
}
