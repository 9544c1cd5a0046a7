//! Emission of the per-assembly registrator units.
//!
//! Two phases write into an [`OutputSink`]. The stub phase depends only on
//! configuration (assembly name, root namespace, configured extensions) and
//! emits the partial `DependencyRegistrator` skeleton plus the
//! `IServiceCollectionExtensions` convenience unit. The implementation phase
//! additionally consumes the referenced-registrator scan and the resolved
//! registration records and fills in the generated partial method bodies.

use std::sync::Arc;

use tracing::debug;

use crate::cancellation::{Cancelled, CancellationToken};
use crate::codebuild::{AccessModifier, ClassInfo, CompilationInfo, MethodInfo};
use crate::diagnostics::{Diagnostic, Location, MISSING_ASSEMBLY_NAME};
use crate::factory::{self, FactoryResolution};
use crate::registration::ServiceRegistrationInfo;
use crate::symbols::TypeSymbol;

/// Class name of the generated registrator, shared between emission and the
/// referenced-assembly scan.
pub const DEPENDENCY_REGISTRATOR_CLASS_NAME: &str = "DependencyRegistrator";

const ROOT_NAMESPACE_COMPILATION_NAME: &str = "DependencyRegistrator_RootNamespace";
const ASSEMBLY_NAME_NAMESPACE_COMPILATION_NAME: &str = "DependencyRegistrator_AssemblyNameNamespace";
const REGISTRATOR_XML_DOC: &str = "Registers all dependencies and services of this assembly.";
const REGISTRATION_USING: &str = "Regchain.Registration";
const SERVICE_COLLECTION_USING: &str = "Microsoft.Extensions.DependencyInjection";

/// One generated compilation unit, addressed by its hint name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub hint_name: String,
    pub text: String,
}

/// Collects generated sources and diagnostics over a generator run.
#[derive(Debug, Default)]
pub struct OutputSink {
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, unit: &CompilationInfo) {
        self.sources.push(GeneratedSource {
            hint_name: unit.hint_name.clone(),
            text: unit.render(),
        });
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Where the main registrator class lands, derived from root namespace and
/// assembly name.
struct MainCompilationTarget {
    compilation_name: &'static str,
    namespace: String,
    has_root_namespace: bool,
    root_namespace: Option<String>,
    assembly_name_namespace: String,
}

/// Converts an assembly name into a valid namespace: every character that
/// cannot appear in an identifier becomes `_`, and segments starting with a
/// digit get a leading `_`.
pub fn to_valid_namespace(assembly_name: &str) -> String {
    let segments: Vec<String> = assembly_name
        .split('.')
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            for (index, ch) in segment.chars().enumerate() {
                if ch.is_alphanumeric() || ch == '_' {
                    if index == 0 && ch.is_ascii_digit() {
                        out.push('_');
                    }
                    out.push(ch);
                } else {
                    out.push('_');
                }
            }
            if out.is_empty() {
                out.push('_');
            }
            out
        })
        .collect();

    segments.join(".")
}

fn check_preconditions(
    sink: &mut OutputSink,
    root_namespace: Option<&str>,
    assembly_name: Option<&str>,
) -> Option<MainCompilationTarget> {
    let assembly_name = match assembly_name {
        Some(name) if !name.is_empty() => name,
        _ => {
            sink.report(Diagnostic::create(
                MISSING_ASSEMBLY_NAME,
                Location::None,
                &[],
            ));
            return None;
        }
    };

    let has_root_namespace = root_namespace
        .map(|ns| !ns.trim().is_empty() && ns != assembly_name)
        .unwrap_or(false);

    let assembly_name_namespace = to_valid_namespace(assembly_name);

    let (compilation_name, namespace) = if has_root_namespace {
        (
            ROOT_NAMESPACE_COMPILATION_NAME,
            root_namespace.map(str::to_string).unwrap_or_default(),
        )
    } else {
        (
            ASSEMBLY_NAME_NAMESPACE_COMPILATION_NAME,
            assembly_name_namespace.clone(),
        )
    };

    Some(MainCompilationTarget {
        compilation_name,
        namespace,
        has_root_namespace,
        root_namespace: root_namespace.map(str::to_string),
        assembly_name_namespace,
    })
}

/// Emits the configuration-only units: the registrator stub (with its
/// lifecycle hooks and per-extension hooks) and the
/// `IServiceCollectionExtensions` unit. Skips everything and reports the
/// missing-assembly-name diagnostic when no assembly name is configured.
pub fn output_stubs(
    sink: &mut OutputSink,
    root_namespace: Option<&str>,
    assembly_name: Option<&str>,
    extensions: &[String],
    token: &CancellationToken,
) -> Result<(), Cancelled> {
    token.checkpoint()?;

    let Some(target) = check_preconditions(sink, root_namespace, assembly_name) else {
        return Ok(());
    };

    output_registrator_stub(sink, &target, extensions);
    output_service_collection_extension_methods(sink, &target.namespace);

    Ok(())
}

fn output_registrator_stub(
    sink: &mut OutputSink,
    target: &MainCompilationTarget,
    extensions: &[String],
) {
    if target.has_root_namespace {
        // Helper subtype in the assembly-name namespace so the registrator
        // stays discoverable by name in compiled assemblies.
        let base_class = format!(
            "{}.{}",
            target.root_namespace.as_deref().unwrap_or_default(),
            DEPENDENCY_REGISTRATOR_CLASS_NAME
        );
        let mut helper = CompilationInfo::new(
            ASSEMBLY_NAME_NAMESPACE_COMPILATION_NAME,
            target.assembly_name_namespace.clone(),
        );
        helper.add_class(
            ClassInfo::new(DEPENDENCY_REGISTRATOR_CLASS_NAME, AccessModifier::Public)
                .sealed()
                .with_base(base_class.clone())
                .with_xml_doc(format!(
                    "{}\nThis class mainly exists for performance and simplicity reasons during code compilation.\nAlthough there is technically no reason to not manually interact with this class, you should probably prefer to use the identical class in your root namespace (<see cref=\"{}\"/>).",
                    REGISTRATOR_XML_DOC, base_class
                )),
        );
        sink.add_source(&helper);
    }

    let has_extensions = !extensions.is_empty();

    let mut class = ClassInfo::new(DEPENDENCY_REGISTRATOR_CLASS_NAME, AccessModifier::Public)
        .partial()
        .with_base("BaseDependencyRegistrator")
        .with_xml_doc(REGISTRATOR_XML_DOC);

    class = class.with_method(lifecycle_override(
        "PerformInitialization",
        "DependencyCollection",
        "collection",
        "doBeforeInitialization",
        "initializeDependenciesGenerated",
        has_extensions.then_some("initializeDependenciesOfExtensions"),
        "doAfterInitialization",
    ));
    class = class
        .with_method(hook("doBeforeInitialization", "DependencyCollection", "collection"))
        .with_method(hook(
            "initializeDependenciesGenerated",
            "DependencyCollection",
            "collection",
        ))
        .with_method(hook("doAfterInitialization", "DependencyCollection", "collection"));
    if has_extensions {
        class = output_extension_hooks(
            class,
            "initialize",
            "Dependencies",
            "DependencyCollection",
            "collection",
            extensions,
        );
    }

    class = class.with_method(lifecycle_override(
        "PerformServiceRegistration",
        "IServiceCollection",
        "services",
        "doBeforeRegistration",
        "registerServicesGenerated",
        has_extensions.then_some("registerServicesOfExtensions"),
        "doAfterRegistration",
    ));
    class = class
        .with_method(hook("doBeforeRegistration", "IServiceCollection", "services"))
        .with_method(hook("registerServicesGenerated", "IServiceCollection", "services"))
        .with_method(hook("doAfterRegistration", "IServiceCollection", "services"));
    if has_extensions {
        class = output_extension_hooks(
            class,
            "register",
            "Services",
            "IServiceCollection",
            "services",
            extensions,
        );
    }

    let mut unit = CompilationInfo::new(target.compilation_name, target.namespace.clone());
    unit.add_using(REGISTRATION_USING);
    unit.add_using(SERVICE_COLLECTION_USING);
    unit.add_class(class);
    sink.add_source(&unit);
}

fn lifecycle_override(
    name: &str,
    param_type: &str,
    param_name: &str,
    before: &str,
    generated: &str,
    of_extensions: Option<&str>,
    after: &str,
) -> MethodInfo {
    let mut body = vec![
        format!("{}({});", before, param_name),
        String::new(),
        format!("{}({});", generated, param_name),
    ];
    if let Some(of_extensions) = of_extensions {
        body.push(String::new());
        body.push(format!("{}({});", of_extensions, param_name));
    }
    body.push(String::new());
    body.push(format!("{}({});", after, param_name));

    MethodInfo::new(Some(AccessModifier::Protected), "void", name)
        .with_override()
        .with_inherit_doc()
        .with_parameter(param_type, param_name)
        .with_body(body)
}

fn hook(name: &str, param_type: &str, param_name: &str) -> MethodInfo {
    MethodInfo::partial_declaration(name).with_parameter(param_type, param_name)
}

fn output_extension_hooks(
    mut class: ClassInfo,
    prefix: &str,
    kind: &str,
    param_type: &str,
    param_name: &str,
    extensions: &[String],
) -> ClassInfo {
    let mut body = Vec::new();
    for (index, extension) in extensions.iter().enumerate() {
        if index > 0 {
            body.push(String::new());
        }
        body.push(format!("{}Extension_{}({});", prefix, extension, param_name));
    }

    class = class.with_method(
        MethodInfo::new(Some(AccessModifier::Private), "void", format!("{}{}OfExtensions", prefix, kind))
            .with_parameter(param_type, param_name)
            .with_body(body),
    );

    for extension in extensions {
        class = class.with_method(hook(
            &format!("{}Extension_{}", prefix, extension),
            param_type,
            param_name,
        ));
    }

    class
}

fn output_service_collection_extension_methods(sink: &mut OutputSink, main_namespace: &str) {
    const EXTENSIONS_CLASS_NAME: &str = "IServiceCollectionExtensions";
    const SERVICE_COLLECTION_TYPE: &str = "IServiceCollection";

    let registrator_name = format!("{}.{}", main_namespace, DEPENDENCY_REGISTRATOR_CLASS_NAME);
    let builder_with_generic = format!("DependencyRegistratorBuilder<{}>", registrator_name);
    let builder_for_xml_doc = "DependencyRegistratorBuilder{TDependencyRegistrator}";

    let initialize = MethodInfo::new(
        Some(AccessModifier::Public),
        builder_with_generic,
        "InitializeDependencies",
    )
    .with_extension()
    .with_xml_doc(format!(
        "This method extends <see cref=\"{}\"/> with a mechanism to register dependencies and services for the whole application.\nCalling this method creates a <see cref=\"{}\"/> and initializes the dependency chain.",
        SERVICE_COLLECTION_TYPE, builder_for_xml_doc
    ))
    .with_xml_doc_line(format!(
        "<param name=\"services\">The <see cref=\"{}\"/> all services are registered on.</param>",
        SERVICE_COLLECTION_TYPE
    ))
    .with_xml_doc_line(format!(
        "<returns>A <see cref=\"{}\"/> that is used to build and execute the chain of <see cref=\"IDependencyRegistrator\"/></returns>",
        builder_for_xml_doc
    ))
    .with_parameter(SERVICE_COLLECTION_TYPE, "services")
    .with_body(vec![format!(
        "return Regchain.IServiceCollectionExtensions.InitializeDependencies<{}>(services);",
        registrator_name
    )]);

    let register = MethodInfo::new(Some(AccessModifier::Public), "void", "RegisterServices")
        .with_extension()
        .with_xml_doc(format!(
            "This method extends <see cref=\"{}\"/> with a mechanism to register dependencies and services for the whole application.\nCalling this method creates a <see cref=\"{}\"/>, initializes the dependency chain and executes the registration of all services.\nFor more control over the details of this process use <see cref=\"InitializeDependencies\"/> instead.",
            SERVICE_COLLECTION_TYPE, builder_for_xml_doc
        ))
        .with_xml_doc_line(format!(
            "<param name=\"services\">The <see cref=\"{}\"/> all services are registered on.</param>",
            SERVICE_COLLECTION_TYPE
        ))
        .with_parameter(SERVICE_COLLECTION_TYPE, "services")
        .with_body(vec![format!(
            "Regchain.IServiceCollectionExtensions.InitializeDependencies<{}>(services).RegisterServices();",
            registrator_name
        )]);

    let mut unit = CompilationInfo::new(EXTENSIONS_CLASS_NAME, main_namespace.to_string());
    unit.add_using(SERVICE_COLLECTION_USING);
    unit.add_using(REGISTRATION_USING);
    unit.add_class(
        ClassInfo::new(EXTENSIONS_CLASS_NAME, AccessModifier::Public)
            .static_class()
            .with_xml_doc(format!(
                "This class contains extension methods for <see cref=\"{}\"/>",
                SERVICE_COLLECTION_TYPE
            ))
            .with_method(initialize)
            .with_method(register),
    );
    sink.add_source(&unit);
}

/// Emits the implementation unit: the generated partial method bodies for
/// dependency initialization (one `AddDependency` per upstream registrator,
/// scan order) and service registration (one statement per validated record
/// per registered service, discovery order).
pub fn output_implementations(
    sink: &mut OutputSink,
    root_namespace: Option<&str>,
    assembly_name: Option<&str>,
    dependency_registrators: &[Arc<TypeSymbol>],
    services_to_register: &[Vec<ServiceRegistrationInfo>],
    token: &CancellationToken,
) -> Result<(), Cancelled> {
    token.checkpoint()?;

    let Some(target) = check_preconditions(sink, root_namespace, assembly_name) else {
        return Ok(());
    };

    let mut initialize_body =
        vec!["/* initialize dependencies - generated from assembly dependencies */".to_string()];
    for registrator in dependency_registrators {
        token.checkpoint()?;
        initialize_body.push(format!(
            "collection.AddDependency<{}>();",
            registrator.fully_qualified_name()
        ));
    }

    let mut register_body =
        vec!["/* register services - generated from the current project */".to_string()];
    add_services_to_body(sink, &mut register_body, services_to_register, token)?;

    let mut unit = CompilationInfo::new(
        format!("{}.impl", target.compilation_name),
        target.namespace.clone(),
    );
    unit.add_generated_code_attributes = false;
    unit.add_using(REGISTRATION_USING);
    unit.add_using(SERVICE_COLLECTION_USING);
    unit.add_class(
        ClassInfo::new(DEPENDENCY_REGISTRATOR_CLASS_NAME, AccessModifier::Public)
            .partial()
            .with_method(MethodInfo::partial_implementation(
                "initializeDependenciesGenerated",
                initialize_body,
            ).with_parameter("DependencyCollection", "collection"))
            .with_method(MethodInfo::partial_implementation(
                "registerServicesGenerated",
                register_body,
            ).with_parameter(
                "Microsoft.Extensions.DependencyInjection.IServiceCollection",
                "services",
            )),
    );
    sink.add_source(&unit);

    debug!(
        dependencies = dependency_registrators.len(),
        namespace = %target.namespace,
        "emitted registrator implementation"
    );

    Ok(())
}

fn add_services_to_body(
    sink: &mut OutputSink,
    body: &mut Vec<String>,
    services_to_register: &[Vec<ServiceRegistrationInfo>],
    token: &CancellationToken,
) -> Result<(), Cancelled> {
    for records in services_to_register {
        for record in records {
            token.checkpoint()?;

            // Diagnostics accumulated during extraction surface even when
            // the record itself is dropped.
            for diagnostic in &record.diagnostics {
                sink.report(diagnostic.clone());
            }

            if !record.is_valid() {
                continue;
            }

            let mut record = record.clone();
            let already_reported = record.diagnostics.len();
            let resolution = factory::resolve_into(&mut record);

            let factory = match resolution {
                FactoryResolution::Invalid => {
                    for diagnostic in &record.diagnostics[already_reported..] {
                        sink.report(diagnostic.clone());
                    }
                    continue;
                }
                FactoryResolution::NoFactory => None,
                FactoryResolution::Factory {
                    converts_to_implementation,
                } => record
                    .factory_information
                    .clone()
                    .map(|reference| (reference, converts_to_implementation)),
            };

            let implementation = record
                .implementation_symbol
                .as_ref()
                .cloned()
                .unwrap_or_else(|| TypeSymbol::object(false));

            if record.has_registered_services() {
                for service in record.registered_services() {
                    body.push(service_registration_statement(
                        record.scope.map(|s| s.as_str()).unwrap_or_default(),
                        record.service_key.as_deref(),
                        factory.as_ref(),
                        Some(service),
                        &implementation,
                    ));
                }
            } else {
                body.push(service_registration_statement(
                    record.scope.map(|s| s.as_str()).unwrap_or_default(),
                    record.service_key.as_deref(),
                    factory.as_ref(),
                    None,
                    &implementation,
                ));
            }
        }
    }

    Ok(())
}

/// Renders one registration statement.
///
/// Open-generic services or generic implementations use the `typeof(...)`
/// argument overloads; everything else uses the generic-method form. A
/// factory whose return type does not convert to the implementation omits
/// the implementation generic argument so the call still type-checks against
/// the factory's declared return.
fn service_registration_statement(
    scope: &str,
    service_key: Option<&str>,
    factory: Option<&(String, bool)>,
    registered_service: Option<&Arc<TypeSymbol>>,
    implementation: &Arc<TypeSymbol>,
) -> String {
    let keyed_prefix = if service_key.is_some() { "Keyed" } else { "" };
    let factory_reference = factory.map(|(reference, _)| reference.as_str());
    let factory_converts = factory.map(|(_, converts)| *converts).unwrap_or(true);

    let service_is_open_generic = registered_service
        .map(|s| s.is_unbound_generic)
        .unwrap_or(false);
    let implementation_is_generic = implementation.is_generic();

    let implementation_display = if implementation_is_generic {
        implementation.construct_unbound_generic().fully_qualified_name()
    } else {
        implementation.fully_qualified_name()
    };

    if service_is_open_generic || implementation_is_generic {
        let service_argument = registered_service
            .map(|service| {
                let display = if service.is_unbound_generic {
                    service.construct_unbound_generic().fully_qualified_name()
                } else {
                    service.fully_qualified_name()
                };
                format!("typeof({}), ", display)
            })
            .unwrap_or_default();

        let mut trailing = String::new();
        if let Some(key) = service_key {
            trailing.push_str(", ");
            trailing.push_str(key);
        }
        if let Some(reference) = factory_reference {
            trailing.push_str(", ");
            trailing.push_str(reference);
        }

        return format!(
            "services.Add{}{}({}typeof({}){});",
            keyed_prefix, scope, service_argument, implementation_display, trailing
        );
    }

    let service_display = registered_service.map(|s| s.fully_qualified_name());

    let generics = match (&service_display, factory_converts) {
        // The implementation generic is dropped when the factory's return
        // type cannot stand in for it.
        (Some(service), false) => format!("<{}>", service),
        (Some(service), true) => format!("<{}, {}>", service, implementation_display),
        (None, false) => String::new(),
        (None, true) => format!("<{}>", implementation_display),
    };

    let mut arguments = String::new();
    if let Some(key) = service_key {
        arguments.push_str(key);
        if factory_reference.is_some() {
            arguments.push_str(", ");
        }
    }
    if let Some(reference) = factory_reference {
        arguments.push_str(reference);
    }

    format!(
        "services.Add{}{}{}({});",
        keyed_prefix, scope, generics, arguments
    )
}
