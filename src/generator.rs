//! The generator entry point.
//!
//! A [`CompilationSnapshot`] is the host-provided view of one compilation:
//! assembly identity, analyzer options, referenced assemblies, candidate
//! type declarations and the semantic model to resolve them against.
//! [`DependencyInjectionGenerator::run`] is a pure function from a snapshot
//! to the generated sources and diagnostics; identical snapshots produce
//! identical output.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::cancellation::{Cancelled, CancellationToken};
use crate::diagnostics::Diagnostic;
use crate::emitter::{
    self, to_valid_namespace, GeneratedSource, OutputSink, DEPENDENCY_REGISTRATOR_CLASS_NAME,
};
use crate::registration::{get_registration_infos, ServiceRegistrationInfo};
use crate::semantics::SemanticModel;
use crate::symbols::TypeSymbol;
use crate::syntax::{DeclarationKind, DeclarationNode};

const ROOT_NAMESPACE_OPTION: &str = "build_property.RootNamespace";
const EXTENSIONS_OPTION: &str = "build_property.REGCHAIN_Extensions";
const EXTENSIONS_SEPARATORS: [char; 2] = [';', ','];

/// Source language of the compilation being generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    CSharp,
    VisualBasic,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::CSharp => write!(f, "C#"),
            Language::VisualBasic => write!(f, "Visual Basic"),
        }
    }
}

/// Key-value analyzer configuration, as provided by the build host.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    values: HashMap<String, String>,
}

impl AnalyzerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The configured root namespace, when one is set.
    pub fn root_namespace(&self) -> Option<&str> {
        self.get(ROOT_NAMESPACE_OPTION)
    }

    /// The configured extension names, split on `;` and `,` with empty
    /// entries removed.
    pub fn extensions(&self) -> Vec<String> {
        match self.get(EXTENSIONS_OPTION) {
            Some(raw) if !raw.trim().is_empty() => raw
                .split(EXTENSIONS_SEPARATORS)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// One assembly referenced by the compilation.
#[derive(Debug, Clone)]
pub struct ReferencedAssembly {
    pub name: String,
    /// Framework-injected references never carry registrators and are
    /// skipped without inspecting their types.
    pub is_implicitly_declared: bool,
    pub types: Vec<Arc<TypeSymbol>>,
}

impl ReferencedAssembly {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_implicitly_declared: false,
            types: Vec::new(),
        }
    }

    pub fn implicitly_declared(mut self) -> Self {
        self.is_implicitly_declared = true;
        self
    }

    pub fn with_type(mut self, ty: Arc<TypeSymbol>) -> Self {
        self.types.push(ty);
        self
    }
}

/// A type declaration considered for registration extraction.
#[derive(Debug, Clone)]
pub struct CandidateDeclaration {
    pub node: DeclarationNode,
    pub symbol: Arc<TypeSymbol>,
}

/// Which referenced assemblies are scanned for upstream registrators.
///
/// An explicit configuration value rather than global state; the default
/// prefix list excludes the framework assemblies no project puts a
/// registrator in.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    ignored_assembly_prefixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignored_assembly_prefixes: [
                "System",
                "Microsoft",
                "mscorlib",
                "netstandard",
                "NuGet",
                "testhost",
                "WindowsBase",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignored_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ignored_assembly_prefixes.push(prefix.into());
        self
    }

    fn is_ignored(&self, assembly_name: &str) -> bool {
        self.ignored_assembly_prefixes
            .iter()
            .any(|prefix| assembly_name.starts_with(prefix))
    }
}

/// Immutable view of one compilation, assembled by the host.
#[derive(Debug, Clone)]
pub struct CompilationSnapshot {
    /// `None` and empty are both user-input errors reported as a
    /// diagnostic, not a failure of the run.
    pub assembly_name: Option<String>,
    pub options: AnalyzerOptions,
    pub referenced_assemblies: Vec<ReferencedAssembly>,
    pub candidates: Vec<CandidateDeclaration>,
    /// The registration marker interface; its absence means the runtime
    /// library is not referenced at all and generation cannot proceed.
    pub marker: Option<Arc<TypeSymbol>>,
    pub model: SemanticModel,
    pub language: Language,
}

impl CompilationSnapshot {
    pub fn new(assembly_name: impl Into<String>, model: SemanticModel) -> Self {
        Self {
            assembly_name: Some(assembly_name.into()),
            options: AnalyzerOptions::new(),
            referenced_assemblies: Vec::new(),
            candidates: Vec::new(),
            marker: None,
            model,
            language: Language::CSharp,
        }
    }

    pub fn with_marker(mut self, marker: Arc<TypeSymbol>) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_candidate(mut self, node: DeclarationNode, symbol: Arc<TypeSymbol>) -> Self {
        self.candidates.push(CandidateDeclaration { node, symbol });
        self
    }

    pub fn with_referenced_assembly(mut self, assembly: ReferencedAssembly) -> Self {
        self.referenced_assemblies.push(assembly);
        self
    }
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct GeneratorOutput {
    pub sources: Vec<GeneratedSource>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratorOutput {
    /// The generated unit with the given hint name, when present.
    pub fn source(&self, hint_name: &str) -> Option<&GeneratedSource> {
        self.sources.iter().find(|s| s.hint_name == hint_name)
    }
}

/// Fatal conditions that abort a run. User-input problems are reported as
/// diagnostics in [`GeneratorOutput`] instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("the language '{0}' is currently not supported by this generator")]
    UnsupportedLanguage(Language),
    #[error("the registration marker interface could not be resolved; the runtime library is not referenced")]
    MissingCoreReference,
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// The generator itself. Stateless apart from its scan configuration.
#[derive(Debug, Default)]
pub struct DependencyInjectionGenerator {
    scan: ScanConfig,
}

impl DependencyInjectionGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Runs both phases against the snapshot.
    pub fn run(
        &self,
        snapshot: &CompilationSnapshot,
        token: &CancellationToken,
    ) -> Result<GeneratorOutput, GeneratorError> {
        if snapshot.language != Language::CSharp {
            return Err(GeneratorError::UnsupportedLanguage(snapshot.language));
        }

        let Some(marker) = &snapshot.marker else {
            return Err(GeneratorError::MissingCoreReference);
        };

        let services_to_register = self.extract_registrations(snapshot, marker, token)?;
        let dependency_registrators = self.scan_referenced_registrators(snapshot, token)?;

        let root_namespace = snapshot.options.root_namespace();
        let assembly_name = snapshot.assembly_name.as_deref();
        let extensions = snapshot.options.extensions();

        let mut sink = OutputSink::new();
        emitter::output_stubs(&mut sink, root_namespace, assembly_name, &extensions, token)?;
        emitter::output_implementations(
            &mut sink,
            root_namespace,
            assembly_name,
            &dependency_registrators,
            &services_to_register,
            token,
        )?;

        debug!(
            sources = sink.sources.len(),
            diagnostics = sink.diagnostics.len(),
            candidates = snapshot.candidates.len(),
            "generator run complete"
        );

        Ok(GeneratorOutput {
            sources: sink.sources,
            diagnostics: sink.diagnostics,
        })
    }

    fn extract_registrations(
        &self,
        snapshot: &CompilationSnapshot,
        marker: &Arc<TypeSymbol>,
        token: &CancellationToken,
    ) -> Result<Vec<Vec<ServiceRegistrationInfo>>, Cancelled> {
        let mut results = Vec::new();

        for candidate in &snapshot.candidates {
            token.checkpoint()?;

            if !is_syntax_target(&candidate.node) {
                continue;
            }
            if !is_semantic_target(&candidate.symbol) {
                continue;
            }

            let records = get_registration_infos(
                &snapshot.model,
                marker,
                &candidate.symbol,
                Some(&candidate.node),
                token,
            )?;

            results.push(records);
        }

        Ok(results)
    }

    /// Finds the registrator type each relevant referenced assembly exposes
    /// at `{valid_namespace}.DependencyRegistrator`.
    fn scan_referenced_registrators(
        &self,
        snapshot: &CompilationSnapshot,
        token: &CancellationToken,
    ) -> Result<Vec<Arc<TypeSymbol>>, Cancelled> {
        let mut registrators = Vec::new();

        for assembly in &snapshot.referenced_assemblies {
            token.checkpoint()?;

            if assembly.is_implicitly_declared || self.scan.is_ignored(&assembly.name) {
                continue;
            }

            let expected = format!(
                "{}.{}",
                to_valid_namespace(&assembly.name),
                DEPENDENCY_REGISTRATOR_CLASS_NAME
            );

            if let Some(registrator) = assembly
                .types
                .iter()
                .find(|ty| ty.metadata_name() == expected)
            {
                registrators.push(registrator.clone());
            }
        }

        Ok(registrators)
    }
}

/// Cheap shape filter: only class and struct declarations that carry a base
/// list or at least one attribute can yield registrations.
fn is_syntax_target(node: &DeclarationNode) -> bool {
    if node.identifier.trim().is_empty() {
        return false;
    }
    if !matches!(node.kind, DeclarationKind::Class | DeclarationKind::Struct) {
        return false;
    }
    node.has_base_list || node.has_attributes
}

fn is_semantic_target(symbol: &Arc<TypeSymbol>) -> bool {
    !symbol.is_abstract && !symbol.name.trim().is_empty()
}
