//! Structured diagnostics reported against user source locations.
//!
//! Generation problems caused by user input (a missing assembly name, an
//! inconsistent factory configuration) never abort the run; they surface as
//! diagnostics attached to the most specific available location while the
//! remaining valid records still emit.

use std::fmt;

/// Span into a source file (byte offsets).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Where a diagnostic points: a declaration span or nowhere in particular.
///
/// Assembly-level problems (no assembly name) have no source anchor and use
/// [`Location::None`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// No source location (assembly-level condition).
    None,
    /// A span inside the declaring source file.
    Node(Span),
}

/// Severity level of a diagnostic.
///
/// The generator currently only raises errors; the enum mirrors the host
/// sink's surface so additional levels slot in without a contract change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Immutable description of one diagnostic condition: identifier, title and
/// message template with `{placeholder}` slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub message_template: &'static str,
    pub category: &'static str,
    pub severity: Severity,
}

/// The assembly name could not be determined; blocks all output.
pub const MISSING_ASSEMBLY_NAME: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "RC0001",
    title: "The assembly name could not be determined.",
    message_template: "The name of the assembly is empty",
    category: "regchain",
    severity: Severity::Error,
};

/// A factory method name was given without a factory type.
pub const FACTORY_TYPE_NOT_DEFINED: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "RC0002",
    title: "The factory type is not defined.",
    message_template: "The method name '{factoryMethodName}' of the factory was specified but the corresponding factory type is missing.",
    category: "regchain",
    severity: Severity::Error,
};

/// No single factory method with a matching signature was found.
pub const FACTORY_METHOD_NOT_FOUND: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "RC0003",
    title: "Could not determine the factory method.",
    message_template: "Could not determine the factory method. Please ensure the factory '{factoryTypeName}' contains a single method with the correct signature or provide the name of the method.",
    category: "regchain",
    severity: Severity::Error,
};

/// An explicit factory method name matched no valid method.
pub const FACTORY_METHOD_NAME_IS_INVALID: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "RC0004",
    title: "The factory method name is invalid.",
    message_template: "The method '{factoryMethodName}' was not found on the factory '{factoryTypeName}' or does not have a valid factory signature.",
    category: "regchain",
    severity: Severity::Error,
};

/// One reported problem: a descriptor instantiated with a formatted message
/// at a concrete location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub descriptor: DiagnosticDescriptor,
    pub message: String,
    pub location: Location,
}

impl Diagnostic {
    /// Instantiates `descriptor` at `location`, substituting the template's
    /// `{placeholder}` slots in order with `args`.
    pub fn create(
        descriptor: DiagnosticDescriptor,
        location: Location,
        args: &[&str],
    ) -> Self {
        let mut message = String::with_capacity(descriptor.message_template.len());
        let mut rest = descriptor.message_template;
        let mut args = args.iter();
        while let Some(open) = rest.find('{') {
            message.push_str(&rest[..open]);
            match rest[open..].find('}') {
                Some(close) => {
                    message.push_str(args.next().copied().unwrap_or(""));
                    rest = &rest[open + close + 1..];
                }
                None => {
                    rest = &rest[open..];
                    break;
                }
            }
        }
        message.push_str(rest);
        Self {
            descriptor,
            message,
            location,
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor.id
    }

    pub fn severity(&self) -> Severity {
        self.descriptor.severity
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.descriptor.severity.as_str(),
            self.descriptor.id,
            self.message
        )
    }
}
