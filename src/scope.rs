//! Registration scope (service lifetime) definitions.

/// Lifetime policy assigned to a generated service registration.
///
/// The three scopes map one-to-one onto the `Add{Transient,Scoped,Singleton}`
/// family of container registration methods. The ordinal values are part of
/// the contract surface: attribute arguments arrive as boxed enum constants
/// and downstream consumers may compare ordinals numerically, so the
/// discriminants are pinned explicitly.
///
/// # Examples
///
/// ```rust
/// use regchain::RegistrationScope;
///
/// assert_eq!(RegistrationScope::Transient as i64, 0);
/// assert_eq!(RegistrationScope::Scoped as i64, 1);
/// assert_eq!(RegistrationScope::Singleton as i64, 2);
///
/// assert_eq!(RegistrationScope::from_ordinal(1), Some(RegistrationScope::Scoped));
/// assert_eq!(RegistrationScope::Scoped.as_str(), "Scoped");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum RegistrationScope {
    /// A new instance of the service is created every time it is requested.
    Transient = 0,
    /// A new instance of the service is created for each scope.
    Scoped = 1,
    /// A single instance of the service is created and shared.
    Singleton = 2,
}

impl RegistrationScope {
    /// The scope name as it appears in emitted registration method names
    /// (`services.AddScoped<...>()` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationScope::Transient => "Transient",
            RegistrationScope::Scoped => "Scoped",
            RegistrationScope::Singleton => "Singleton",
        }
    }

    /// Decodes a boxed enum constant by its ordinal value.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(RegistrationScope::Transient),
            1 => Some(RegistrationScope::Scoped),
            2 => Some(RegistrationScope::Singleton),
            _ => None,
        }
    }

    /// Decodes an enum constant by its member name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Transient" => Some(RegistrationScope::Transient),
            "Scoped" => Some(RegistrationScope::Scoped),
            "Singleton" => Some(RegistrationScope::Singleton),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegistrationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
