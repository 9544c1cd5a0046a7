//! Unit tests for the registration scope enum: the ordinal values and name
//! fragments are part of the generated-code contract.

use regchain::RegistrationScope;

#[test]
fn ordinals_are_stable() {
    assert_eq!(RegistrationScope::Transient as i64, 0);
    assert_eq!(RegistrationScope::Scoped as i64, 1);
    assert_eq!(RegistrationScope::Singleton as i64, 2);
}

#[test]
fn as_str_matches_emitted_method_fragments() {
    assert_eq!(RegistrationScope::Transient.as_str(), "Transient");
    assert_eq!(RegistrationScope::Scoped.as_str(), "Scoped");
    assert_eq!(RegistrationScope::Singleton.as_str(), "Singleton");
}

#[test]
fn from_ordinal_roundtrips() {
    for scope in [
        RegistrationScope::Transient,
        RegistrationScope::Scoped,
        RegistrationScope::Singleton,
    ] {
        assert_eq!(RegistrationScope::from_ordinal(scope as i64), Some(scope));
    }
    assert_eq!(RegistrationScope::from_ordinal(3), None);
    assert_eq!(RegistrationScope::from_ordinal(-1), None);
}

#[test]
fn from_name_roundtrips() {
    for scope in [
        RegistrationScope::Transient,
        RegistrationScope::Scoped,
        RegistrationScope::Singleton,
    ] {
        assert_eq!(RegistrationScope::from_name(scope.as_str()), Some(scope));
    }
    assert_eq!(RegistrationScope::from_name("Pooled"), None);
    assert_eq!(RegistrationScope::from_name(""), None);
}

#[test]
fn display_matches_as_str() {
    assert_eq!(RegistrationScope::Singleton.to_string(), "Singleton");
}
