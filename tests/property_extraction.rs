//! Property-based tests over extraction and emission invariants: ordinal
//! decoding, classification stability, value precedence and namespace
//! sanitization hold for all inputs, not just the handpicked cases.

mod common;

use common::{plain_application, scope_constant, Annotations};
use proptest::prelude::*;
use regchain::emitter::to_valid_namespace;
use regchain::{
    get_registration_infos, is_registration_marker, AttributeData, CancellationToken,
    RegistrationScope, SemanticModel, TypeSymbol,
};

fn scope_from_ordinal_strategy() -> impl Strategy<Value = (i64, RegistrationScope)> {
    prop_oneof![
        Just((0, RegistrationScope::Transient)),
        Just((1, RegistrationScope::Scoped)),
        Just((2, RegistrationScope::Singleton)),
    ]
}

proptest! {
    // Ordinal decoding accepts exactly the three defined values.
    #[test]
    fn from_ordinal_is_defined_exactly_on_the_contract_range(ordinal in any::<i64>()) {
        let decoded = RegistrationScope::from_ordinal(ordinal);
        prop_assert_eq!(decoded.is_some(), (0..=2).contains(&ordinal));
        if let Some(scope) = decoded {
            prop_assert_eq!(scope as i64, ordinal);
        }
    }

    // Classification is invariant under inheritance depth: wrapping a
    // marker attribute in any number of derived classes stays a marker.
    #[test]
    fn classification_survives_arbitrary_derivation_depth(depth in 0usize..8) {
        let annotations = Annotations::new();
        let mut current = annotations.base.clone();
        for level in 0..depth {
            current = TypeSymbol::class(format!("Derived{}Attribute", level))
                .namespace("Demo.App")
                .base(current)
                .build();
        }
        prop_assert!(is_registration_marker(&current, &annotations.marker));
    }

    // A class hierarchy that never reaches the marker never classifies.
    #[test]
    fn unrelated_hierarchies_never_classify(depth in 0usize..8) {
        let annotations = Annotations::new();
        let mut current = TypeSymbol::class("PlainAttribute").namespace("Demo.App").build();
        for level in 0..depth {
            current = TypeSymbol::class(format!("Plain{}Attribute", level))
                .namespace("Demo.App")
                .base(current)
                .build();
        }
        prop_assert!(!is_registration_marker(&current, &annotations.marker));
    }

    // The value closest to the declaration always wins, whatever scopes
    // the two levels declare.
    #[test]
    fn scope_precedence_favors_the_declaration(
        (class_ordinal, class_scope) in scope_from_ordinal_strategy(),
        root in proptest::option::of(scope_from_ordinal_strategy()),
    ) {
        let annotations = Annotations::new();
        let custom = TypeSymbol::class("DemoServiceAttribute")
            .namespace("Demo.App")
            .base(annotations.base.clone())
            .attribute(
                AttributeData::new(annotations.base.clone())
                    .with_constructor_argument(scope_constant(class_scope.as_str(), class_ordinal)),
            )
            .build();

        let mut application = AttributeData::new(custom);
        if let Some((root_ordinal, root_scope)) = root {
            application = application
                .with_named_argument("Scope", scope_constant(root_scope.as_str(), root_ordinal));
        }
        let symbol = TypeSymbol::class("Worker")
            .namespace("Demo.App")
            .attribute(application)
            .build();

        let node = common::class_node("Worker");
        let records = get_registration_infos(
            &SemanticModel::new(),
            &annotations.marker,
            &symbol,
            Some(&node),
            &CancellationToken::new(),
        ).unwrap();

        let expected = root.map(|(_, scope)| scope).unwrap_or(class_scope);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].scope, Some(expected));
    }

    // Registered services deduplicate regardless of how often a contract
    // is named.
    #[test]
    fn registered_services_deduplicate(copies in 1usize..10) {
        let annotations = Annotations::new();
        let contract = TypeSymbol::interface("IWorker").namespace("Demo.App").build();
        let mut builder = TypeSymbol::class("Worker").namespace("Demo.App");
        for _ in 0..copies {
            builder = builder.implements(contract.clone());
        }
        let symbol = builder
            .attribute(plain_application(&annotations.scoped))
            .build();

        let node = common::class_node("Worker");
        let records = get_registration_infos(
            &SemanticModel::new(),
            &annotations.marker,
            &symbol,
            Some(&node),
            &CancellationToken::new(),
        ).unwrap();

        prop_assert_eq!(records[0].registered_services().count(), 1);
    }

    // Sanitized namespaces only ever contain identifier-safe segments.
    #[test]
    fn sanitized_namespaces_are_identifier_safe(name in "[\\PC]{1,40}") {
        let namespace = to_valid_namespace(&name);
        for segment in namespace.split('.') {
            prop_assert!(!segment.is_empty());
            let mut chars = segment.chars();
            let first = chars.next().expect("non-empty segment");
            prop_assert!(!first.is_ascii_digit());
            prop_assert!(segment.chars().all(|c| c.is_alphanumeric() || c == '_'));
        }
    }

    // Sanitization is idempotent.
    #[test]
    fn sanitization_is_idempotent(name in "[\\PC]{1,40}") {
        let once = to_valid_namespace(&name);
        prop_assert_eq!(to_valid_namespace(&once), once.clone());
    }
}
