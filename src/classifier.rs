//! Classification of attribute classes as registration markers.

use crate::symbols::TypeSymbol;

/// Returns true when `attribute_class` is (transitively) an instance of the
/// registration-marker capability `marker`: either the base registration
/// attribute itself or a custom user attribute wrapping it.
///
/// Pure and total: error-typed input classifies as `false`, and repeated
/// calls over unchanged symbols are stable, which the host's memoization
/// relies on.
///
/// # Examples
///
/// ```rust
/// use regchain::classifier::is_registration_marker;
/// use regchain::symbols::TypeSymbol;
///
/// let marker = TypeSymbol::interface("IRegisterServiceAttribute").build();
/// let base_attr = TypeSymbol::class("RegisterServiceAttribute")
///     .implements(marker.clone())
///     .build();
/// let custom_attr = TypeSymbol::class("MyScopedAttribute")
///     .base(base_attr.clone())
///     .build();
/// let unrelated = TypeSymbol::class("ObsoleteAttribute").build();
///
/// assert!(is_registration_marker(&base_attr, &marker));
/// assert!(is_registration_marker(&custom_attr, &marker));
/// assert!(!is_registration_marker(&unrelated, &marker));
/// ```
pub fn is_registration_marker(attribute_class: &TypeSymbol, marker: &TypeSymbol) -> bool {
    attribute_class.has_implicit_conversion(marker)
}
