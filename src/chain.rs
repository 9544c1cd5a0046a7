//! Runtime registrator chain.
//!
//! The generated registrator classes target this machinery: every assembly
//! contributes one registrator, each registrator names the registrators of
//! the assemblies it depends on, and walking the resulting chain registers
//! every service in the application exactly once. The walk is depth-first
//! with parent-first ordering and each registrator type is instantiated at
//! most once, so diamond-shaped dependency graphs stay linear.
//!
//! The service-collection type `S` is generic; the chain imposes nothing on
//! it beyond what the registrators themselves need.
//!
//! # Examples
//!
//! ```rust
//! use regchain::chain::{DependencyCollection, DependencyRegistrator};
//!
//! #[derive(Default)]
//! struct CoreRegistrator;
//!
//! impl DependencyRegistrator<Vec<&'static str>> for CoreRegistrator {
//!     fn initialize(&self, _collection: &mut DependencyCollection<Vec<&'static str>>) {}
//!     fn register_services(&self, services: &mut Vec<&'static str>) {
//!         services.push("core");
//!     }
//! }
//!
//! #[derive(Default)]
//! struct AppRegistrator;
//!
//! impl DependencyRegistrator<Vec<&'static str>> for AppRegistrator {
//!     fn initialize(&self, collection: &mut DependencyCollection<Vec<&'static str>>) {
//!         collection.add_dependency::<CoreRegistrator>();
//!     }
//!     fn register_services(&self, services: &mut Vec<&'static str>) {
//!         services.push("app");
//!     }
//! }
//!
//! let collection = DependencyCollection::create::<AppRegistrator>();
//! let mut services = Vec::new();
//! collection.register_services(&mut services);
//! assert_eq!(services, vec!["app", "core"]);
//! ```

use std::any::TypeId;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

/// One assembly's contribution to the chain.
///
/// `initialize` names upstream registrators via
/// [`DependencyCollection::add_dependency`]; `register_services` writes the
/// assembly's own registrations into the service collection.
pub trait DependencyRegistrator<S>: 'static {
    fn initialize(&self, collection: &mut DependencyCollection<S>);
    fn register_services(&self, services: &mut S);
}

/// The resolved chain of registrators, deduplicated by type.
pub struct DependencyCollection<S: 'static> {
    registrators: Vec<Arc<dyn DependencyRegistrator<S>>>,
    seen: HashSet<TypeId>,
}

impl<S: 'static> DependencyCollection<S> {
    /// Builds the chain rooted at registrator `R`.
    pub fn create<R>() -> Self
    where
        R: DependencyRegistrator<S> + Default,
    {
        let mut collection = Self {
            registrators: Vec::new(),
            seen: HashSet::new(),
        };
        collection.add_dependency::<R>();
        collection
    }

    /// Adds registrator `T` and, transitively, everything it depends on.
    /// A type already present in the chain is not added again and its
    /// dependencies are not re-walked.
    pub fn add_dependency<T>(&mut self)
    where
        T: DependencyRegistrator<S> + Default,
    {
        if !self.seen.insert(TypeId::of::<T>()) {
            return;
        }

        let registrator: Arc<dyn DependencyRegistrator<S>> = Arc::new(T::default());
        // Parent before its dependencies: push first, then walk.
        self.registrators.push(registrator.clone());
        registrator.initialize(self);
    }

    /// Number of registrators in the chain.
    pub fn len(&self) -> usize {
        self.registrators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrators.is_empty()
    }

    /// Walks the chain in order and lets every registrator register its
    /// services.
    pub fn register_services(&self, services: &mut S) {
        for registrator in &self.registrators {
            registrator.register_services(services);
        }
    }
}

/// Entry point the generated extension methods delegate to: wraps a service
/// collection, builds the chain for the root registrator `R` and exposes
/// the final registration step.
pub struct DependencyRegistratorBuilder<'a, S: 'static, R> {
    services: &'a mut S,
    collection: DependencyCollection<S>,
    _registrator: PhantomData<R>,
}

impl<'a, S: 'static, R> DependencyRegistratorBuilder<'a, S, R>
where
    R: DependencyRegistrator<S> + Default,
{
    /// Initializes the dependency chain for `R` over `services`.
    pub fn new(services: &'a mut S) -> Self {
        Self {
            services,
            collection: DependencyCollection::create::<R>(),
            _registrator: PhantomData,
        }
    }

    /// The resolved chain, for inspection before registration runs.
    pub fn collection(&self) -> &DependencyCollection<S> {
        &self.collection
    }

    /// Executes the registration of all services in the chain.
    pub fn register_services(self) {
        self.collection.register_services(self.services);
    }
}
