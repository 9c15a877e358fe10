use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::container::autowiring::{Injectable, Resolver};
use crate::container::key::{erase, recover, Erased, ServiceKey};
use crate::errors::ResolveError;

enum LocatorEntry {
    /// Pre-made value, handed out as-is: a ready singleton.
    Instance(Erased),
    /// Invoked on every resolution, no caching.
    Factory(Box<dyn Fn(&ServiceLocator) -> Erased + Send + Sync>),
}

struct LocatorRecord {
    key: ServiceKey,
    entry: LocatorEntry,
}

/// Flat, non-hierarchical registry: no lifetime nuance beyond "already
/// built" versus "built per call", and no scopes.
///
/// A fatal miss reports the requested type together with everything the
/// locator does know, which is usually enough to spot the missing
/// registration.
pub struct ServiceLocator {
    records: HashMap<TypeId, LocatorRecord>,
}

impl ServiceLocator {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    fn insert(&mut self, key: ServiceKey, entry: LocatorEntry) {
        self.records.insert(key.type_id(), LocatorRecord { key, entry });
    }

    /// Registers a pre-made instance under its own type.
    pub fn register<T: Send + Sync + 'static>(&mut self, instance: T) {
        self.register_arc(Arc::new(instance));
    }

    /// Registers an already-shared instance; usable with contract keys:
    /// `locator.register_arc::<dyn Mailer>(Arc::new(Smtp::new()))`.
    pub fn register_arc<C: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<C>) {
        self.insert(ServiceKey::of::<C>(), LocatorEntry::Instance(erase(instance)));
    }

    /// Registers a factory invoked on every resolution of `T`.
    pub fn register_factory<T, F>(&mut self, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.insert(
            ServiceKey::of::<T>(),
            LocatorEntry::Factory(Box::new(move |_| erase(Arc::new(factory())))),
        );
    }

    pub fn register_arc_factory<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.insert(
            ServiceKey::of::<C>(),
            LocatorEntry::Factory(Box::new(move |_| erase(factory()))),
        );
    }

    /// Registers a self-constructing type; its dependencies resolve against
    /// this locator on every call.
    pub fn register_injectable<T: Injectable>(&mut self) {
        self.insert(
            ServiceKey::of::<T>(),
            LocatorEntry::Factory(Box::new(|locator| erase(Arc::new(T::construct(locator))))),
        );
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.records.contains_key(&TypeId::of::<T>())
    }

    /// Every registered key, sorted by type name.
    pub fn known_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.records.values().map(|r| r.key.type_name()).collect();
        keys.sort_unstable();
        keys
    }

    /// Result form of [`ServiceLocator::resolve`].
    pub fn resolve_checked<T>(&self) -> Result<Arc<T>, ResolveError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = ServiceKey::of::<T>();
        let record = self
            .records
            .get(&key.type_id())
            .ok_or_else(|| self.miss(key))?;
        let resolved = match &record.entry {
            LocatorEntry::Instance(erased) => recover::<T>(erased),
            LocatorEntry::Factory(factory) => recover::<T>(&factory(self)),
        };
        resolved.ok_or_else(|| self.miss(key))
    }

    fn miss(&self, key: ServiceKey) -> ResolveError {
        ResolveError::UnknownToLocator {
            service_type: key.type_name(),
            known: self.known_keys().join(", "),
        }
    }

    /// Resolve an instance of `T`, aborting when nothing satisfies the
    /// request.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        match self.resolve_checked::<T>() {
            Ok(instance) => instance,
            Err(error) => {
                tracing::error!(
                    service = std::any::type_name::<T>(),
                    known = ?self.known_keys(),
                    "resolution failed"
                );
                panic!("{error}");
            }
        }
    }

    /// Resolve an instance of `T`, or `None` when no registration exists.
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.resolve_checked::<T>().ok()
    }

    /// Explicit registration wins; otherwise `T` constructs itself against
    /// this locator.
    pub fn resolve_injectable<T: Injectable>(&self) -> Arc<T> {
        self.try_resolve::<T>()
            .unwrap_or_else(|| Arc::new(T::construct(self)))
    }
}

impl Default for ServiceLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for ServiceLocator {
    fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        ServiceLocator::resolve::<T>(self)
    }

    fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        ServiceLocator::try_resolve::<T>(self)
    }
}

impl fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceLocator")
            .field("registrations", &self.records.len())
            .finish()
    }
}
