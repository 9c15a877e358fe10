use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::container::autowiring::{Injectable, Resolver};
use crate::container::builder::DeferredRegistration;
use crate::container::key::{recover, Erased, ServiceKey};
use crate::container::lifetime::Lifetime;
use crate::errors::ResolveError;

/// Identity of one scope, distinct from its parent and siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(Uuid);

impl ScopeId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A factory as installed into a scope, already wrapped for its lifetime.
pub(crate) type InstalledFactory = Box<dyn Fn(&Scope) -> Erased + Send + Sync>;

struct InstalledEntry {
    key: ServiceKey,
    lifetime: Lifetime,
    factory: InstalledFactory,
}

/// Registration map owned by exactly one scope.
///
/// Populated while the builder's deferred actions replay during scope
/// construction, read-only afterwards. Installing a key twice replaces the
/// earlier entry, which is how "last registration wins" falls out of replay
/// order.
pub(crate) struct ScopeRegistry {
    entries: HashMap<TypeId, InstalledEntry>,
}

impl ScopeRegistry {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub(crate) fn install<C: ?Sized + 'static>(
        &mut self,
        lifetime: Lifetime,
        factory: InstalledFactory,
    ) {
        let key = ServiceKey::of::<C>();
        self.entries.insert(
            key.type_id(),
            InstalledEntry {
                key,
                lifetime,
                factory,
            },
        );
    }

    fn get(&self, type_id: TypeId) -> Option<&InstalledEntry> {
        self.entries.get(&type_id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(ScopeId, ServiceKey)>> = RefCell::new(Vec::new());
}

/// Traps construction cycles before they deadlock a cache slot:
/// re-entering a (scope, key) pair already on the thread's resolution stack
/// means a factory is asking, directly or not, for the thing it is busy
/// producing.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(scope: ScopeId, key: ServiceKey) -> Self {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(s, k)| *s == scope && *k == key) {
                let chain: Vec<&str> = stack
                    .iter()
                    .map(|(_, k)| k.type_name())
                    .chain([key.type_name()])
                    .collect();
                panic!(
                    "circular dependency while resolving `{}`: {}",
                    key.type_name(),
                    chain.join(" -> ")
                );
            }
            stack.push((scope, key));
        });
        Self
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

struct ScopeInner {
    id: ScopeId,
    parent: Option<ScopeId>,
    actions: Arc<[DeferredRegistration]>,
    registry: ScopeRegistry,
}

/// One live instance of the object graph.
///
/// Cheap to clone: clones share the same registration map and caches, so a
/// scope can be handed down as ambient context through an application.
/// [`Scope::scope`] is the operation that creates a genuinely new scope.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    pub(crate) fn root(actions: Arc<[DeferredRegistration]>) -> Self {
        Self::replay(actions, None)
    }

    fn replay(actions: Arc<[DeferredRegistration]>, parent: Option<ScopeId>) -> Self {
        let id = ScopeId::new();
        let mut registry = ScopeRegistry::new();
        for action in actions.iter() {
            action(&mut registry);
        }
        tracing::debug!(
            scope = %id,
            parent = ?parent,
            registrations = registry.len(),
            "scope constructed"
        );
        Self {
            inner: Arc::new(ScopeInner {
                id,
                parent,
                actions,
                registry,
            }),
        }
    }

    /// A new child scope: the same deferred registrations replayed against
    /// a fresh registration map. Scoped slots start empty; singleton slots
    /// are the lineage-shared ones.
    pub fn scope(&self) -> Scope {
        Self::replay(self.inner.actions.clone(), Some(self.inner.id))
    }

    /// Runs `f` against a new child scope.
    pub fn with_scope<T>(&self, f: impl FnOnce(&Scope) -> T) -> T {
        let child = self.scope();
        f(&child)
    }

    pub fn id(&self) -> ScopeId {
        self.inner.id
    }

    /// Parent scope id, `None` for the root.
    pub fn parent_id(&self) -> Option<ScopeId> {
        self.inner.parent
    }

    /// Whether a registration is installed for `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.get(TypeId::of::<T>()).is_some()
    }

    /// Number of installed registrations.
    pub fn registration_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Result form of [`Scope::resolve`]: the miss comes back as a value
    /// instead of a panic.
    pub fn resolve_checked<T>(&self) -> Result<Arc<T>, ResolveError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = ServiceKey::of::<T>();
        let entry = match self.inner.registry.get(key.type_id()) {
            Some(entry) => entry,
            None => {
                return Err(ResolveError::NotRegistered {
                    service_type: key.type_name(),
                })
            }
        };
        let _guard = ResolutionGuard::enter(self.inner.id, key);
        tracing::trace!(
            scope = %self.inner.id,
            service = entry.key.type_name(),
            lifetime = entry.lifetime.as_str(),
            "resolving"
        );
        let erased = (entry.factory)(self);
        recover::<T>(&erased).ok_or(ResolveError::NotRegistered {
            service_type: key.type_name(),
        })
    }

    /// Resolve an instance of `T`.
    ///
    /// The installed factory runs with this scope as its resolver, so the
    /// whole transitive graph is assembled here. Panics with a message
    /// naming `T` when no registration exists; use
    /// [`Scope::try_resolve`] for the recoverable form.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        match self.resolve_checked::<T>() {
            Ok(instance) => instance,
            Err(error) => panic!("{error}"),
        }
    }

    /// Resolve an instance of `T`, or `None` when no registration exists.
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.resolve_checked::<T>().ok()
    }

    /// Resolve `T` through its explicit registration when one exists, or
    /// fall back to auto-construction against this scope. Explicit bindings
    /// always win; the fallback result is never cached.
    pub fn resolve_injectable<T: Injectable>(&self) -> Arc<T> {
        self.try_resolve::<T>()
            .unwrap_or_else(|| Arc::new(T::construct(self)))
    }
}

impl Resolver for Scope {
    fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        Scope::resolve::<T>(self)
    }

    fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Scope::try_resolve::<T>(self)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.inner.id)
            .field("parent", &self.inner.parent)
            .field("registrations", &self.inner.registry.len())
            .finish()
    }
}
