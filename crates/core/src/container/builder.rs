use std::sync::Arc;

use crate::container::assigned::Assigned;
use crate::container::autowiring::Injectable;
use crate::container::key::{erase, Erased};
use crate::container::lifetime::Lifetime;
use crate::container::scope::{Scope, ScopeRegistry};
use crate::container::slot::CacheSlot;

/// A factory as registered, before any lifetime wrapping.
pub(crate) type RawFactory = Arc<dyn Fn(&Scope) -> Erased + Send + Sync>;

/// One deferred registration: given a scope under construction, installs a
/// lifetime-wrapped factory into its registration map.
pub(crate) type DeferredRegistration = Box<dyn Fn(&mut ScopeRegistry) + Send + Sync>;

/// Ordered accumulator of deferred registrations, replayed against every
/// scope built from it.
///
/// The same key may be registered any number of times; actions replay in
/// registration order, so the last one wins. `build` consumes the builder,
/// fixing the action list that the whole scope lineage will share.
#[derive(Default)]
pub struct ContainerBuilder {
    actions: Vec<DeferredRegistration>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes the root scope by replaying every deferred
    /// registration, in registration order, against it.
    pub fn build(self) -> Scope {
        Scope::root(self.actions.into())
    }

    fn register_transient<C: ?Sized + 'static>(&mut self, factory: RawFactory) {
        self.actions.push(Box::new(move |registry: &mut ScopeRegistry| {
            let factory = factory.clone();
            registry.install::<C>(
                Lifetime::Transient,
                Box::new(move |scope| factory(scope)),
            );
        }));
    }

    fn register_singleton<C: ?Sized + 'static>(&mut self, factory: RawFactory) {
        // One slot per registration call: every scope replaying this action
        // wraps the same slot, which is what makes the instance
        // lineage-wide.
        let slot = Arc::new(CacheSlot::new());
        self.actions.push(Box::new(move |registry: &mut ScopeRegistry| {
            let slot = slot.clone();
            let factory = factory.clone();
            registry.install::<C>(
                Lifetime::Singleton,
                Box::new(move |scope| slot.get_or_fill(|| factory(scope))),
            );
        }));
    }

    fn register_scoped<C: ?Sized + 'static>(&mut self, factory: RawFactory) {
        self.actions.push(Box::new(move |registry: &mut ScopeRegistry| {
            // A fresh slot on every replay: each scope owns its own.
            let slot = Arc::new(CacheSlot::new());
            let factory = factory.clone();
            registry.install::<C>(
                Lifetime::Scoped,
                Box::new(move |scope| slot.get_or_fill(|| factory(scope))),
            );
        }));
    }

    // --- Transient ---

    /// Registers a factory invoked on every resolution of `I`.
    pub fn transient<I, F>(&mut self, factory: F)
    where
        I: Send + Sync + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        self.register_transient::<I>(Arc::new(move |_| erase(Arc::new(factory()))));
    }

    /// Resolver-aware form of [`ContainerBuilder::transient`]: the factory
    /// receives the scope that triggered resolution and can pull its own
    /// dependencies from it.
    pub fn transient_with<I, F>(&mut self, factory: F)
    where
        I: Send + Sync + 'static,
        F: Fn(&Scope) -> I + Send + Sync + 'static,
    {
        self.register_transient::<I>(Arc::new(move |scope| erase(Arc::new(factory(scope)))));
    }

    /// Registers a factory under the contract key `C` instead of the
    /// factory's own return type. The factory hands back the shared form so
    /// unsized contracts work: `Arc<dyn Trait>`.
    pub fn transient_for<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.register_transient::<C>(Arc::new(move |_| erase(factory())));
    }

    pub fn transient_for_with<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> Arc<C> + Send + Sync + 'static,
    {
        self.register_transient::<C>(Arc::new(move |scope| erase(factory(scope))));
    }

    /// Registers a self-constructing type under its own key.
    pub fn transient_self<I: Injectable>(&mut self) {
        self.register_transient::<I>(Arc::new(|scope| erase(Arc::new(I::construct(scope)))));
    }

    /// Binds contract `C` to implementation `I`, resolved through `I`'s own
    /// registration. Fatal at resolution time if `I` is not registered.
    pub fn transient_assigned<C, I>(&mut self, marker: Assigned<C, I>)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Send + Sync + 'static,
    {
        let coerce = marker.into_coercion();
        self.register_transient::<C>(Arc::new(move |scope| erase(coerce(scope.resolve::<I>()))));
    }

    /// Binds contract `C` to self-constructing implementation `I`. An
    /// explicit registration of `I` wins; construction is the fallback.
    pub fn transient_assigned_injectable<C, I>(&mut self, marker: Assigned<C, I>)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        let coerce = marker.into_coercion();
        self.register_transient::<C>(Arc::new(move |scope| {
            erase(coerce(scope.resolve_injectable::<I>()))
        }));
    }

    // --- Singleton ---

    /// Registers a factory invoked at most once across every scope built
    /// from this builder. The cache slot is captured by this call itself,
    /// which is what every replayed wrapper shares.
    pub fn singleton<I, F>(&mut self, factory: F)
    where
        I: Send + Sync + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        self.register_singleton::<I>(Arc::new(move |_| erase(Arc::new(factory()))));
    }

    pub fn singleton_with<I, F>(&mut self, factory: F)
    where
        I: Send + Sync + 'static,
        F: Fn(&Scope) -> I + Send + Sync + 'static,
    {
        self.register_singleton::<I>(Arc::new(move |scope| erase(Arc::new(factory(scope)))));
    }

    pub fn singleton_for<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.register_singleton::<C>(Arc::new(move |_| erase(factory())));
    }

    pub fn singleton_for_with<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> Arc<C> + Send + Sync + 'static,
    {
        self.register_singleton::<C>(Arc::new(move |scope| erase(factory(scope))));
    }

    pub fn singleton_self<I: Injectable>(&mut self) {
        self.register_singleton::<I>(Arc::new(|scope| erase(Arc::new(I::construct(scope)))));
    }

    pub fn singleton_assigned<C, I>(&mut self, marker: Assigned<C, I>)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Send + Sync + 'static,
    {
        let coerce = marker.into_coercion();
        self.register_singleton::<C>(Arc::new(move |scope| erase(coerce(scope.resolve::<I>()))));
    }

    pub fn singleton_assigned_injectable<C, I>(&mut self, marker: Assigned<C, I>)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        let coerce = marker.into_coercion();
        self.register_singleton::<C>(Arc::new(move |scope| {
            erase(coerce(scope.resolve_injectable::<I>()))
        }));
    }

    // --- Scoped ---

    /// Registers a factory invoked at most once per scope. Each new scope
    /// allocates its own slot while replaying this action, so the instance
    /// resets for every child.
    pub fn scoped<I, F>(&mut self, factory: F)
    where
        I: Send + Sync + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        self.register_scoped::<I>(Arc::new(move |_| erase(Arc::new(factory()))));
    }

    pub fn scoped_with<I, F>(&mut self, factory: F)
    where
        I: Send + Sync + 'static,
        F: Fn(&Scope) -> I + Send + Sync + 'static,
    {
        self.register_scoped::<I>(Arc::new(move |scope| erase(Arc::new(factory(scope)))));
    }

    pub fn scoped_for<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.register_scoped::<C>(Arc::new(move |_| erase(factory())));
    }

    pub fn scoped_for_with<C, F>(&mut self, factory: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> Arc<C> + Send + Sync + 'static,
    {
        self.register_scoped::<C>(Arc::new(move |scope| erase(factory(scope))));
    }

    pub fn scoped_self<I: Injectable>(&mut self) {
        self.register_scoped::<I>(Arc::new(|scope| erase(Arc::new(I::construct(scope)))));
    }

    pub fn scoped_assigned<C, I>(&mut self, marker: Assigned<C, I>)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Send + Sync + 'static,
    {
        let coerce = marker.into_coercion();
        self.register_scoped::<C>(Arc::new(move |scope| erase(coerce(scope.resolve::<I>()))));
    }

    pub fn scoped_assigned_injectable<C, I>(&mut self, marker: Assigned<C, I>)
    where
        C: ?Sized + Send + Sync + 'static,
        I: Injectable,
    {
        let coerce = marker.into_coercion();
        self.register_scoped::<C>(Arc::new(move |scope| {
            erase(coerce(scope.resolve_injectable::<I>()))
        }));
    }
}
