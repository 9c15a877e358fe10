use std::sync::Arc;

/// The capability to turn a type request into an instance.
///
/// Implemented by [`Scope`](crate::container::Scope) and
/// [`ServiceLocator`](crate::container::ServiceLocator). The methods are
/// generic, so the trait is not object safe; self-constructing types take
/// their resolver as a type parameter instead of a trait object.
pub trait Resolver {
    /// Resolve an instance of `T`.
    ///
    /// Aborts with a descriptive panic when `T` has no registration; a
    /// missing binding is not a recoverable condition on this path.
    fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T>;

    /// Resolve an instance of `T`, or `None` when nothing satisfies the
    /// request. Never panics for a missing registration.
    fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>>;
}

/// A type that can assemble itself from a resolver.
///
/// Implementations pull each of their dependencies from the resolver they
/// are handed, so nested resolution happens against whichever scope
/// triggered construction. Bodies are typically produced by an external
/// generator, but hand-written impls are equally valid; the engine only
/// ever calls this method and never inspects how it came to exist.
pub trait Injectable: Send + Sync + Sized + 'static {
    fn construct<R: Resolver>(resolver: &R) -> Self;
}

/// One constructor argument of a self-constructing type.
///
/// Lets generated `construct` bodies pull every parameter through a single
/// call shape: required dependencies resolve fatally, `Option`-wrapped
/// dependencies degrade to `None` when unregistered.
pub trait ConstructorParameter: Sized {
    fn resolve_from<R: Resolver>(resolver: &R) -> Self;
}

impl<T: ?Sized + Send + Sync + 'static> ConstructorParameter for Arc<T> {
    fn resolve_from<R: Resolver>(resolver: &R) -> Self {
        resolver.resolve::<T>()
    }
}

impl<T: ?Sized + Send + Sync + 'static> ConstructorParameter for Option<Arc<T>> {
    fn resolve_from<R: Resolver>(resolver: &R) -> Self {
        resolver.try_resolve::<T>()
    }
}
