use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Stable identifier for a requested type.
///
/// Two requests for the same type always produce the same key, and `TypeId`
/// rules out collisions between unrelated types. The type name rides along
/// for diagnostics only and takes no part in equality.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    /// Key for a type, sized or not.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceKey {}

impl std::hash::Hash for ServiceKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// Type-erased shared instance.
///
/// The payload is always the `Arc<T>` itself, never the bare value, so
/// unsized contracts (`T = dyn Trait`) erase and recover through the same
/// representation as concrete types.
pub(crate) type Erased = Arc<dyn Any + Send + Sync>;

pub(crate) fn erase<T>(value: Arc<T>) -> Erased
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

pub(crate) fn recover<T>(erased: &Erased) -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    (**erased).downcast_ref::<Arc<T>>().cloned()
}
