pub mod assigned;
pub mod autowiring;
pub mod builder;
pub mod key;
pub mod lifetime;
pub mod locator;
pub mod scope;
mod slot;

#[cfg(test)]
mod resolution_tests;

pub use assigned::Assigned;
pub use autowiring::{ConstructorParameter, Injectable, Resolver};
pub use builder::ContainerBuilder;
pub use key::ServiceKey;
pub use lifetime::Lifetime;
pub use locator::ServiceLocator;
pub use scope::{Scope, ScopeId};
