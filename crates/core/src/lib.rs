//! # wirebox-core
//!
//! Runtime object-graph assembly: register producers of your types, each
//! with a lifetime, then resolve instances on demand while transitive
//! dependencies are satisfied automatically. Hierarchical scopes control
//! sharing — singletons span every scope built from one builder, scoped
//! instances reset per scope, transients are never shared.
//!
//! ```
//! use std::sync::Arc;
//! use wirebox_core::ContainerBuilder;
//!
//! struct Config {
//!     url: &'static str,
//! }
//!
//! struct Api {
//!     config: Arc<Config>,
//! }
//!
//! let mut builder = ContainerBuilder::new();
//! builder.singleton(|| Config { url: "https://api.internal" });
//! builder.transient_with(|scope| Api { config: scope.resolve() });
//!
//! let root = builder.build();
//! let api: Arc<Api> = root.resolve();
//! assert_eq!(api.config.url, "https://api.internal");
//!
//! let request_scope = root.scope();
//! assert!(Arc::ptr_eq(&api.config, &request_scope.resolve::<Config>()));
//! ```

pub mod container;
pub mod errors;

pub use container::{
    Assigned, ConstructorParameter, ContainerBuilder, Injectable, Lifetime, Resolver, Scope,
    ScopeId, ServiceKey, ServiceLocator,
};
pub use errors::ResolveError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
