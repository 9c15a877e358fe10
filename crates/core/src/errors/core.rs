use thiserror::Error;

/// Resolution failures, surfaced as values by the checked lookup paths and
/// as the panic message by the fatal ones.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No factory installed for the requested type in the scope's
    /// registration map.
    #[error("no registration for `{service_type}`")]
    NotRegistered { service_type: &'static str },

    /// The flat locator had no entry; carries everything it does know.
    #[error("no registration for `{service_type}`; known registrations: [{known}]")]
    UnknownToLocator {
        service_type: &'static str,
        known: String,
    },
}
