//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ring operations.
///
/// Every variant is synchronous and recoverable: a failed operation leaves
/// the ring in its prior valid state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A server with this name is already a member of the ring.
    #[error("server already exists: {0}")]
    AlreadyExists(String),

    /// The named server is not a member of the ring.
    #[error("server not found: {0}")]
    NotFound(String),

    /// The ring has no servers, so no key can be resolved.
    #[error("ring is empty")]
    EmptyRing,
}
