//! Resolution error types.

/// Errors raised while computing the required entity closure.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A feature block or extension names a command the catalog does not
    /// contain.
    #[error("unknown command '{name}' required by {source_block}")]
    UnknownCommand { name: String, source_block: String },

    /// A feature block names a type the catalog does not contain.
    #[error("unknown type '{name}' required by {source_block}")]
    UnknownType { name: String, source_block: String },

    /// Catalog-level failure (enum extension target, reference errors).
    #[error(transparent)]
    Registry(#[from] vkbridge_registry::RegistryError),
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
