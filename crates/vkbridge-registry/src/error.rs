//! Registry and catalog error types.

/// Errors raised while building the entity catalog from a registry document.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two entities share a name. The registry guarantees unique names,
    /// so this indicates a broken document.
    #[error("duplicate entity name '{name}'")]
    DuplicateEntity { name: String },

    /// A member or parameter references a type that is neither a known
    /// scalar nor a declared entity.
    #[error("unknown type reference '{type_name}' in {entity}.{member}")]
    UnknownTypeReference {
        entity: String,
        member: String,
        type_name: String,
    },

    /// An extension contributes a value to an enum that does not exist
    /// or is not an enum.
    #[error("enum extension target '{enum_name}' for '{value_name}' is not a known enum")]
    UnknownEnumTarget {
        enum_name: String,
        value_name: String,
    },

    /// Structurally invalid registry document.
    #[error("invalid registry document: {detail}")]
    InvalidDocument { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
