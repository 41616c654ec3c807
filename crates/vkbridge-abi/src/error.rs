//! ABI analysis error types.
//!
//! Every error here is fatal for the run: a wrong guess at layout or
//! calling convention corrupts memory at runtime, so the analyzer refuses
//! to guess.

/// Errors raised during layout analysis, ordering and classification.
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    /// A member shape no alignment or direction rule covers.
    #[error("no layout rule covers {entity}.{member}")]
    UnhandledLayoutCase { entity: String, member: String },

    /// A required function cannot be classified into a scope.
    #[error("function '{function}' has no classification path")]
    MissingOverrideMetadata { function: String },

    /// Dependency ordering made no progress; the residual set is cyclic
    /// through non-pointer struct members.
    #[error("cyclic struct dependency among: {}", remaining.join(", "))]
    CyclicStructDependency { remaining: Vec<String> },
}

/// Result type alias for ABI analysis operations.
pub type Result<T> = std::result::Result<T, AbiError>;
