//! Emission error types.

/// Errors raised while rendering or writing generated sources.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// Layout or classification failure surfaced during rendering.
    #[error(transparent)]
    Abi(#[from] vkbridge_abi::AbiError),

    /// No rendering rule for a handle's dispatch access path.
    #[error("unhandled dispatch access for handle '{handle}'")]
    UnhandledDispatchAccess { handle: String },

    /// I/O error while writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for emission operations.
pub type Result<T> = std::result::Result<T, EmitError>;
