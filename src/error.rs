//! Error types for hotswap-factory.

/// Result type alias for hotswap-factory operations.
pub type Result<T> = std::result::Result<T, FactoryError>;

/// Errors that can occur when working with a refreshable factory.
///
/// Only [`FactoryError::Build`] ever crosses the crate boundary through
/// [`refresh()`](crate::core::HotswapFactory::refresh) or the initial
/// [`build()`](crate::core::FactoryBuilder::build); source read failures are
/// absorbed by the polling scheduler and surface only in logs.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// The delegate builder rejected the current configuration sources.
    ///
    /// The previous delegate (if any) stays installed and fully usable.
    #[error("Failed to build delegate: {0}")]
    Build(String),

    /// A configuration source's modification timestamp or content could not
    /// be read.
    #[error("Failed to read source '{identity}': {source}")]
    SourceRead {
        /// Identity of the source that failed.
        identity: String,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Factory error: {0}")]
    Other(String),
}

impl FactoryError {
    /// Create a build error from any displayable cause.
    pub fn build(cause: impl std::fmt::Display) -> Self {
        Self::Build(cause.to_string())
    }

    /// Create a source read error for the given source identity.
    pub fn source_read(identity: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceRead {
            identity: identity.into(),
            source,
        }
    }
}
