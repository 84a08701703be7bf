//! Error types. One enum per concern, wrapped by [`ConcordError`].

mod config_error;
mod reasoning_error;
mod society_error;

pub use config_error::ConfigError;
pub use reasoning_error::ReasoningError;
pub use society_error::SocietyError;

/// Top-level error for every fallible Concord operation.
#[derive(Debug, thiserror::Error)]
pub enum ConcordError {
    #[error("society setup error: {0}")]
    SocietyError(#[from] SocietyError),

    #[error("reasoning error: {0}")]
    ReasoningError(#[from] ReasoningError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Result alias used across the workspace.
pub type ConcordResult<T> = Result<T, ConcordError>;
