use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Dependency not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Malformed embedding for article {id}: {reason}")]
    MalformedVector { id: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
