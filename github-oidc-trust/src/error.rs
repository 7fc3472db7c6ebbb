//! Error types for configuration loading and serialization.
//!
//! Building declarations never fails; only the edges (reading config files,
//! parsing CLI repository specs, rendering JSON) return these errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubOidcTrustError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid repository spec '{0}': expected owner/repo[:filter]")]
    InvalidRepositorySpec(String),
}

impl GithubOidcTrustError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_repository_spec(spec: impl Into<String>) -> Self {
        Self::InvalidRepositorySpec(spec.into())
    }
}

pub type GithubOidcTrustResult<T> = Result<T, GithubOidcTrustError>;
