use thiserror::Error;

use models::errors::ModelError;

/// Failures shared by the service-layer free functions. Entity helpers
/// bubble up through `Model`; the other variants are raised here when a
/// business rule rather than a storage constraint is violated.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("not allowed: {0}")]
    Forbidden(String),
    #[error("storage failure: {0}")]
    Db(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }
}
