use thiserror::Error;

/// Failures raised by registration, login and logout. `Unauthorized`
/// deliberately carries no detail about which credential check failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("email already registered")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("credentials rejected")]
    Unauthorized,
    #[error("account suspended")]
    Banned,
    #[error("password hashing failed: {0}")]
    HashError(String),
    #[error("credential handling failed: {0}")]
    TokenError(String),
    #[error("auth store failure: {0}")]
    Repository(String),
}
