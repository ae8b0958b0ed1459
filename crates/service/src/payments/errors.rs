use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("webhook signature rejected")]
    InvalidSignature,
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("subscription is already paid")]
    AlreadyPaid,
    #[error("payment gateway error: {0}")]
    Gateway(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}
