use thiserror::Error;

/// Error type shared by every entity helper in this crate.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self {
        ModelError::Db(e.to_string())
    }
}

impl ModelError {
    /// True when the caller's input was at fault rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation(_))
    }
}
