use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use common::types::Rejection;
use service::access::AccessError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::payments::PaymentError;

/// Unified handler error. Every variant renders the rejection envelope
/// `{ "success": false, "statusCode": <int>, "message": <string> }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("upstream failure: {0}")]
    BadGateway(String),
    #[error("internal error: {0}")]
    Internal(String),
    /// Carries the typed rejection so status and public message stay exactly
    /// as the pipeline defines them.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Access(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn message(&self) -> String {
        match self {
            // Internal detail stays in the logs, not the body
            ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::BadGateway(_) => "Upstream service unavailable".to_string(),
            ApiError::Access(e) => e.public_message().to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Access(e) => warn!(status = status.as_u16(), detail = %e, "request rejected"),
            ApiError::Internal(detail) | ApiError::BadGateway(detail) => {
                error!(status = status.as_u16(), %detail, "request failed")
            }
            other => warn!(status = status.as_u16(), detail = %other, "request rejected"),
        }
        let body = Rejection::new(status.as_u16(), &self.message());
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::Conflict => ApiError::Conflict("An account with this email already exists".into()),
            AuthError::NotFound => ApiError::NotFound("User not found".into()),
            AuthError::Unauthorized => ApiError::Unauthorized("Invalid email or password".into()),
            AuthError::Banned => ApiError::Forbidden("This account has been suspended".into()),
            AuthError::TokenError(msg) => ApiError::Unauthorized(msg),
            AuthError::HashError(msg) | AuthError::Repository(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::Db(msg) => ApiError::Internal(msg),
            ServiceError::Model(m) => m.into(),
        }
    }
}

impl From<models::errors::ModelError> for ApiError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ApiError::BadRequest(msg),
            models::errors::ModelError::Db(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::InvalidSignature => ApiError::BadRequest("Invalid webhook signature".into()),
            PaymentError::MalformedEvent(msg) => ApiError::BadRequest(msg),
            PaymentError::Forbidden(msg) => ApiError::Forbidden(msg),
            PaymentError::NotFound(msg) => ApiError::NotFound(msg),
            PaymentError::AlreadyPaid => ApiError::Conflict("Subscription is already paid".into()),
            PaymentError::Gateway(msg) => ApiError::BadGateway(msg),
            PaymentError::Model(m) => m.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_rejections_keep_pipeline_status_and_message() {
        let e = ApiError::Access(AccessError::MissingCredential);
        assert_eq!(e.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(e.message(), "Authentication required");

        let e = ApiError::Access(AccessError::ProviderNotFound);
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_detail_never_reaches_the_body() {
        let e = ApiError::Internal("connection pool exhausted".into());
        assert_eq!(e.message(), "Internal server error");
    }

    #[test]
    fn auth_conflict_maps_to_409() {
        let e: ApiError = AuthError::Conflict.into();
        assert_eq!(e.status(), StatusCode::CONFLICT);
    }
}
