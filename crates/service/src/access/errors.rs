use thiserror::Error;

use super::principal::Role;

/// Typed rejection raised by a pipeline stage. Each variant maps to a fixed
/// HTTP status; authentication variants all share one generic client message
/// so a caller cannot probe which credential check failed.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("no credential in authorization header")]
    MissingCredential,
    #[error("credential failed verification")]
    MalformedCredential,
    #[error("credential expired")]
    ExpiredCredential,
    #[error("credential has been revoked")]
    RevokedCredential,
    #[error("role {role} not in allowed set {allowed:?}")]
    ForbiddenRole { role: Role, allowed: Vec<Role> },
    #[error("provider record not found")]
    ProviderNotFound,
    #[error("provider is not approved")]
    ProviderNotApproved,
    #[error("no active paid subscription")]
    SubscriptionRequired,
    #[error("state store error: {0}")]
    Store(String),
}

impl AccessError {
    /// True for credential failures (the 401 family).
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            AccessError::MissingCredential
                | AccessError::MalformedCredential
                | AccessError::ExpiredCredential
                | AccessError::RevokedCredential
        )
    }

    /// Fixed HTTP status for the rejection body.
    pub fn status_code(&self) -> u16 {
        match self {
            _ if self.is_authentication() => 401,
            AccessError::ForbiddenRole { .. } => 403,
            AccessError::ProviderNotApproved => 403,
            AccessError::SubscriptionRequired => 403,
            AccessError::ProviderNotFound => 404,
            AccessError::Store(_) => 500,
            _ => 500,
        }
    }

    /// Message safe to hand to the caller. The 401 family is deliberately
    /// uniform; authorization failures may name the precondition since the
    /// caller is already authenticated at that point.
    pub fn public_message(&self) -> &'static str {
        match self {
            _ if self.is_authentication() => "Authentication required",
            AccessError::ForbiddenRole { .. } => "Forbidden",
            AccessError::ProviderNotApproved => "Provider account is pending approval",
            AccessError::SubscriptionRequired => "An active paid subscription is required",
            AccessError::ProviderNotFound => "Provider not found",
            _ => "Internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_family_maps_to_401_with_uniform_message() {
        for e in [
            AccessError::MissingCredential,
            AccessError::MalformedCredential,
            AccessError::ExpiredCredential,
            AccessError::RevokedCredential,
        ] {
            assert_eq!(e.status_code(), 401);
            assert_eq!(e.public_message(), "Authentication required");
        }
    }

    #[test]
    fn authorization_statuses() {
        let forbidden = AccessError::ForbiddenRole { role: Role::Customer, allowed: vec![Role::Admin] };
        assert_eq!(forbidden.status_code(), 403);
        assert_eq!(AccessError::ProviderNotApproved.status_code(), 403);
        assert_eq!(AccessError::SubscriptionRequired.status_code(), 403);
        assert_eq!(AccessError::ProviderNotFound.status_code(), 404);
    }

    #[test]
    fn forbidden_role_detail_stays_out_of_public_message() {
        let e = AccessError::ForbiddenRole { role: Role::Customer, allowed: vec![Role::Admin] };
        assert_eq!(e.public_message(), "Forbidden");
        // detail is available for logging
        assert!(e.to_string().contains("customer"));
    }
}
