use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AccessError;
use super::store::AccessStore;

/// Closed role set carried inside every credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Provider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Provider => "provider",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "provider" => Ok(Role::Provider),
            "admin" => Ok(Role::Admin),
            _ => Err(AccessError::MalformedCredential),
        }
    }
}

/// Authenticated identity resolved from a verified credential. Built fresh
/// per request and handed to handlers via request extensions; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

/// Claims embedded in the signed token. `jti` is the credential identifier
/// the revocation store is keyed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn to_principal(&self) -> Result<Principal, AccessError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AccessError::MalformedCredential)?;
        let role = self.role.parse::<Role>()?;
        Ok(Principal { id, role })
    }
}

/// Extract the raw token from a scheme-prefixed authorization header value.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AccessError> {
    let value = header.ok_or(AccessError::MissingCredential)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(AccessError::MissingCredential)?
        .trim();
    if token.is_empty() {
        return Err(AccessError::MissingCredential);
    }
    Ok(token)
}

/// Opaque signature + expiry check over the signed credential.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self { decoding: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Verify signature and expiry, yielding the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AccessError> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(AccessError::ExpiredCredential)
            }
            Err(_) => Err(AccessError::MalformedCredential),
        }
    }
}

/// First pipeline stage: authorization header in, [`Principal`] out.
///
/// Checks run in a fixed order: presence, signature, expiry, revocation.
/// Read-only and idempotent; resolving the same credential twice yields the
/// same principal and touches nothing in the store.
pub struct PrincipalResolver<S> {
    verifier: TokenVerifier,
    store: Arc<S>,
}

impl<S: AccessStore> PrincipalResolver<S> {
    pub fn new(verifier: TokenVerifier, store: Arc<S>) -> Self {
        Self { verifier, store }
    }

    pub async fn resolve(&self, authorization: Option<&str>) -> Result<Principal, AccessError> {
        let raw = parse_bearer(authorization)?;
        let claims = self.verifier.decode(raw)?;
        let principal = claims.to_principal()?;
        if self.store.is_token_revoked(&claims.jti).await? {
            return Err(AccessError::RevokedCredential);
        }
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing() {
        assert!(matches!(parse_bearer(None), Err(AccessError::MissingCredential)));
        assert!(matches!(parse_bearer(Some("")), Err(AccessError::MissingCredential)));
        assert!(matches!(parse_bearer(Some("Basic abc")), Err(AccessError::MissingCredential)));
        assert!(matches!(parse_bearer(Some("Bearer ")), Err(AccessError::MissingCredential)));
        assert_eq!(parse_bearer(Some("Bearer tok")).unwrap(), "tok");
    }

    #[test]
    fn role_round_trip() {
        for r in [Role::Customer, Role::Provider, Role::Admin] {
            assert_eq!(r.as_str().parse::<Role>().unwrap(), r);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn unknown_role_in_claims_is_malformed() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "superuser".into(),
            jti: Uuid::new_v4().to_string(),
            iat: 0,
            exp: i64::MAX,
        };
        assert!(matches!(claims.to_principal(), Err(AccessError::MalformedCredential)));
    }
}
