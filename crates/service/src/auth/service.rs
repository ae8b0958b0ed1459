use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, NewUser, RegisterInput, RegisterProviderInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use crate::access::errors::AccessError;
use crate::access::principal::{Claims, TokenVerifier};
use crate::access::Role;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    fn validate_registration(input: &RegisterInput) -> Result<(), AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if !input.email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("name required".into()));
        }
        Ok(())
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    async fn register(&self, input: RegisterInput, role: Role) -> Result<AuthUser, AuthError> {
        Self::validate_registration(&input)?;
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }
        let password_hash = Self::hash_password(&input.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                name: input.name,
                email: input.email,
                phone: input.phone,
                address: input.address,
                role,
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Register a customer account.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: None, token_ttl_hours: 12 });
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), phone: "123".into(), address: "Main St 1".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register_customer(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register_customer(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        self.register(input, Role::Customer).await
    }

    /// Register a provider account plus its profile. The profile starts
    /// unapproved; provider routes stay closed until an admin approves it.
    #[instrument(skip(self, input), fields(email = %input.account.email))]
    pub async fn register_provider(&self, input: RegisterProviderInput) -> Result<AuthUser, AuthError> {
        if input.skills.is_empty() {
            return Err(AuthError::Validation("at least one skill is required".into()));
        }
        if input.experience_years < 0 {
            return Err(AuthError::Validation("experience cannot be negative".into()));
        }
        let user = self.register(input.account, Role::Provider).await?;
        self.repo
            .create_provider_profile(user.id, input.experience_years, &input.skills)
            .await?;
        Ok(user)
    }

    /// Authenticate a user and issue a signed token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: Some("secret".into()), token_ttl_hours: 12 });
    /// let _ = tokio_test::block_on(svc.register_customer(RegisterInput { name: "N".into(), email: "u@e.com".into(), phone: "1".into(), address: "A".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if self.repo.is_banned(user.id).await? {
            return Err(AuthError::Banned);
        }

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        let mut expires_at = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            let now = Utc::now();
            let exp = now + Duration::hours(self.cfg.token_ttl_hours);
            let claims = Claims {
                sub: user.id.to_string(),
                role: user.role.as_str().into(),
                jti: Uuid::new_v4().to_string(),
                iat: now.timestamp(),
                exp: exp.timestamp(),
            };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
            expires_at = Some(exp);
        }

        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(AuthSession { user, token, expires_at })
    }

    /// Invalidate a still-valid credential by recording its `jti` in the
    /// revocation store until the credential's natural expiry. The only
    /// write in the auth subsystem; every later resolution of the same
    /// token is rejected.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let secret = self
            .cfg
            .jwt_secret
            .as_deref()
            .ok_or_else(|| AuthError::TokenError("no signing secret configured".into()))?;
        let claims = match TokenVerifier::new(secret).decode(token) {
            Ok(c) => c,
            // an expired credential can no longer be used; nothing to record
            Err(AccessError::ExpiredCredential) => return Ok(()),
            Err(_) => return Err(AuthError::TokenError("credential failed verification".into())),
        };
        let expires_at: DateTime<Utc> = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| AuthError::TokenError("invalid expiry claim".into()))?;
        self.repo.revoke_token(&claims.jti, expires_at).await?;
        info!(jti = %claims.jti, "token_revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(repo: Arc<MockAuthRepository>) -> AuthService<MockAuthRepository> {
        AuthService::new(repo, AuthConfig { jwt_secret: Some("test-secret".into()), token_ttl_hours: 12 })
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Tester".into(),
            email: email.into(),
            phone: "0100000000".into(),
            address: "Main St 1".into(),
            password: "S3curePass!".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(Arc::clone(&repo));
        svc.register_customer(register_input("a@b.com")).await.unwrap();
        let err = svc.register_customer(register_input("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(Arc::clone(&repo));
        svc.register_customer(register_input("a@b.com")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "a@b.com".into(), password: "wrong-pass".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn banned_user_cannot_login() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(Arc::clone(&repo));
        let user = svc.register_customer(register_input("a@b.com")).await.unwrap();
        repo.ban(user.id);
        let err = svc
            .login(LoginInput { email: "a@b.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Banned));
    }

    #[tokio::test]
    async fn provider_registration_requires_skills() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(Arc::clone(&repo));
        let err = svc
            .register_provider(RegisterProviderInput {
                account: register_input("p@b.com"),
                experience_years: 3,
                skills: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn logout_records_revocation() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(Arc::clone(&repo));
        svc.register_customer(register_input("a@b.com")).await.unwrap();
        let session = svc
            .login(LoginInput { email: "a@b.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap();
        let token = session.token.unwrap();
        svc.logout(&token).await.unwrap();

        let claims = TokenVerifier::new("test-secret").decode(&token).unwrap();
        assert!(repo.is_revoked(&claims.jti));
    }

    #[tokio::test]
    async fn logout_rejects_garbage_tokens() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo);
        assert!(matches!(svc.logout("garbage").await, Err(AuthError::TokenError(_))));
    }
}
