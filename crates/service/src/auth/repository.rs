use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, NewUser};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError>;
    async fn create_provider_profile(
        &self,
        user_id: Uuid,
        experience_years: i32,
        skills: &[String],
    ) -> Result<(), AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn is_banned(&self, user_id: Uuid) -> Result<bool, AuthError>;

    /// Record a credential as invalidated until its natural expiry.
    async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
        providers: Mutex<HashMap<Uuid, (i32, Vec<String>)>>,
        banned: Mutex<HashSet<Uuid>>,
        revoked: Mutex<HashMap<String, DateTime<Utc>>>,
    }

    impl MockAuthRepository {
        pub fn ban(&self, user_id: Uuid) {
            self.banned.lock().unwrap().insert(user_id);
        }

        pub fn is_revoked(&self, jti: &str) -> bool {
            self.revoked.lock().unwrap().contains_key(jti)
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&email.to_lowercase()).cloned())
        }

        async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError> {
            let email = input.email.to_lowercase();
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                name: input.name,
                email: email.clone(),
                role: input.role,
            };
            users.insert(email, user.clone());
            self.creds.lock().unwrap().insert(
                user.id,
                Credentials { user_id: user.id, password_hash: input.password_hash },
            );
            Ok(user)
        }

        async fn create_provider_profile(
            &self,
            user_id: Uuid,
            experience_years: i32,
            skills: &[String],
        ) -> Result<(), AuthError> {
            self.providers
                .lock()
                .unwrap()
                .insert(user_id, (experience_years, skills.to_vec()));
            Ok(())
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn is_banned(&self, user_id: Uuid) -> Result<bool, AuthError> {
            Ok(self.banned.lock().unwrap().contains(&user_id))
        }

        async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
            self.revoked.lock().unwrap().insert(jti.to_string(), expires_at);
            Ok(())
        }
    }
}
