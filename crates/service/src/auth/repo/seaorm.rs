use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::access::Role;
use crate::auth::domain::{AuthUser, Credentials, NewUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn to_auth_user(u: models::user::Model) -> Result<AuthUser, AuthError> {
    let role = u
        .role
        .parse::<Role>()
        .map_err(|_| AuthError::Repository(format!("unknown role in store: {}", u.role)))?;
    Ok(AuthUser { id: u.id, name: u.name, email: u.email, role })
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let found = models::user::find_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        found.map(to_auth_user).transpose()
    }

    async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError> {
        let created = models::user::create(
            &self.db,
            &input.name,
            &input.email,
            &input.phone,
            input.role.as_str(),
            &input.address,
            &input.password_hash,
        )
        .await
        .map_err(|e| AuthError::Validation(e.to_string()))?;
        to_auth_user(created)
    }

    async fn create_provider_profile(
        &self,
        user_id: Uuid,
        experience_years: i32,
        skills: &[String],
    ) -> Result<(), AuthError> {
        models::provider::create(&self.db, user_id, experience_years, skills)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let found = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }

    async fn is_banned(&self, user_id: Uuid) -> Result<bool, AuthError> {
        let found = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(found.map(|u| u.status == "banned").unwrap_or(false))
    }

    async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        models::revoked_token::insert(&self.db, jti, expires_at.into())
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(())
    }
}
