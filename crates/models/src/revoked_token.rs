use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// Revocation record for a credential invalidated before its natural
/// expiry (logout). Append-only; consulted on every token resolution.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revoked_token")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub jti: String,
    pub expires_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn insert(
    db: &DatabaseConnection,
    jti: &str,
    expires_at: DateTimeWithTimeZone,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        jti: Set(jti.to_string()),
        expires_at: Set(expires_at),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Point lookup by credential identifier.
pub async fn exists(db: &DatabaseConnection, jti: &str) -> Result<bool, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Jti.eq(jti))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Drop records whose credential has expired anyway; stands in for a
/// document-store TTL index.
pub async fn purge_expired(db: &DatabaseConnection) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::ExpiresAt.lt(Utc::now()))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
