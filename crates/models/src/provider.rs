use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, user};

pub const AVAILABILITY_STATUSES: [&str; 2] = ["Available", "Unavailable"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub experience_years: i32,
    pub skills: Json,
    pub availability_status: String,
    pub rating: f64,
    pub is_approved: bool,
    pub stripe_customer_id: Option<String>,
    pub current_subscription_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_skills(skills: &[String]) -> Result<(), errors::ModelError> {
    if skills.is_empty() {
        return Err(errors::ModelError::Validation("at least one skill is required".into()));
    }
    Ok(())
}

pub fn validate_experience_years(years: i32) -> Result<(), errors::ModelError> {
    if years < 0 {
        return Err(errors::ModelError::Validation("experience cannot be negative".into()));
    }
    Ok(())
}

/// Create a provider profile for an existing user. New providers start
/// unapproved and must pass admin review before the approval gate opens.
pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    experience_years: i32,
    skills: &[String],
) -> Result<Model, errors::ModelError> {
    validate_experience_years(experience_years)?;
    validate_skills(skills)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        experience_years: Set(experience_years),
        skills: Set(serde_json::json!(skills)),
        availability_status: Set("Available".into()),
        rating: Set(0.0),
        is_approved: Set(false),
        stripe_customer_id: Set(None),
        current_subscription_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Providers filtered by approval state, newest first, paginated.
/// `approved = None` lists every profile.
pub async fn list(
    db: &DatabaseConnection,
    approved: Option<bool>,
    offset: u64,
    limit: u64,
) -> Result<Vec<Model>, errors::ModelError> {
    let mut q = Entity::find();
    if let Some(flag) = approved {
        q = q.filter(Column::IsApproved.eq(flag));
    }
    q.order_by_desc(Column::CreatedAt)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Update the provider-owned profile fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    experience_years: Option<i32>,
    skills: Option<&[String]>,
    availability_status: Option<&str>,
) -> Result<Model, errors::ModelError> {
    if let Some(y) = experience_years {
        validate_experience_years(y)?;
    }
    if let Some(s) = skills {
        validate_skills(s)?;
    }
    if let Some(a) = availability_status {
        if !AVAILABILITY_STATUSES.contains(&a) {
            return Err(errors::ModelError::Validation("invalid availability status".into()));
        }
    }
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("provider not found".into()))?
        .into();
    if let Some(y) = experience_years {
        am.experience_years = Set(y);
    }
    if let Some(s) = skills {
        am.skills = Set(serde_json::json!(s));
    }
    if let Some(a) = availability_status {
        am.availability_status = Set(a.to_string());
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn set_approved(db: &DatabaseConnection, id: Uuid, approved: bool) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("provider not found".into()))?
        .into();
    am.is_approved = Set(approved);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Remember the payment processor's customer handle for this provider.
pub async fn set_stripe_customer(
    db: &DatabaseConnection,
    id: Uuid,
    customer_id: &str,
) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("provider not found".into()))?
        .into();
    am.stripe_customer_id = Set(Some(customer_id.to_string()));
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Point the provider at the subscription that currently covers it.
pub async fn set_current_subscription(
    db: &DatabaseConnection,
    id: Uuid,
    subscription_id: Option<Uuid>,
) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("provider not found".into()))?
        .into();
    am.current_subscription_id = Set(subscription_id);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skills_must_not_be_empty() {
        assert!(validate_skills(&[]).is_err());
        assert!(validate_skills(&["plumbing".into()]).is_ok());
    }

    #[test]
    fn experience_must_be_non_negative() {
        assert!(validate_experience_years(-1).is_err());
        assert!(validate_experience_years(0).is_ok());
    }
}
