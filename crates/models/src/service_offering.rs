use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_offering")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_name: String,
    pub description: String,
    pub category: String,
    pub price_range: String,
    pub image_url: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(
    db: &DatabaseConnection,
    service_name: &str,
    description: &str,
    category: &str,
    price_range: &str,
    image_url: &str,
) -> Result<Model, errors::ModelError> {
    if service_name.trim().is_empty() {
        return Err(errors::ModelError::Validation("service name required".into()));
    }
    if category.trim().is_empty() {
        return Err(errors::ModelError::Validation("category required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        service_name: Set(service_name.trim().to_string()),
        description: Set(description.to_string()),
        category: Set(category.to_string()),
        price_range: Set(price_range.to_string()),
        image_url: Set(image_url.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Whole catalog, alphabetical by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::ServiceName)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Distinct catalog categories.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<String>, errors::ModelError> {
    Entity::find()
        .select_only()
        .column(Column::Category)
        .distinct()
        .order_by_asc(Column::Category)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list_by_category(db: &DatabaseConnection, category: &str) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Category.eq(category))
        .order_by_asc(Column::ServiceName)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    service_name: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    price_range: Option<&str>,
    image_url: Option<&str>,
) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("service not found".into()))?
        .into();
    if let Some(v) = service_name {
        if v.trim().is_empty() {
            return Err(errors::ModelError::Validation("service name required".into()));
        }
        am.service_name = Set(v.trim().to_string());
    }
    if let Some(v) = description {
        am.description = Set(v.to_string());
    }
    if let Some(v) = category {
        am.category = Set(v.to_string());
    }
    if let Some(v) = price_range {
        am.price_range = Set(v.to_string());
    }
    if let Some(v) = image_url {
        am.image_url = Set(v.to_string());
    }
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
