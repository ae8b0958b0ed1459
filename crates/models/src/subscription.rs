use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, provider};

pub const PLAN_NAMES: [&str; 3] = ["Free", "Standard", "Premium"];
pub const STATUSES: [&str; 3] = ["Active", "Expired", "Cancelled"];
pub const PAYMENT_STATUSES: [&str; 4] = ["pending", "paid", "failed", "refunded"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    pub plan_name: String,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub renewal_date: Option<DateTimeWithTimeZone>,
    pub status: String,
    pub amount: f64,
    pub payment_status: String,
    pub stripe_payment_intent_id: Option<String>,
    pub stripe_checkout_session_id: Option<String>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_plan_name(plan: &str) -> Result<(), errors::ModelError> {
    if !PLAN_NAMES.contains(&plan) {
        return Err(errors::ModelError::Validation("invalid plan name".into()));
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), errors::ModelError> {
    if amount < 0.0 {
        return Err(errors::ModelError::Validation("amount cannot be negative".into()));
    }
    Ok(())
}

/// Insert a new subscription row. Status starts `Active` with payment
/// `pending`; it only counts for gating once the payment flow marks it paid.
/// Rows are never flipped to `Expired` on write; expiry is judged against
/// `end_date` at read time.
pub async fn create(
    db: &DatabaseConnection,
    provider_id: Uuid,
    plan_name: &str,
    amount: f64,
    end_date: DateTimeWithTimeZone,
    renewal_date: Option<DateTimeWithTimeZone>,
) -> Result<Model, errors::ModelError> {
    validate_plan_name(plan_name)?;
    validate_amount(amount)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        plan_name: Set(plan_name.to_string()),
        start_date: Set(now),
        end_date: Set(end_date),
        renewal_date: Set(renewal_date),
        status: Set("Active".into()),
        amount: Set(amount),
        payment_status: Set("pending".into()),
        stripe_payment_intent_id: Set(None),
        stripe_checkout_session_id: Set(None),
        paid_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All subscriptions of one provider, newest first.
pub async fn list_for_provider(db: &DatabaseConnection, provider_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::ProviderId.eq(provider_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Mark a subscription paid after the payment processor confirms it.
pub async fn mark_paid(db: &DatabaseConnection, id: Uuid) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("subscription not found".into()))?
        .into();
    let now = Utc::now().into();
    am.payment_status = Set("paid".into());
    am.status = Set("Active".into());
    am.paid_at = Set(Some(now));
    am.updated_at = Set(now);
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All subscriptions across providers, newest first, paginated.
pub async fn list_all(
    db: &DatabaseConnection,
    offset: u64,
    limit: u64,
) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_desc(Column::CreatedAt)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Attach the checkout session created for this subscription's payment.
pub async fn set_checkout_session(
    db: &DatabaseConnection,
    id: Uuid,
    session_id: &str,
) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("subscription not found".into()))?
        .into();
    am.stripe_checkout_session_id = Set(Some(session_id.to_string()));
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Change mutable plan fields. Payment bookkeeping goes through
/// `mark_paid` and `set_checkout_session`, not here.
pub async fn update_plan(
    db: &DatabaseConnection,
    id: Uuid,
    plan_name: Option<&str>,
    status: Option<&str>,
    end_date: Option<DateTimeWithTimeZone>,
    renewal_date: Option<DateTimeWithTimeZone>,
) -> Result<Model, errors::ModelError> {
    if let Some(p) = plan_name {
        validate_plan_name(p)?;
    }
    if let Some(s) = status {
        if !STATUSES.contains(&s) {
            return Err(errors::ModelError::Validation("invalid status".into()));
        }
    }
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("subscription not found".into()))?
        .into();
    if let Some(p) = plan_name {
        am.plan_name = Set(p.to_string());
    }
    if let Some(s) = status {
        am.status = Set(s.to_string());
    }
    if let Some(e) = end_date {
        am.end_date = Set(e);
    }
    if renewal_date.is_some() {
        am.renewal_date = Set(renewal_date);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_name_closed_set() {
        assert!(validate_plan_name("Free").is_ok());
        assert!(validate_plan_name("Premium").is_ok());
        assert!(validate_plan_name("Platinum").is_err());
    }

    #[test]
    fn negative_amount_rejected() {
        assert!(validate_amount(-0.01).is_err());
        assert!(validate_amount(0.0).is_ok());
    }
}
