//! Subscription plan management for providers.
//!
//! Creation, listing and plan changes live here; payment confirmation is
//! driven by the payments module which calls back into `models` directly.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Condensed view of where a provider stands with its plans.
#[derive(Debug, Serialize)]
pub struct SubscriptionStatus {
    pub has_active_subscription: bool,
    pub active: Option<models::subscription::Model>,
    pub pending: Option<models::subscription::Model>,
    pub all: Vec<models::subscription::Model>,
}

fn is_active(s: &models::subscription::Model, now: DateTime<Utc>) -> bool {
    s.status == "Active" && s.payment_status == "paid" && s.end_date.to_utc() > now
}

/// Create a subscription for a known provider id.
#[instrument(skip(db))]
pub async fn create_subscription(
    db: &DatabaseConnection,
    provider_id: Uuid,
    plan_name: &str,
    amount: f64,
    end_date: DateTime<Utc>,
    renewal_date: Option<DateTime<Utc>>,
) -> Result<models::subscription::Model, ServiceError> {
    if end_date <= Utc::now() {
        return Err(ServiceError::Validation("end date must be in the future".into()));
    }
    let created = models::subscription::create(
        db,
        provider_id,
        plan_name,
        amount,
        end_date.into(),
        renewal_date.map(Into::into),
    )
    .await?;
    info!(subscription_id = %created.id, %provider_id, plan = plan_name, "subscription_created");
    Ok(created)
}

/// Create a subscription for the provider owned by `user_id`.
///
/// Resolves the provider profile first so callers holding only the
/// authenticated user id never need to know provider row ids.
#[instrument(skip(db))]
pub async fn create_provider_subscription(
    db: &DatabaseConnection,
    user_id: Uuid,
    plan_name: &str,
    amount: f64,
    end_date: DateTime<Utc>,
    renewal_date: Option<DateTime<Utc>>,
) -> Result<models::subscription::Model, ServiceError> {
    let provider = models::provider::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("provider"))?;
    create_subscription(db, provider.id, plan_name, amount, end_date, renewal_date).await
}

/// List subscriptions across all providers, newest first.
#[instrument(skip(db))]
pub async fn list_all(
    db: &DatabaseConnection,
    pagination: Pagination,
) -> Result<Vec<models::subscription::Model>, ServiceError> {
    let (page_idx, per_page) = pagination.normalize();
    Ok(models::subscription::list_all(db, page_idx * per_page, per_page).await?)
}

/// List subscriptions belonging to one provider.
#[instrument(skip(db))]
pub async fn list_for_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<models::subscription::Model>, ServiceError> {
    Ok(models::subscription::list_for_provider(db, provider_id).await?)
}

#[instrument(skip(db))]
pub async fn get_subscription(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<models::subscription::Model, ServiceError> {
    models::subscription::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("subscription"))
}

/// Change plan fields on an existing subscription.
#[instrument(skip(db))]
pub async fn update_subscription(
    db: &DatabaseConnection,
    id: Uuid,
    plan_name: Option<&str>,
    status: Option<&str>,
    end_date: Option<DateTime<Utc>>,
    renewal_date: Option<DateTime<Utc>>,
) -> Result<models::subscription::Model, ServiceError> {
    let updated = models::subscription::update_plan(
        db,
        id,
        plan_name,
        status,
        end_date.map(Into::into),
        renewal_date.map(Into::into),
    )
    .await?;
    info!(subscription_id = %id, "subscription_updated");
    Ok(updated)
}

#[instrument(skip(db))]
pub async fn delete_subscription(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    models::subscription::find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("subscription"))?;
    models::subscription::hard_delete(db, id).await?;
    info!(subscription_id = %id, "subscription_deleted");
    Ok(())
}

/// Status summary for the provider owned by `user_id`.
///
/// "Active" means the same thing the subscription gate checks: status
/// `Active`, payment `paid`, and `end_date` still in the future.
#[instrument(skip(db))]
pub async fn subscription_status(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<SubscriptionStatus, ServiceError> {
    let provider = models::provider::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("provider"))?;
    let all = models::subscription::list_for_provider(db, provider.id).await?;
    let now = Utc::now();
    let active = all.iter().find(|s| is_active(s, now)).cloned();
    let pending = all.iter().find(|s| s.payment_status == "pending").cloned();
    debug!(provider_id = %provider.id, total = all.len(), has_active = active.is_some(), "subscription_status");
    Ok(SubscriptionStatus { has_active_subscription: active.is_some(), active, pending, all })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sub(status: &str, payment: &str, ends_in_hours: i64) -> models::subscription::Model {
        let now = Utc::now();
        models::subscription::Model {
            id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            plan_name: "Standard".into(),
            start_date: now.into(),
            end_date: (now + Duration::hours(ends_in_hours)).into(),
            renewal_date: None,
            status: status.into(),
            amount: 29.0,
            payment_status: payment.into(),
            stripe_payment_intent_id: None,
            stripe_checkout_session_id: None,
            paid_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn active_requires_all_three_conditions() {
        let now = Utc::now();
        assert!(is_active(&sub("Active", "paid", 24), now));
        assert!(!is_active(&sub("Active", "pending", 24), now));
        assert!(!is_active(&sub("Cancelled", "paid", 24), now));
        assert!(!is_active(&sub("Active", "paid", -1), now));
    }

    #[tokio::test]
    async fn status_reflects_payment_lifecycle() -> anyhow::Result<()> {
        if crate::test_support::skip_db_tests() {
            return Ok(());
        }
        let db = crate::test_support::get_db().await?;
        let user = models::user::create(
            &db,
            "Status Provider",
            &format!("status_{}@example.com", Uuid::new_v4()),
            "0100000000",
            "provider",
            "Main St 1",
            "not-a-real-hash",
        )
        .await?;
        let provider = models::provider::create(&db, user.id, 2, &["plumbing".into()]).await?;

        let created = create_provider_subscription(
            &db,
            user.id,
            "Standard",
            29.0,
            Utc::now() + Duration::days(30),
            None,
        )
        .await?;

        // pending until the payment flow settles it
        let status = subscription_status(&db, user.id).await?;
        assert!(!status.has_active_subscription);
        assert_eq!(status.pending.as_ref().map(|s| s.id), Some(created.id));

        models::subscription::mark_paid(&db, created.id).await?;
        let status = subscription_status(&db, user.id).await?;
        assert!(status.has_active_subscription);
        assert_eq!(status.active.as_ref().map(|s| s.id), Some(created.id));
        assert_eq!(status.active.as_ref().map(|s| s.provider_id), Some(provider.id));
        Ok(())
    }
}
