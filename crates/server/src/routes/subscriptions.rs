use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use service::access::Principal;
use service::subscriptions;

use crate::errors::ApiError;
use crate::routes::{ok, ok_message, PageQuery};
use crate::state::ServerState;

/// Provider's own subscriptions, newest first.
pub async fn list_own(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::find_by_user(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider profile not found".into()))?;
    let subs = subscriptions::list_for_provider(&state.db, provider.id).await?;
    Ok(ok(subs))
}

pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let subs = subscriptions::list_all(&state.db, query.pagination()).await?;
    Ok(ok(subs))
}

#[derive(Deserialize)]
pub struct CreateSubscriptionInput {
    pub provider_id: Uuid,
    pub plan_name: String,
    pub amount: f64,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub renewal_date: Option<DateTime<Utc>>,
}

pub async fn admin_create(
    State(state): State<ServerState>,
    Json(input): Json<CreateSubscriptionInput>,
) -> Result<Json<Value>, ApiError> {
    models::provider::find_by_id(&state.db, input.provider_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    let created = subscriptions::create_subscription(
        &state.db,
        input.provider_id,
        &input.plan_name,
        input.amount,
        input.end_date,
        input.renewal_date,
    )
    .await?;
    Ok(ok(created))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateSubscriptionInput {
    pub plan_name: Option<String>,
    pub status: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub renewal_date: Option<DateTime<Utc>>,
}

pub async fn admin_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSubscriptionInput>,
) -> Result<Json<Value>, ApiError> {
    let updated = subscriptions::update_subscription(
        &state.db,
        id,
        input.plan_name.as_deref(),
        input.status.as_deref(),
        input.end_date,
        input.renewal_date,
    )
    .await?;
    Ok(ok(updated))
}

pub async fn admin_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    subscriptions::delete_subscription(&state.db, id).await?;
    Ok(ok_message("Subscription deleted"))
}
