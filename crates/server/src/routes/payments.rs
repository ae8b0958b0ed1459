use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use service::access::Principal;
use service::subscriptions;

use crate::errors::ApiError;
use crate::routes::{ok, ok_message};
use crate::state::ServerState;

/// Raw-body webhook endpoint. Signature verification runs on the exact
/// bytes received, before any JSON parsing.
pub async fn webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing signature header".into()))?;
    state.payments.handle_webhook(&body, signature).await?;
    Ok(ok_message("Received"))
}

#[derive(Deserialize)]
pub struct StartSubscriptionInput {
    pub plan_name: String,
    pub amount: f64,
    /// Plan length; defaults to 30 days.
    #[serde(default)]
    pub duration_days: Option<i64>,
}

/// Create a pending subscription for the calling provider. Payment (and
/// with it the subscription gate) is settled by the checkout + webhook flow.
pub async fn start_subscription(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<StartSubscriptionInput>,
) -> Result<Json<Value>, ApiError> {
    let end_date = Utc::now() + Duration::days(input.duration_days.unwrap_or(30));
    let created = subscriptions::create_provider_subscription(
        &state.db,
        principal.id,
        &input.plan_name,
        input.amount,
        end_date,
        None,
    )
    .await?;
    Ok(ok(created))
}

#[derive(Deserialize)]
pub struct CheckoutInput {
    pub subscription_id: Uuid,
}

pub async fn create_checkout_session(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CheckoutInput>,
) -> Result<Json<Value>, ApiError> {
    let session = state
        .payments
        .create_subscription_checkout(principal.id, input.subscription_id)
        .await?;
    Ok(ok(json!({ "sessionId": session.id, "url": session.url })))
}

pub async fn subscription_status(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, ApiError> {
    let status = subscriptions::subscription_status(&state.db, principal.id).await?;
    Ok(ok(status))
}
