use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use service::access::Principal;

use crate::errors::ApiError;
use crate::routes::{ok, ok_message};
use crate::state::ServerState;

pub async fn list_all(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    let reviews = models::review::list_all(&state.db).await?;
    Ok(ok(reviews))
}

pub async fn list_for_provider(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let reviews = models::review::list_for_provider(&state.db, provider_id).await?;
    Ok(ok(reviews))
}

#[derive(Deserialize)]
pub struct CreateReviewInput {
    pub provider_id: Uuid,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Customers review providers; the reviewed provider must exist and be
/// publicly visible.
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateReviewInput>,
) -> Result<Json<Value>, ApiError> {
    models::provider::find_by_id(&state.db, input.provider_id)
        .await?
        .filter(|p| p.is_approved)
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    let created = models::review::create(
        &state.db,
        input.provider_id,
        principal.id,
        input.rating,
        &input.comment,
    )
    .await?;
    Ok(ok(created))
}

pub async fn admin_list(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    let reviews = models::review::list_all(&state.db).await?;
    Ok(ok(reviews))
}

pub async fn admin_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    models::review::hard_delete(&state.db, id).await?;
    Ok(ok_message("Review deleted"))
}
