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
    let posts = models::work_post::list_all(&state.db).await?;
    Ok(ok(posts))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let post = models::work_post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Work post not found".into()))?;
    Ok(ok(post))
}

pub async fn list_for_provider(
    State(state): State<ServerState>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let posts = models::work_post::list_for_provider(&state.db, provider_id).await?;
    Ok(ok(posts))
}

async fn own_provider(
    state: &ServerState,
    principal: &Principal,
) -> Result<models::provider::Model, ApiError> {
    models::provider::find_by_user(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider profile not found".into()))
}

#[derive(Deserialize)]
pub struct CreateWorkPostInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub job_reference: Option<String>,
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateWorkPostInput>,
) -> Result<Json<Value>, ApiError> {
    let provider = own_provider(&state, &principal).await?;
    let created = models::work_post::create(
        &state.db,
        provider.id,
        &input.title,
        &input.description,
        &input.image_url,
        input.job_reference,
    )
    .await?;
    Ok(ok(created))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateWorkPostInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub job_reference: Option<Option<String>>,
}

/// Ownership check before any mutation; the gates only prove the caller is
/// an approved, subscribed provider, not that the post is theirs.
async fn owned_post(
    state: &ServerState,
    principal: &Principal,
    id: Uuid,
) -> Result<models::work_post::Model, ApiError> {
    let provider = own_provider(state, principal).await?;
    let post = models::work_post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Work post not found".into()))?;
    if post.provider_id != provider.id {
        return Err(ApiError::Forbidden("Work post belongs to another provider".into()));
    }
    Ok(post)
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateWorkPostInput>,
) -> Result<Json<Value>, ApiError> {
    owned_post(&state, &principal, id).await?;
    let updated = models::work_post::update(
        &state.db,
        id,
        input.title.as_deref(),
        input.description.as_deref(),
        input.image_url.as_deref(),
        input.job_reference,
    )
    .await?;
    Ok(ok(updated))
}

pub async fn remove(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    owned_post(&state, &principal, id).await?;
    models::work_post::hard_delete(&state.db, id).await?;
    Ok(ok_message("Work post deleted"))
}
