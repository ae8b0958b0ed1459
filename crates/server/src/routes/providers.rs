use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use service::access::Principal;

use crate::errors::ApiError;
use crate::routes::{ok, ok_message, PageQuery};
use crate::state::ServerState;

// Public directory: only approved providers are visible

pub async fn list_public(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (page_idx, per_page) = query.pagination().normalize();
    let providers =
        models::provider::list(&state.db, Some(true), page_idx * per_page, per_page).await?;
    Ok(ok(providers))
}

pub async fn get_public(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::find_by_id(&state.db, id)
        .await?
        .filter(|p| p.is_approved)
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    let reviews = models::review::list_for_provider(&state.db, provider.id).await?;
    Ok(ok(json!({ "provider": provider, "reviews": reviews })))
}

pub async fn check_approval(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    Ok(ok(json!({ "isApproved": provider.is_approved })))
}

// Provider self-service (behind the approval gate)

async fn own_provider(
    state: &ServerState,
    principal: &Principal,
) -> Result<models::provider::Model, ApiError> {
    models::provider::find_by_user(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider profile not found".into()))
}

pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, ApiError> {
    let provider = own_provider(&state, &principal).await?;
    let user = models::user::find_by_id(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(ok(json!({ "user": user, "provider": provider })))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateProviderProfileInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub experience_years: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub availability_status: Option<String>,
}

pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<UpdateProviderProfileInput>,
) -> Result<Json<Value>, ApiError> {
    let provider = own_provider(&state, &principal).await?;
    let user = if input.name.is_some() || input.phone.is_some() || input.address.is_some() {
        models::user::update_profile(
            &state.db,
            principal.id,
            input.name.as_deref(),
            input.phone.as_deref(),
            input.address.as_deref(),
        )
        .await?
    } else {
        models::user::find_by_id(&state.db, principal.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?
    };
    let provider = models::provider::update_profile(
        &state.db,
        provider.id,
        input.experience_years,
        input.skills.as_deref(),
        input.availability_status.as_deref(),
    )
    .await?;
    Ok(ok(json!({ "user": user, "provider": provider })))
}

#[derive(Deserialize)]
pub struct ProfileImageInput {
    pub profile_image: String,
}

pub async fn set_profile_image(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<ProfileImageInput>,
) -> Result<Json<Value>, ApiError> {
    let updated =
        models::user::set_profile_image(&state.db, principal.id, Some(input.profile_image)).await?;
    Ok(ok(updated))
}

pub async fn delete_profile_image(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, ApiError> {
    let updated = models::user::set_profile_image(&state.db, principal.id, None).await?;
    Ok(ok(updated))
}

// Admin management

pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (page_idx, per_page) = query.pagination().normalize();
    let providers = models::provider::list(&state.db, None, page_idx * per_page, per_page).await?;
    Ok(ok(providers))
}

pub async fn admin_list_pending(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (page_idx, per_page) = query.pagination().normalize();
    let providers =
        models::provider::list(&state.db, Some(false), page_idx * per_page, per_page).await?;
    Ok(ok(providers))
}

pub async fn admin_get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    let user = models::user::find_by_id(&state.db, provider.user_id).await?;
    Ok(ok(json!({ "provider": provider, "user": user })))
}

pub async fn admin_approve(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::set_approved(&state.db, id, true).await?;
    Ok(ok(provider))
}

pub async fn admin_reject(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::set_approved(&state.db, id, false).await?;
    Ok(ok(provider))
}

pub async fn admin_ban(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    let user = models::user::set_status(&state.db, provider.user_id, "banned").await?;
    Ok(ok(user))
}

pub async fn admin_activate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let provider = models::provider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    let user = models::user::set_status(&state.db, provider.user_id, "active").await?;
    Ok(ok(user))
}

pub async fn admin_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    models::provider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".into()))?;
    models::provider::hard_delete(&state.db, id).await?;
    Ok(ok_message("Provider deleted"))
}
