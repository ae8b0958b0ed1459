use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use service::access::Principal;

use crate::errors::ApiError;
use crate::routes::{ok, ok_message, PageQuery};
use crate::state::ServerState;

pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Value>, ApiError> {
    let user = models::user::find_by_id(&state.db, principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(ok(user))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<UpdateProfileInput>,
) -> Result<Json<Value>, ApiError> {
    let updated = models::user::update_profile(
        &state.db,
        principal.id,
        input.name.as_deref(),
        input.phone.as_deref(),
        input.address.as_deref(),
    )
    .await?;
    Ok(ok(updated))
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

// Admin management of customer accounts

pub async fn admin_list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (page_idx, per_page) = query.pagination().normalize();
    let users =
        models::user::list_by_role(&state.db, "customer", page_idx * per_page, per_page).await?;
    Ok(ok(users))
}

pub async fn admin_get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = models::user::find_by_id(&state.db, id)
        .await?
        .filter(|u| u.role == "customer")
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;
    Ok(ok(user))
}

pub async fn admin_ban(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = models::user::set_status(&state.db, id, "banned").await?;
    Ok(ok(user))
}

pub async fn admin_activate(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = models::user::set_status(&state.db, id, "active").await?;
    Ok(ok(user))
}

pub async fn admin_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    models::user::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;
    models::user::hard_delete(&state.db, id).await?;
    Ok(ok_message("Customer deleted"))
}
