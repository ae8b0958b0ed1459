use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::routes::{ok, ok_message};
use crate::state::ServerState;

pub async fn list(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    let services = models::service_offering::list_all(&state.db).await?;
    Ok(ok(services))
}

pub async fn categories(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    let categories = models::service_offering::list_categories(&state.db).await?;
    Ok(ok(categories))
}

pub async fn by_category(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let services = models::service_offering::list_by_category(&state.db, &category).await?;
    Ok(ok(services))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let service = models::service_offering::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;
    Ok(ok(service))
}

#[derive(Deserialize)]
pub struct CreateServiceInput {
    pub service_name: String,
    pub description: String,
    pub category: String,
    pub price_range: String,
    #[serde(default)]
    pub image_url: String,
}

pub async fn admin_create(
    State(state): State<ServerState>,
    Json(input): Json<CreateServiceInput>,
) -> Result<Json<Value>, ApiError> {
    let created = models::service_offering::create(
        &state.db,
        &input.service_name,
        &input.description,
        &input.category,
        &input.price_range,
        &input.image_url,
    )
    .await?;
    Ok(ok(created))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateServiceInput {
    pub service_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<String>,
    pub image_url: Option<String>,
}

pub async fn admin_update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateServiceInput>,
) -> Result<Json<Value>, ApiError> {
    let updated = models::service_offering::update(
        &state.db,
        id,
        input.service_name.as_deref(),
        input.description.as_deref(),
        input.category.as_deref(),
        input.price_range.as_deref(),
        input.image_url.as_deref(),
    )
    .await?;
    Ok(ok(updated))
}

pub async fn admin_delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    models::service_offering::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Service not found".into()))?;
    models::service_offering::hard_delete(&state.db, id).await?;
    Ok(ok_message("Service deleted"))
}
