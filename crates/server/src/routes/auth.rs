use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};

use service::auth::domain::{LoginInput, RegisterInput, RegisterProviderInput};

use crate::errors::ApiError;
use crate::routes::{ok, ok_message};
use crate::state::ServerState;

fn auth_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new("auth_token", token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.register_customer(input).await?;
    Ok(ok(json!({ "user": user })))
}

pub async fn register_provider(
    State(state): State<ServerState>,
    Json(input): Json<RegisterProviderInput>,
) -> Result<Json<Value>, ApiError> {
    let user = state.auth.register_provider(input).await?;
    Ok(ok(json!({ "user": user })))
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let session = state.auth.login(input).await?;
    let token = session
        .token
        .ok_or_else(|| ApiError::Internal("token generation failed".into()))?;
    let jar = jar.add(auth_cookie(token.clone()));
    let body = ok(json!({
        "user": session.user,
        "token": token,
        "expiresAt": session.expires_at,
    }));
    Ok((jar, body))
}

/// Revokes the presented credential. The bearer header is required; the
/// cookie alone is only a convenience transport for browsers.
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .or_else(|| jar.get("auth_token").map(|c| c.value().to_string()))
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))?;
    state.auth.logout(&token).await?;
    let jar = jar.remove(Cookie::from("auth_token"));
    Ok((jar, ok_message("Logged out")))
}
