//! Route guard adapting the access pipeline to axum middleware.
//!
//! Each protected route group is layered with `require_access` carrying its
//! own `AccessPolicy`. On success the resolved `Principal` is inserted into
//! request extensions for handlers; on failure the typed rejection is
//! rendered before the handler ever runs.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use service::access::AccessPolicy;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Clone)]
pub struct Guard {
    pub state: ServerState,
    pub policy: AccessPolicy,
}

impl Guard {
    pub fn new(state: ServerState, policy: AccessPolicy) -> Self {
        Self { state, policy }
    }
}

pub async fn require_access(
    State(guard): State<Guard>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let principal = guard.state.access.authorize(authorization, &guard.policy).await?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
