use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;
use service::access::{AccessPolicy, Gate, Role};

use crate::guard::{self, Guard};
use crate::state::ServerState;

pub mod auth;
pub mod customers;
pub mod payments;
pub mod providers;
pub mod reviews;
pub mod services;
pub mod subscriptions;
pub mod work_posts;

// Route policies, built once with the route table. Gate order is the
// evaluation order.
pub const ANY_AUTHENTICATED: AccessPolicy =
    AccessPolicy::new(&[Role::Customer, Role::Provider, Role::Admin], &[]);
pub const CUSTOMER_ONLY: AccessPolicy = AccessPolicy::new(&[Role::Customer], &[]);
pub const PROVIDER_ONLY: AccessPolicy = AccessPolicy::new(&[Role::Provider], &[]);
pub const PROVIDER_APPROVED: AccessPolicy =
    AccessPolicy::new(&[Role::Provider], &[Gate::ProviderApproved]);
pub const PROVIDER_PUBLISHING: AccessPolicy =
    AccessPolicy::new(&[Role::Provider], &[Gate::ProviderApproved, Gate::ActiveSubscription]);
pub const ADMIN_ONLY: AccessPolicy = AccessPolicy::new(&[Role::Admin], &[]);

/// Common pagination query parameters.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub(crate) struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub(crate) fn pagination(&self) -> service::pagination::Pagination {
        service::pagination::Pagination::from_params(self.page, self.per_page)
    }
}

/// Success envelope with a data payload.
pub(crate) fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "statusCode": 200, "data": data }))
}

/// Success envelope with only a message.
pub(crate) fn ok_message(message: &str) -> Json<Value> {
    Json(json!({ "success": true, "statusCode": 200, "message": message }))
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn welcome() -> Json<Value> {
    Json(json!({ "success": true, "statusCode": 200, "message": "ServiHub marketplace API" }))
}

fn protect(router: Router<ServerState>, state: &ServerState, policy: AccessPolicy) -> Router<ServerState> {
    router.route_layer(middleware::from_fn_with_state(
        Guard::new(state.clone(), policy),
        guard::require_access,
    ))
}

/// Build the full application router. The route table and its policies are
/// fixed here at startup and never change afterwards.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/api/services", get(services::list))
        .route("/api/services/categories", get(services::categories))
        .route("/api/services/categories/:category", get(services::by_category))
        .route("/api/services/:id", get(services::get_one))
        .route("/api/providers/public", get(providers::list_public))
        .route("/api/providers/public/:id", get(providers::get_public))
        .route("/api/providers/check-approval/:id", get(providers::check_approval))
        .route("/api/reviews", get(reviews::list_all))
        .route("/api/reviews/:provider_id", get(reviews::list_for_provider))
        .route("/api/payments/webhook", post(payments::webhook));

    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/register/provider", post(auth::register_provider))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    let customer = protect(
        Router::new()
            .route(
                "/api/customers/profile",
                get(customers::get_profile).put(customers::update_profile),
            )
            .route(
                "/api/customers/profile/image",
                patch(customers::set_profile_image).delete(customers::delete_profile_image),
            )
            .route("/api/customers/reviews", post(reviews::create)),
        &state,
        CUSTOMER_ONLY,
    );

    let provider = protect(
        Router::new()
            .route(
                "/api/providers/profile",
                get(providers::get_profile).put(providers::update_profile),
            )
            .route(
                "/api/providers/profile/image",
                patch(providers::set_profile_image).delete(providers::delete_profile_image),
            )
            .route("/api/providers/subscriptions", get(subscriptions::list_own)),
        &state,
        PROVIDER_APPROVED,
    );

    let work_post_reads = protect(
        Router::new()
            .route("/api/work-posts", get(work_posts::list_all))
            .route("/api/work-posts/:id", get(work_posts::get_one))
            .route("/api/work-posts/provider/:provider_id", get(work_posts::list_for_provider)),
        &state,
        ANY_AUTHENTICATED,
    );

    // Publishing requires approval plus a paid plan
    let work_post_writes = protect(
        Router::new()
            .route("/api/providers/work-posts", post(work_posts::create))
            .route(
                "/api/providers/work-posts/:id",
                put(work_posts::update).delete(work_posts::remove),
            ),
        &state,
        PROVIDER_PUBLISHING,
    );

    // No gates here: a provider has to be able to pay before the
    // subscription gate could ever pass
    let payment_routes = protect(
        Router::new()
            .route("/api/payments/subscriptions", post(payments::start_subscription))
            .route("/api/payments/checkout-session", post(payments::create_checkout_session))
            .route("/api/payments/subscription-status", get(payments::subscription_status)),
        &state,
        PROVIDER_ONLY,
    );

    let admin = protect(
        Router::new()
            .route("/api/admin/providers", get(providers::admin_list))
            .route("/api/admin/providers/pending", get(providers::admin_list_pending))
            .route(
                "/api/admin/providers/:id",
                get(providers::admin_get).delete(providers::admin_delete),
            )
            .route("/api/admin/providers/:id/approve", patch(providers::admin_approve))
            .route("/api/admin/providers/:id/reject", patch(providers::admin_reject))
            .route("/api/admin/providers/:id/ban", patch(providers::admin_ban))
            .route("/api/admin/providers/:id/activate", patch(providers::admin_activate))
            .route("/api/admin/customers", get(customers::admin_list))
            .route(
                "/api/admin/customers/:id",
                get(customers::admin_get).delete(customers::admin_delete),
            )
            .route("/api/admin/customers/:id/ban", patch(customers::admin_ban))
            .route("/api/admin/customers/:id/activate", patch(customers::admin_activate))
            .route(
                "/api/admin/subscriptions",
                get(subscriptions::admin_list).post(subscriptions::admin_create),
            )
            .route(
                "/api/admin/subscriptions/:id",
                put(subscriptions::admin_update).delete(subscriptions::admin_delete),
            )
            .route("/api/admin/reviews", get(reviews::admin_list))
            .route("/api/admin/reviews/:id", delete(reviews::admin_delete))
            .route("/api/admin/services", post(services::admin_create))
            .route(
                "/api/admin/services/:id",
                put(services::admin_update).delete(services::admin_delete),
            ),
        &state,
        ADMIN_ONLY,
    );

    public
        .merge(auth_routes)
        .merge(customer)
        .merge(provider)
        .merge(work_post_reads)
        .merge(work_post_writes)
        .merge(payment_routes)
        .merge(admin)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
