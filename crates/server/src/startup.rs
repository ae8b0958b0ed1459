use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::access::pipeline::AccessPipeline;
use service::access::principal::TokenVerifier;
use service::access::store::seaorm::SeaOrmAccessStore;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::payments::{PaymentsService, SignatureVerifier, StripeCheckoutClient};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Host/port from config.toml, falling back to env vars.
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => (cfg.server.host, cfg.server.port),
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            cfg.auth.normalize_from_env();
            cfg.payments.normalize_from_env();
            cfg
        }
    }
}

/// Build shared state: DB pool, auth service, access pipeline, payments.
pub async fn build_state(cfg: &configs::AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect().await?;

    let jwt_secret = if cfg.auth.jwt_secret.is_empty() {
        env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string())
    } else {
        cfg.auth.jwt_secret.clone()
    };

    let auth_repo = Arc::new(SeaOrmAuthRepository { db: db.clone() });
    let auth = Arc::new(AuthService::new(
        auth_repo,
        AuthConfig {
            jwt_secret: Some(jwt_secret.clone()),
            token_ttl_hours: cfg.auth.token_ttl_hours,
        },
    ));

    let access_store = Arc::new(SeaOrmAccessStore { db: db.clone() });
    let access = Arc::new(AccessPipeline::new(TokenVerifier::new(&jwt_secret), access_store));

    let checkout = Arc::new(StripeCheckoutClient::new(
        cfg.payments.secret_key.clone(),
        cfg.payments.client_url.clone(),
    ));
    let payments = Arc::new(PaymentsService::new(
        db.clone(),
        SignatureVerifier::new(cfg.payments.webhook_secret.clone()),
        checkout,
    ));

    Ok(ServerState { db, auth, access, payments })
}

/// Public entry: build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    common::env::ensure_env("data").await?;

    let cfg = load_config();
    let state = build_state(&cfg).await?;

    let app: Router = routes::build_router(build_cors(), state);

    let addr = load_bind_addr()?;
    info!(%addr, "starting marketplace API");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
