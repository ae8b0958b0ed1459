use std::sync::Arc;

use sea_orm::DatabaseConnection;

use service::access::pipeline::AccessPipeline;
use service::access::store::seaorm::SeaOrmAccessStore;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::AuthService;
use service::payments::PaymentsService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub access: Arc<AccessPipeline<SeaOrmAccessStore>>,
    pub payments: Arc<PaymentsService>,
}
