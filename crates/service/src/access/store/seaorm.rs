use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::{AccessStore, ProviderState, SubscriptionState};
use crate::access::errors::AccessError;

/// SeaORM-backed store used by the running server.
pub struct SeaOrmAccessStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl AccessStore for SeaOrmAccessStore {
    async fn is_token_revoked(&self, jti: &str) -> Result<bool, AccessError> {
        models::revoked_token::exists(&self.db, jti)
            .await
            .map_err(|e| AccessError::Store(e.to_string()))
    }

    async fn provider_state(&self, user_id: Uuid) -> Result<Option<ProviderState>, AccessError> {
        let found = models::provider::find_by_user(&self.db, user_id)
            .await
            .map_err(|e| AccessError::Store(e.to_string()))?;
        Ok(found.map(|p| ProviderState { id: p.id, approved: p.is_approved }))
    }

    async fn subscription_states(&self, provider_id: Uuid) -> Result<Vec<SubscriptionState>, AccessError> {
        let subs = models::subscription::list_for_provider(&self.db, provider_id)
            .await
            .map_err(|e| AccessError::Store(e.to_string()))?;
        Ok(subs
            .into_iter()
            .map(|s| SubscriptionState {
                status: s.status,
                payment_status: s.payment_status,
                end_date: s.end_date.to_utc(),
            })
            .collect())
    }
}
