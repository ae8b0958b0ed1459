use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::AccessError;

pub mod seaorm;

/// Snapshot of a provider's gating-relevant state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderState {
    /// Provider record id (distinct from the account's user id).
    pub id: Uuid,
    pub approved: bool,
}

/// Snapshot of one subscription row, as read by the subscription gate.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionState {
    pub status: String,
    pub payment_status: String,
    pub end_date: DateTime<Utc>,
}

/// Read-only persistence seam for the gating pipeline: a revocation-record
/// point lookup and the resource-state fetches the gates run. All lookups
/// are bounded single reads; the pipeline never writes through this trait.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn is_token_revoked(&self, jti: &str) -> Result<bool, AccessError>;
    async fn provider_state(&self, user_id: Uuid) -> Result<Option<ProviderState>, AccessError>;
    async fn subscription_states(&self, provider_id: Uuid) -> Result<Vec<SubscriptionState>, AccessError>;
}

/// In-memory store for tests and doc examples.
pub mod mock {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MockAccessStore {
        revoked: Mutex<HashSet<String>>,
        providers: Mutex<HashMap<Uuid, ProviderState>>,
        subscriptions: Mutex<HashMap<Uuid, Vec<SubscriptionState>>>,
        lookups: AtomicUsize,
    }

    impl MockAccessStore {
        pub fn revoke(&self, jti: &str) {
            self.revoked.lock().unwrap().insert(jti.to_string());
        }

        pub fn put_provider(&self, user_id: Uuid, state: ProviderState) {
            self.providers.lock().unwrap().insert(user_id, state);
        }

        pub fn put_subscriptions(&self, provider_id: Uuid, subs: Vec<SubscriptionState>) {
            self.subscriptions.lock().unwrap().insert(provider_id, subs);
        }

        /// Number of store reads performed, for asserting short-circuits.
        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AccessStore for MockAccessStore {
        async fn is_token_revoked(&self, jti: &str) -> Result<bool, AccessError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.revoked.lock().unwrap().contains(jti))
        }

        async fn provider_state(&self, user_id: Uuid) -> Result<Option<ProviderState>, AccessError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.providers.lock().unwrap().get(&user_id).cloned())
        }

        async fn subscription_states(&self, provider_id: Uuid) -> Result<Vec<SubscriptionState>, AccessError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.subscriptions.lock().unwrap().get(&provider_id).cloned().unwrap_or_default())
        }
    }
}
