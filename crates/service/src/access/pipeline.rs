use std::sync::Arc;

use tracing::{debug, instrument};

use super::errors::AccessError;
use super::gates::{self, Gate};
use super::principal::{Principal, PrincipalResolver, Role, TokenVerifier};
use super::store::AccessStore;

/// Per-route gating declaration: the allowed roles plus any resource-state
/// gates, in the order they should run. Built once at startup alongside the
/// route table and never mutated afterwards.
#[derive(Clone, Copy, Debug)]
pub struct AccessPolicy {
    pub roles: &'static [Role],
    pub gates: &'static [Gate],
}

impl AccessPolicy {
    pub const fn new(roles: &'static [Role], gates: &'static [Gate]) -> Self {
        Self { roles, gates }
    }
}

/// Executes the gating chain for one request: resolver, role check, gates,
/// strictly in that order, stopping at the first failure. One instance is
/// shared across every protected route; only the policy varies.
pub struct AccessPipeline<S> {
    resolver: PrincipalResolver<S>,
    store: Arc<S>,
}

impl<S: AccessStore> AccessPipeline<S> {
    pub fn new(verifier: TokenVerifier, store: Arc<S>) -> Self {
        let resolver = PrincipalResolver::new(verifier.clone(), Arc::clone(&store));
        Self { resolver, store }
    }

    /// Pure role predicate; runs strictly after a principal is resolved.
    pub fn authorize_role(&self, principal: &Principal, allowed: &[Role]) -> Result<(), AccessError> {
        if allowed.contains(&principal.role) {
            return Ok(());
        }
        Err(AccessError::ForbiddenRole { role: principal.role, allowed: allowed.to_vec() })
    }

    /// Run the full chain. The returned principal is only handed out when
    /// every configured stage has passed.
    #[instrument(skip(self, authorization), fields(roles = ?policy.roles, gates = ?policy.gates))]
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        policy: &AccessPolicy,
    ) -> Result<Principal, AccessError> {
        let principal = self.resolver.resolve(authorization).await?;
        self.authorize_role(&principal, policy.roles)?;
        for gate in policy.gates {
            gates::check(self.store.as_ref(), &principal, *gate).await?;
        }
        debug!(principal_id = %principal.id, role = %principal.role, "access granted");
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    use super::*;
    use crate::access::principal::Claims;
    use crate::access::store::mock::MockAccessStore;
    use crate::access::store::{ProviderState, SubscriptionState};

    const SECRET: &str = "pipeline-test-secret";

    const ANY_ROLE: AccessPolicy =
        AccessPolicy::new(&[Role::Customer, Role::Provider, Role::Admin], &[]);
    const ADMIN_ONLY: AccessPolicy = AccessPolicy::new(&[Role::Admin], &[]);
    const PROVIDER_APPROVED: AccessPolicy =
        AccessPolicy::new(&[Role::Provider], &[Gate::ProviderApproved]);
    const PROVIDER_SUBSCRIBED: AccessPolicy = AccessPolicy::new(
        &[Role::Provider],
        &[Gate::ProviderApproved, Gate::ActiveSubscription],
    );

    fn pipeline() -> (AccessPipeline<MockAccessStore>, Arc<MockAccessStore>) {
        let store = Arc::new(MockAccessStore::default());
        (AccessPipeline::new(TokenVerifier::new(SECRET), Arc::clone(&store)), store)
    }

    fn token_with(id: Uuid, role: Role, jti: &str, ttl_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: id.to_string(),
            role: role.as_str().into(),
            jti: jti.into(),
            iat: now,
            exp: now + ttl_secs,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    fn sub(status: &str, payment: &str, days: i64) -> SubscriptionState {
        SubscriptionState {
            status: status.into(),
            payment_status: payment.into(),
            end_date: Utc::now() + Duration::days(days),
        }
    }

    #[tokio::test]
    async fn missing_credential_rejected_before_any_store_read() {
        let (p, store) = pipeline();
        let err = p.authorize(None, &PROVIDER_SUBSCRIBED).await.unwrap_err();
        assert!(matches!(err, AccessError::MissingCredential));
        assert_eq!(store.lookups(), 0);
    }

    #[tokio::test]
    async fn valid_credential_yields_matching_principal() {
        let (p, _) = pipeline();
        let id = Uuid::new_v4();
        let tok = token_with(id, Role::Customer, "jti-1", 3600);
        let principal = p.authorize(Some(&bearer(&tok)), &ANY_ROLE).await.unwrap();
        assert_eq!(principal.id, id);
        assert_eq!(principal.role, Role::Customer);
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let (p, _) = pipeline();
        let id = Uuid::new_v4();
        let tok = bearer(&token_with(id, Role::Admin, "jti-2", 3600));
        let a = p.authorize(Some(&tok), &ANY_ROLE).await.unwrap();
        let b = p.authorize(Some(&tok), &ANY_ROLE).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn expired_credential_rejected() {
        let (p, _) = pipeline();
        let tok = token_with(Uuid::new_v4(), Role::Customer, "jti-3", -60);
        let err = p.authorize(Some(&bearer(&tok)), &ANY_ROLE).await.unwrap_err();
        assert!(matches!(err, AccessError::ExpiredCredential));
    }

    #[tokio::test]
    async fn revoked_credential_rejected_despite_future_expiry() {
        let (p, store) = pipeline();
        let tok = token_with(Uuid::new_v4(), Role::Customer, "jti-4", 3600);
        // valid before revocation
        assert!(p.authorize(Some(&bearer(&tok)), &ANY_ROLE).await.is_ok());
        store.revoke("jti-4");
        let err = p.authorize(Some(&bearer(&tok)), &ANY_ROLE).await.unwrap_err();
        assert!(matches!(err, AccessError::RevokedCredential));
    }

    #[tokio::test]
    async fn wrong_role_rejected_without_gate_reads() {
        let (p, store) = pipeline();
        let tok = token_with(Uuid::new_v4(), Role::Customer, "jti-5", 3600);
        let before = store.lookups();
        let err = p.authorize(Some(&bearer(&tok)), &PROVIDER_SUBSCRIBED).await.unwrap_err();
        assert!(matches!(err, AccessError::ForbiddenRole { role: Role::Customer, .. }));
        // only the revocation lookup ran; no resource-state fetch
        assert_eq!(store.lookups() - before, 1);
    }

    #[tokio::test]
    async fn role_set_accepts_any_member() {
        let (p, _) = pipeline();
        let tok = token_with(Uuid::new_v4(), Role::Provider, "jti-6", 3600);
        const TWO_ROLES: AccessPolicy = AccessPolicy::new(&[Role::Admin, Role::Provider], &[]);
        assert!(p.authorize(Some(&bearer(&tok)), &TWO_ROLES).await.is_ok());
    }

    #[tokio::test]
    async fn approval_gate_distinguishes_missing_from_unapproved() {
        let (p, store) = pipeline();
        let id = Uuid::new_v4();
        let tok = bearer(&token_with(id, Role::Provider, "jti-7", 3600));

        // no provider record at all
        let err = p.authorize(Some(&tok), &PROVIDER_APPROVED).await.unwrap_err();
        assert!(matches!(err, AccessError::ProviderNotFound));

        // record exists but pending review
        store.put_provider(id, ProviderState { id: Uuid::new_v4(), approved: false });
        let err = p.authorize(Some(&tok), &PROVIDER_APPROVED).await.unwrap_err();
        assert!(matches!(err, AccessError::ProviderNotApproved));

        // approved passes through
        store.put_provider(id, ProviderState { id: Uuid::new_v4(), approved: true });
        assert!(p.authorize(Some(&tok), &PROVIDER_APPROVED).await.is_ok());
    }

    #[tokio::test]
    async fn subscription_gate_requires_active_paid_unexpired() {
        let (p, store) = pipeline();
        let user_id = Uuid::new_v4();
        let provider_id = Uuid::new_v4();
        let tok = bearer(&token_with(user_id, Role::Provider, "jti-8", 3600));
        store.put_provider(user_id, ProviderState { id: provider_id, approved: true });

        // expired and pending rows do not satisfy the gate
        store.put_subscriptions(provider_id, vec![sub("Expired", "paid", 30), sub("Active", "pending", 30)]);
        let err = p.authorize(Some(&tok), &PROVIDER_SUBSCRIBED).await.unwrap_err();
        assert!(matches!(err, AccessError::SubscriptionRequired));

        // adding one active+paid+future row makes it pass
        store.put_subscriptions(
            provider_id,
            vec![sub("Expired", "paid", 30), sub("Active", "pending", 30), sub("Active", "paid", 30)],
        );
        assert!(p.authorize(Some(&tok), &PROVIDER_SUBSCRIBED).await.is_ok());
    }

    #[tokio::test]
    async fn first_failing_stage_wins() {
        let (p, store) = pipeline();
        let id = Uuid::new_v4();
        // everything downstream would also fail: wrong role for the policy,
        // unapproved provider, no subscriptions
        store.put_provider(id, ProviderState { id: Uuid::new_v4(), approved: false });
        let err = p.authorize(Some("Bearer not-a-jwt"), &ADMIN_ONLY).await.unwrap_err();
        assert!(matches!(err, AccessError::MalformedCredential));
        assert!(err.is_authentication());
    }
}
