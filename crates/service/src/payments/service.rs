use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::checkout::{CheckoutClient, CheckoutSession, SessionRequest};
use super::errors::PaymentError;
use super::webhook::{parse_event, SignatureVerifier, WebhookEvent};

/// Orchestrates checkout creation and webhook settlement.
pub struct PaymentsService {
    db: DatabaseConnection,
    verifier: SignatureVerifier,
    client: Arc<dyn CheckoutClient>,
}

impl PaymentsService {
    pub fn new(db: DatabaseConnection, verifier: SignatureVerifier, client: Arc<dyn CheckoutClient>) -> Self {
        Self { db, verifier, client }
    }

    /// Open a checkout session for one of the caller's pending subscriptions.
    ///
    /// The subscription must belong to the provider profile owned by
    /// `user_id` and must not already be paid. The session id is stored on
    /// the row so the webhook settlement can be traced back.
    #[instrument(skip(self))]
    pub async fn create_subscription_checkout(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<CheckoutSession, PaymentError> {
        let provider = models::provider::find_by_user(&self.db, user_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound("provider profile".into()))?;
        let subscription = models::subscription::find_by_id(&self.db, subscription_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound("subscription".into()))?;
        if subscription.provider_id != provider.id {
            warn!(%subscription_id, provider_id = %provider.id, "checkout attempt on foreign subscription");
            return Err(PaymentError::Forbidden("subscription belongs to another provider".into()));
        }
        if subscription.payment_status == "paid" {
            return Err(PaymentError::AlreadyPaid);
        }

        let customer_id = match &provider.stripe_customer_id {
            Some(id) => id.clone(),
            None => {
                let user = models::user::find_by_id(&self.db, user_id)
                    .await?
                    .ok_or_else(|| PaymentError::NotFound("user".into()))?;
                let id = self.client.ensure_customer(&user.email, &user.name).await?;
                models::provider::set_stripe_customer(&self.db, provider.id, &id).await?;
                id
            }
        };

        let session = self
            .client
            .create_session(SessionRequest {
                customer_id,
                plan_name: subscription.plan_name.clone(),
                amount: subscription.amount,
                subscription_id: subscription.id,
                provider_id: provider.id,
            })
            .await?;
        models::subscription::set_checkout_session(&self.db, subscription.id, &session.id).await?;
        info!(%subscription_id, session_id = %session.id, "checkout_session_created");
        Ok(session)
    }

    /// Verify and apply a webhook delivery.
    ///
    /// A completed checkout marks the subscription paid and points the
    /// provider at it; every other event type is acknowledged untouched.
    /// Settlement is idempotent, so redelivery of the same event is safe.
    #[instrument(skip(self, payload, signature_header))]
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.verifier.verify(payload, signature_header)?;
        let event = parse_event(payload)?;
        match &event {
            WebhookEvent::CheckoutCompleted { subscription_id, provider_id } => {
                models::subscription::mark_paid(&self.db, *subscription_id).await?;
                models::provider::set_current_subscription(&self.db, *provider_id, Some(*subscription_id))
                    .await?;
                info!(%subscription_id, %provider_id, "subscription_payment_settled");
            }
            WebhookEvent::Ignored { event_type } => {
                debug!(%event_type, "webhook event ignored");
            }
        }
        Ok(event)
    }
}
