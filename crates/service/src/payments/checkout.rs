//! Hosted checkout sessions via the Stripe HTTP API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::errors::PaymentError;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// What the payment processor needs to open a checkout page.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub customer_id: String,
    pub plan_name: String,
    /// Amount in the major currency unit; converted to cents on the wire.
    pub amount: f64,
    pub subscription_id: Uuid,
    pub provider_id: Uuid,
}

/// A created checkout session: the id is stored on the subscription row,
/// the url is handed back to the browser for redirect.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Outbound payment processor operations, mockable for tests.
#[async_trait]
pub trait CheckoutClient: Send + Sync {
    /// Return an existing or freshly created customer handle.
    async fn ensure_customer(&self, email: &str, name: &str) -> Result<String, PaymentError>;
    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, PaymentError>;
}

/// Real client talking to the Stripe REST API with form-encoded bodies.
pub struct StripeCheckoutClient {
    http: reqwest::Client,
    secret_key: String,
    client_url: String,
}

#[derive(Deserialize)]
struct CustomerResponse {
    id: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

impl StripeCheckoutClient {
    pub fn new(secret_key: impl Into<String>, client_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), secret_key: secret_key.into(), client_url: client_url.into() }
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, PaymentError> {
        let resp = self
            .http
            .post(format!("{}{}", STRIPE_API_BASE, path))
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway(format!("{} on {}: {}", status, path, body)));
        }
        resp.json::<T>().await.map_err(|e| PaymentError::Gateway(e.to_string()))
    }
}

#[async_trait]
impl CheckoutClient for StripeCheckoutClient {
    #[instrument(skip(self, email, name))]
    async fn ensure_customer(&self, email: &str, name: &str) -> Result<String, PaymentError> {
        let form = vec![("email".to_string(), email.to_string()), ("name".to_string(), name.to_string())];
        let customer: CustomerResponse = self.post_form("/customers", &form).await?;
        debug!(customer_id = %customer.id, "stripe_customer_created");
        Ok(customer.id)
    }

    #[instrument(skip(self, request), fields(subscription_id = %request.subscription_id))]
    async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, PaymentError> {
        let cents = (request.amount * 100.0).round() as i64;
        let form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("customer".to_string(), request.customer_id),
            (
                "success_url".to_string(),
                format!("{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}", self.client_url),
            ),
            ("cancel_url".to_string(), format!("{}/payment/cancel", self.client_url)),
            ("line_items[0][price_data][currency]".to_string(), "usd".to_string()),
            ("line_items[0][price_data][unit_amount]".to_string(), cents.to_string()),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                format!("{} plan subscription", request.plan_name),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("metadata[type]".to_string(), "provider_subscription".to_string()),
            ("metadata[subscriptionId]".to_string(), request.subscription_id.to_string()),
            ("metadata[providerId]".to_string(), request.provider_id.to_string()),
        ];
        let session: SessionResponse = self.post_form("/checkout/sessions", &form).await?;
        Ok(CheckoutSession { id: session.id, url: session.url })
    }
}

/// In-memory stand-in for tests and doc examples.
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MockCheckoutClient {
        pub customers: Mutex<Vec<String>>,
        pub sessions: Mutex<Vec<SessionRequest>>,
    }

    #[async_trait]
    impl CheckoutClient for MockCheckoutClient {
        async fn ensure_customer(&self, email: &str, _name: &str) -> Result<String, PaymentError> {
            let id = format!("cus_mock_{}", email.replace(['@', '.'], "_"));
            self.customers.lock().unwrap().push(id.clone());
            Ok(id)
        }

        async fn create_session(&self, request: SessionRequest) -> Result<CheckoutSession, PaymentError> {
            let id = format!("cs_mock_{}", request.subscription_id.simple());
            let url = format!("https://checkout.example.com/{}", id);
            self.sessions.lock().unwrap().push(request);
            Ok(CheckoutSession { id, url })
        }
    }
}
