//! Stripe-backed payment flow for provider subscriptions.
//!
//! The flow has two halves: `checkout` starts a hosted payment session for
//! a pending subscription, and `webhook` consumes the processor's signed
//! callback to mark the subscription paid. Until the callback lands, the
//! subscription gate treats the plan as not covering the provider.

pub mod checkout;
pub mod errors;
pub mod service;
pub mod webhook;

pub use checkout::{CheckoutClient, CheckoutSession, StripeCheckoutClient};
pub use errors::PaymentError;
pub use service::PaymentsService;
pub use webhook::{SignatureVerifier, WebhookEvent};
