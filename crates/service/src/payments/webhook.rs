//! Webhook signature verification and event parsing.
//!
//! Stripe signs each delivery with an HMAC-SHA256 over `"{t}.{payload}"`
//! and sends the result in the `Stripe-Signature` header as
//! `t=<timestamp>,v1=<hex>[,v1=<hex>...]`. Verification must happen on the
//! raw request body before any JSON parsing.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;
use uuid::Uuid;

use super::errors::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies `Stripe-Signature` headers against a shared webhook secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Check `header` against `payload`. Any matching `v1` entry accepts.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), PaymentError> {
        let mut timestamp: Option<&str> = None;
        let mut candidates: Vec<&str> = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", v)) => timestamp = Some(v),
                Some(("v1", v)) => candidates.push(v),
                _ => {}
            }
        }
        let timestamp = timestamp.ok_or(PaymentError::InvalidSignature)?;
        if candidates.is_empty() {
            return Err(PaymentError::InvalidSignature);
        }

        for candidate in candidates {
            if let Ok(bytes) = hex::decode(candidate) {
                let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
                    .map_err(|_| PaymentError::InvalidSignature)?;
                mac.update(timestamp.as_bytes());
                mac.update(b".");
                mac.update(payload);
                if mac.verify_slice(&bytes).is_ok() {
                    debug!("webhook signature accepted");
                    return Ok(());
                }
            }
        }
        Err(PaymentError::InvalidSignature)
    }

    /// Produce a valid header for `payload`; used by tests and local tools.
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("hmac accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
    }
}

/// Events this service reacts to; everything else is acknowledged and dropped.
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    CheckoutCompleted { subscription_id: Uuid, provider_id: Uuid },
    Ignored { event_type: String },
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: RawObject,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawObject {
    metadata: RawMetadata,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawMetadata {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "subscriptionId")]
    subscription_id: String,
    #[serde(rename = "providerId")]
    provider_id: String,
}

/// Parse a verified payload into a `WebhookEvent`.
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
    let raw: RawEvent =
        serde_json::from_slice(payload).map_err(|e| PaymentError::MalformedEvent(e.to_string()))?;
    if raw.event_type != "checkout.session.completed" {
        return Ok(WebhookEvent::Ignored { event_type: raw.event_type });
    }
    let meta = raw.data.object.metadata;
    if meta.kind != "provider_subscription" {
        return Ok(WebhookEvent::Ignored { event_type: raw.event_type });
    }
    let subscription_id = meta
        .subscription_id
        .parse::<Uuid>()
        .map_err(|_| PaymentError::MalformedEvent("bad subscriptionId metadata".into()))?;
    let provider_id = meta
        .provider_id
        .parse::<Uuid>()
        .map_err(|_| PaymentError::MalformedEvent("bad providerId metadata".into()))?;
    Ok(WebhookEvent::CheckoutCompleted { subscription_id, provider_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_json(kind: &str, sub: &str, prov: &str) -> String {
        format!(
            r#"{{"type":"checkout.session.completed","data":{{"object":{{"metadata":{{"type":"{}","subscriptionId":"{}","providerId":"{}"}}}}}}}}"#,
            kind, sub, prov
        )
    }

    #[test]
    fn signed_payload_round_trips() {
        let v = SignatureVerifier::new("whsec_test");
        let payload = b"{\"type\":\"ping\"}";
        let header = v.sign(payload, 1_700_000_000);
        assert!(v.verify(payload, &header).is_ok());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let v = SignatureVerifier::new("whsec_test");
        let header = v.sign(b"original", 1_700_000_000);
        assert!(matches!(v.verify(b"tampered", &header), Err(PaymentError::InvalidSignature)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = SignatureVerifier::new("whsec_a");
        let verifier = SignatureVerifier::new("whsec_b");
        let header = signer.sign(b"payload", 1_700_000_000);
        assert!(verifier.verify(b"payload", &header).is_err());
    }

    #[test]
    fn header_without_v1_is_rejected() {
        let v = SignatureVerifier::new("whsec_test");
        assert!(v.verify(b"x", "t=123").is_err());
        assert!(v.verify(b"x", "").is_err());
    }

    #[test]
    fn completed_checkout_parses_metadata() {
        let sub = Uuid::new_v4();
        let prov = Uuid::new_v4();
        let payload = event_json("provider_subscription", &sub.to_string(), &prov.to_string());
        let event = parse_event(payload.as_bytes()).unwrap();
        assert_eq!(event, WebhookEvent::CheckoutCompleted { subscription_id: sub, provider_id: prov });
    }

    #[test]
    fn unrelated_event_types_are_ignored() {
        let payload = br#"{"type":"invoice.created","data":{"object":{}}}"#;
        assert_eq!(
            parse_event(payload).unwrap(),
            WebhookEvent::Ignored { event_type: "invoice.created".into() }
        );
    }

    #[test]
    fn completed_checkout_with_foreign_metadata_is_ignored() {
        let payload = event_json("one_off_purchase", "x", "y");
        assert!(matches!(parse_event(payload.as_bytes()).unwrap(), WebhookEvent::Ignored { .. }));
    }

    #[test]
    fn bad_metadata_ids_are_malformed() {
        let payload = event_json("provider_subscription", "not-a-uuid", "also-not");
        assert!(matches!(parse_event(payload.as_bytes()), Err(PaymentError::MalformedEvent(_))));
    }
}
