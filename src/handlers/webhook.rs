use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Checks a `Stripe-Signature` header (`t=<unix>,v1=<hex>` items) against
/// HMAC-SHA256 of `"{t}.{payload}"`.
fn verify_stripe_signature(secret: &str, header: &str, payload: &[u8]) -> Result<(), AppError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| AppError::Signature("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(AppError::Signature("missing v1 signature".to_string()));
    }
    if (Utc::now().timestamp() - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(AppError::Signature("timestamp outside tolerance".to_string()));
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Signature("invalid signing secret".to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    if signatures.iter().any(|s| *s == expected) {
        Ok(())
    } else {
        Err(AppError::Signature("signature mismatch".to_string()))
    }
}

pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    // No configured secret means the body is trusted as-is (dev mode).
    if !state.config.stripe_webhook_secret.is_empty() {
        let signature = headers
            .get("stripe-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if signature.is_empty() {
            tracing::warn!("missing Stripe-Signature header");
            return Err(AppError::Signature(
                "missing Stripe-Signature header".to_string(),
            ));
        }
        verify_stripe_signature(&state.config.stripe_webhook_secret, signature, &body)?;
    }

    let event: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("invalid webhook payload".to_string()))?;

    // Only completion events mutate state; every other event type is
    // acknowledged so the sender does not keep retrying it.
    if event["type"].as_str() == Some("checkout.session.completed") {
        let session = &event["data"]["object"];
        let booking_ref = session["client_reference_id"]
            .as_str()
            .or_else(|| session["metadata"]["bookingId"].as_str());
        let payment_intent = session["payment_intent"].as_str();

        match booking_ref.and_then(|r| r.parse::<i64>().ok()) {
            Some(booking_id) => {
                let updated = {
                    let db = state.db.lock().unwrap();
                    queries::mark_booking_paid(&db, booking_id, payment_intent)?
                };
                if updated {
                    tracing::info!(
                        booking_id,
                        session_id = session["id"].as_str().unwrap_or(""),
                        "booking marked paid"
                    );
                } else {
                    tracing::warn!(booking_id, "completion event for unknown booking");
                }
            }
            None => tracing::warn!("completion event missing booking reference"),
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}
