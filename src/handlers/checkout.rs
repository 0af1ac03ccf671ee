use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::NewBooking;
use crate::services::payments::SessionRequest;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    /// The booking form submits the price as a string; a JSON number is
    /// accepted as well.
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// round(price * 100), rejecting non-numeric and negative values. An absent
/// price counts as zero.
fn amount_cents_from_price(price: Option<&serde_json::Value>) -> Option<i64> {
    let value = match price {
        None | Some(serde_json::Value::Null) => 0.0,
        Some(serde_json::Value::Number(n)) => n.as_f64()?,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok()?,
        Some(_) => return None,
    };

    if !value.is_finite() {
        return None;
    }
    let cents = (value * 100.0).round();
    if cents < 0.0 {
        return None;
    }
    Some(cents as i64)
}

pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let payments = state
        .payments
        .as_deref()
        .ok_or(AppError::PaymentNotConfigured)?;

    let (Some(customer_name), Some(email), Some(date), Some(time)) = (
        required(body.customer_name),
        required(body.email),
        required(body.date),
        required(body.time),
    ) else {
        return Err(AppError::Validation("missing required fields".to_string()));
    };

    let amount_cents = amount_cents_from_price(body.price.as_ref())
        .ok_or_else(|| AppError::Validation("invalid price".to_string()))?;

    let new = NewBooking {
        service_id: body.service_id.unwrap_or_else(|| "unknown".to_string()),
        service_name: body.service_name.unwrap_or_else(|| "Service".to_string()),
        amount_cents,
        currency: "usd".to_string(),
        customer_name,
        email,
        date,
        time,
    };

    // The pending row goes in before the provider is called; a provider
    // failure leaves it behind rather than rolling back.
    let booking_id = {
        let db = state.db.lock().unwrap();
        queries::create_booking(&db, &new)?
    };
    tracing::info!(booking_id, amount_cents, "created pending booking");

    let request = SessionRequest {
        booking_id,
        service_id: new.service_id,
        service_name: new.service_name,
        customer_name: new.customer_name,
        customer_email: new.email,
        date: new.date,
        time: new.time,
        amount_cents,
        currency: new.currency,
        success_url: state.config.success_url.clone(),
        cancel_url: state.config.cancel_url.clone(),
    };

    match payments.create_session(&request).await {
        Ok(session) => {
            {
                let db = state.db.lock().unwrap();
                queries::set_booking_session(&db, booking_id, &session.id)?;
            }
            tracing::info!(booking_id, session_id = %session.id, "checkout session created");
            Ok(Json(CheckoutResponse { url: session.url }))
        }
        Err(e) => {
            tracing::error!(error = %e, booking_id, "checkout session creation failed");
            Err(AppError::Payment(
                "unable to create checkout session".to_string(),
            ))
        }
    }
}
