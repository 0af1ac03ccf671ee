use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::db::queries::{self, TS_FORMAT};
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::state::AppState;

fn check_basic_auth(headers: &HeaderMap, config: &AppConfig) -> Result<(), AppError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let encoded = auth.strip_prefix("Basic ").ok_or(AppError::Unauthorized)?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| AppError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AppError::Unauthorized)?;
    let (user, pass) = decoded.split_once(':').ok_or(AppError::Unauthorized)?;

    if user != config.admin_user || pass != config.admin_pass {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

/// Row shape the admin console consumes; field names match what the booking
/// form submits.
#[derive(Serialize)]
pub struct BookingResponse {
    id: i64,
    #[serde(rename = "serviceId")]
    service_id: String,
    #[serde(rename = "serviceName")]
    service_name: String,
    amount_cents: i64,
    currency: String,
    #[serde(rename = "customerName")]
    customer_name: String,
    email: String,
    date: String,
    time: String,
    status: String,
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
    #[serde(rename = "paymentIntentId")]
    payment_intent_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            service_id: b.service_id,
            service_name: b.service_name,
            amount_cents: b.amount_cents,
            currency: b.currency,
            customer_name: b.customer_name,
            email: b.email,
            date: b.date,
            time: b.time,
            status: b.status.as_str().to_string(),
            session_id: b.session_id,
            payment_intent_id: b.payment_intent_id,
            created_at: b.created_at.format(TS_FORMAT).to_string(),
            updated_at: b.updated_at.format(TS_FORMAT).to_string(),
        }
    }
}

// GET /api/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_basic_auth(&headers, &state.config)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db)?
    };

    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

// POST /api/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    check_basic_auth(&headers, &state.config)?;

    let status_str = body
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("missing status".to_string()))?;

    // Any of the three known statuses may overwrite any other; transition
    // legality is not checked here.
    let status = BookingStatus::parse(status_str)
        .ok_or_else(|| AppError::Validation(format!("unknown status: {status_str}")))?;

    let booking = {
        let db = state.db.lock().unwrap();
        if !queries::update_booking_status(&db, id, &status)? {
            return Err(AppError::NotFound(format!("booking {id}")));
        }
        queries::get_booking_by_id(&db, id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    tracing::info!(booking_id = id, status = status.as_str(), "booking status overridden");

    Ok(Json(booking.into()))
}
