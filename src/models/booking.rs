use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub service_id: String,
    pub service_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub customer_name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
    pub session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields captured from a checkout request; id, status and timestamps are
/// assigned at insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub service_id: String,
    pub service_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub customer_name: String,
    pub email: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Paid,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
            BookingStatus::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "paid" => Some(BookingStatus::Paid),
            "canceled" => Some(BookingStatus::Canceled),
            _ => None,
        }
    }
}
