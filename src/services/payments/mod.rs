pub mod stripe;

use async_trait::async_trait;

/// Everything the external checkout session needs to carry about a booking.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub booking_id: i64,
    pub service_id: String,
    pub service_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub date: String,
    pub time: String,
    pub amount_cents: i64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_session(&self, request: &SessionRequest) -> anyhow::Result<CheckoutSession>;
}
