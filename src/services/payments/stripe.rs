use anyhow::Context;
use async_trait::async_trait;

use super::{CheckoutProvider, CheckoutSession, SessionRequest};

pub struct StripeCheckoutProvider {
    secret_key: String,
    client: reqwest::Client,
}

impl StripeCheckoutProvider {
    pub fn new(secret_key: String) -> Self {
        Self {
            secret_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    async fn create_session(&self, request: &SessionRequest) -> anyhow::Result<CheckoutSession> {
        let booking_id = request.booking_id.to_string();
        let amount = request.amount_cents.to_string();
        let product_name = format!(
            "{} - {} {}",
            request.service_name, request.date, request.time
        );

        // The Checkout Sessions API takes form-encoded bodies with bracketed
        // keys for nested fields.
        let form: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", request.currency.as_str()),
            ("line_items[0][price_data][unit_amount]", amount.as_str()),
            (
                "line_items[0][price_data][product_data][name]",
                product_name.as_str(),
            ),
            ("client_reference_id", booking_id.as_str()),
            ("customer_email", request.customer_email.as_str()),
            ("metadata[bookingId]", booking_id.as_str()),
            ("metadata[serviceId]", request.service_id.as_str()),
            ("metadata[serviceName]", request.service_name.as_str()),
            ("metadata[customerName]", request.customer_name.as_str()),
            ("metadata[date]", request.date.as_str()),
            ("metadata[time]", request.time.as_str()),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
        ];

        let resp = self
            .client
            .post("https://api.stripe.com/v1/checkout/sessions")
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .context("failed to call Stripe API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Stripe response")?;

        if !status.is_success() {
            anyhow::bail!(
                "Stripe API error ({}): {}",
                status,
                data["error"]["message"].as_str().unwrap_or("unknown")
            );
        }

        let id = data["id"]
            .as_str()
            .context("missing id in Stripe response")?
            .to_string();
        let url = data["url"]
            .as_str()
            .context("missing url in Stripe response")?
            .to_string();

        Ok(CheckoutSession { id, url })
    }
}
