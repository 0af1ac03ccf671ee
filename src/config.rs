use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub admin_user: String,
    pub admin_pass: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "data.db".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
            admin_user: env::var("ADMIN_USER").unwrap_or_else(|_| "admin".to_string()),
            admin_pass: env::var("ADMIN_PASS").unwrap_or_else(|_| "password".to_string()),
            success_url: env::var("STRIPE_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000/success".to_string()),
            cancel_url: env::var("STRIPE_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/cancel".to_string()),
        }
    }
}
