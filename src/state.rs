use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::payments::CheckoutProvider;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    /// None when STRIPE_SECRET_KEY is unset; checkout requests then fail with a 500.
    pub payments: Option<Box<dyn CheckoutProvider>>,
}
