use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use cureglams::config::AppConfig;
use cureglams::db;
use cureglams::handlers;
use cureglams::services::payments::stripe::StripeCheckoutProvider;
use cureglams::services::payments::CheckoutProvider;
use cureglams::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let payments: Option<Box<dyn CheckoutProvider>> = if config.stripe_secret_key.is_empty() {
        tracing::warn!("STRIPE_SECRET_KEY not set, checkout requests will be rejected");
        None
    } else {
        Some(Box::new(StripeCheckoutProvider::new(
            config.stripe_secret_key.clone(),
        )))
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        payments,
    });

    let app = Router::new()
        .route("/", get(handlers::pages::home_page))
        .route("/health", get(handlers::health::health))
        .route(
            "/create-checkout-session",
            post(handlers::checkout::create_checkout_session),
        )
        .route("/webhook", post(handlers::webhook::stripe_webhook))
        .route("/success", get(handlers::pages::success_page))
        .route("/cancel", get(handlers::pages::cancel_page))
        .route("/admin", get(handlers::pages::admin_page))
        .route("/api/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/bookings/:id/status",
            post(handlers::admin::update_booking_status),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
