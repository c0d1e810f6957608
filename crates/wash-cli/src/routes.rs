//! # Routes
//!
//! Axum router for the loopback redirect listener.

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the redirect listener router
///
/// Routes:
/// - GET /health - Liveness
/// - GET /payment/success - Payment completed, go to orders
/// - GET /payment/failed - Payment failed
/// - GET /payment-success, /payment-failed - Same, app-style paths
pub fn create_router(state: AppState) -> Router {
    let payment_routes = Router::new()
        .route("/success", get(handlers::payment_success))
        .route("/failed", get(handlers::payment_failed));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/payment", payment_routes)
        .route("/payment-success", get(handlers::payment_success))
        .route("/payment-failed", get(handlers::payment_failed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
