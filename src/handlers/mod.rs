pub mod health;
pub mod payment;

pub use health::*;
pub use payment::*;

use crate::client::ApiClient;
use crate::services::PaymentService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

#[derive(Clone)]
pub struct AppState {
    pub payments: Arc<PaymentService>,
    pub api: &'static ApiClient,
    pub started: Instant,
}

impl AppState {
    pub fn new(payments: Arc<PaymentService>, api: &'static ApiClient) -> Self {
        Self {
            payments,
            api,
            started: Instant::now(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/plugin/canMakePayments", post(can_make_payments))
        .route("/plugin/makePaymentRequest", post(make_payment_request))
        .route("/simulator/authorize", post(simulate_authorize))
        .route("/simulator/dismiss", post(simulate_dismiss))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(true)),
                )
                .layer(CorsLayer::permissive()),
        )
}
