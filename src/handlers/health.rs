use crate::{handlers::AppState, models::HealthStatus};
use axum::{extract::State, Json};
use chrono::Utc;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let can_pay = state.payments.can_make_payments().await;

    Json(HealthStatus {
        status: if can_pay { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        presenting: state.payments.is_presenting().await,
        api_base_url: state.api.base_url().to_string(),
        uptime_seconds: state.started.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
